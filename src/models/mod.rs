// src/models/mod.rs

pub mod exam;
pub mod history;
pub mod question;

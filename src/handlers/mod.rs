// src/handlers/mod.rs

pub mod exams;
pub mod history;
pub mod questions;

// src/utils/mod.rs

pub mod id;
pub mod time;

// src/store/mod.rs

pub mod history;
pub mod questions;

pub use history::{HistoryStore, InMemoryHistory};
pub use questions::QuestionStore;

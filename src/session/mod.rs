// src/session/mod.rs

//! Client-side quiz flow.
//!
//! `machine` holds the typed state and its transition function, `stats` scores a
//! finished attempt, `render` turns a session into text, `input` reads quiz-screen
//! commands, and `source` abstracts where chapter questions come from.

pub mod input;
pub mod machine;
pub mod render;
pub mod source;
pub mod stats;

pub use machine::{Action, QuizSession, QuizState, Screen, SessionError};
pub use source::QuestionSource;
pub use stats::CompletionStats;

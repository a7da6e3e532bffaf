// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    store::{HistoryStore, InMemoryHistory, QuestionStore},
};

#[derive(Clone)]
pub struct AppState {
    pub questions: Arc<QuestionStore>,
    pub history: Arc<dyn HistoryStore>,
    pub config: Config,
}

impl AppState {
    /// State backed by the in-memory ledger sized from `config`.
    pub fn new(questions: QuestionStore, config: Config) -> Self {
        Self {
            questions: Arc::new(questions),
            history: Arc::new(InMemoryHistory::new(config.history_capacity)),
            config,
        }
    }
}

impl FromRef<AppState> for Arc<QuestionStore> {
    fn from_ref(state: &AppState) -> Self {
        state.questions.clone()
    }
}

impl FromRef<AppState> for Arc<dyn HistoryStore> {
    fn from_ref(state: &AppState) -> Self {
        state.history.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

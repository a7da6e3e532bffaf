// src/session/source.rs

use std::sync::Arc;

use async_trait::async_trait;

use crate::{error::AppError, models::question::Question, store::QuestionStore};

/// Where a session fetches chapter questions from.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn fetch_chapter(&self, chapter: &str) -> Result<Vec<Question>, AppError>;
}

#[async_trait]
impl QuestionSource for QuestionStore {
    async fn fetch_chapter(&self, chapter: &str) -> Result<Vec<Question>, AppError> {
        Ok(self.list_by_chapter(chapter))
    }
}

#[async_trait]
impl<T: QuestionSource + ?Sized> QuestionSource for Arc<T> {
    async fn fetch_chapter(&self, chapter: &str) -> Result<Vec<Question>, AppError> {
        self.as_ref().fetch_chapter(chapter).await
    }
}

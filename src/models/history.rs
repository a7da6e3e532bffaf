// src/models/history.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{config::DEFAULT_HISTORY_LIMIT, error::AppError};

/// One recorded quiz attempt. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Process-lifetime unique, strictly increasing.
    pub id: u64,
    pub exam: String,
    pub chapter: String,
    pub title: String,
    pub total: u32,
    pub correct: u32,
    /// Seconds spent on the attempt.
    pub duration: u64,
    /// Assigned by the ledger at insert time, serialized as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,
}

/// A validated attempt summary waiting for an id and a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    pub exam: String,
    pub chapter: String,
    pub title: String,
    pub total: u32,
    pub correct: u32,
    pub duration: u64,
}

impl NewHistoryEntry {
    pub fn into_entry(self, id: u64, started_at: DateTime<Utc>) -> HistoryEntry {
        HistoryEntry {
            id,
            exam: self.exam,
            chapter: self.chapter,
            title: self.title,
            total: self.total,
            correct: self.correct,
            duration: self.duration,
            started_at,
        }
    }
}

/// DTO for `POST /history`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordHistoryRequest {
    #[validate(length(min = 1, max = 16, message = "exam must be 1 to 16 characters."))]
    pub exam: String,
    #[validate(length(min = 1, max = 32, message = "chapter must be 1 to 32 characters."))]
    pub chapter: String,
    #[validate(length(max = 200))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub total: u32,
    pub correct: u32,
    pub duration: u64,
}

impl RecordHistoryRequest {
    /// Validates the request and fills in defaults (`title` falls back to `chapter`).
    pub fn into_new_entry(self) -> Result<NewHistoryEntry, AppError> {
        self.validate()?;

        if self.correct > self.total {
            return Err(AppError::BadRequest(format!(
                "correct ({}) cannot exceed total ({})",
                self.correct, self.total
            )));
        }

        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.chapter.clone());

        Ok(NewHistoryEntry {
            exam: self.exam,
            chapter: self.chapter,
            title,
            total: self.total,
            correct: self.correct,
            duration: self.duration,
        })
    }
}

/// Query parameters for `GET /history`.
/// `limit` is kept raw so that non-numeric input falls back to the default instead of failing.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<String>,
}

impl HistoryQuery {
    pub fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
    }
}

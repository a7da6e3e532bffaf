// src/client.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::AppError,
    models::{
        history::{HistoryEntry, RecordHistoryRequest},
        question::Question,
    },
    session::QuestionSource,
};

/// The `{ success, data, error }` envelope every endpoint answers with.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

/// HTTP client for a running quiz server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Every request is bounded by `timeout`; expiry surfaces as `AppError::Transient`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn questions_by_chapter(&self, chapter: &str) -> Result<Vec<Question>, AppError> {
        let response = self
            .http
            .get(format!("{}/api/questions", self.base_url))
            .query(&[("chapter", chapter)])
            .send()
            .await?;
        unwrap_envelope(response).await
    }

    pub async fn questions_by_exam(&self, exam: &str) -> Result<Vec<Question>, AppError> {
        let response = self
            .http
            .get(format!("{}/api/questions", self.base_url))
            .query(&[("exam", exam)])
            .send()
            .await?;
        unwrap_envelope(response).await
    }

    /// Saves a finished attempt. Never called implicitly on completion.
    pub async fn record_history(&self, req: &RecordHistoryRequest) -> Result<HistoryEntry, AppError> {
        let response = self
            .http
            .post(format!("{}/api/history", self.base_url))
            .json(req)
            .send()
            .await?;
        unwrap_envelope(response).await
    }

    pub async fn list_history(&self, limit: usize) -> Result<Vec<HistoryEntry>, AppError> {
        let response = self
            .http
            .get(format!("{}/api/history", self.base_url))
            .query(&[("limit", limit)])
            .send()
            .await?;
        unwrap_envelope(response).await
    }
}

#[async_trait]
impl QuestionSource for ApiClient {
    async fn fetch_chapter(&self, chapter: &str) -> Result<Vec<Question>, AppError> {
        self.questions_by_chapter(chapter).await
    }
}

async fn unwrap_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AppError> {
    let status = response.status();
    let envelope: Envelope<T> = response.json().await?;

    if status.is_success() && envelope.success {
        return envelope
            .data
            .ok_or_else(|| AppError::InternalServerError("Response carried no data".to_string()));
    }

    let message = envelope
        .error
        .unwrap_or_else(|| format!("Request failed with status {}", status));
    Err(match status {
        StatusCode::BAD_REQUEST => AppError::BadRequest(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => AppError::Transient(message),
        _ => AppError::InternalServerError(message),
    })
}

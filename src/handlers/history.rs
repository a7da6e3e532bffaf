// src/handlers/history.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    models::history::{HistoryEntry, HistoryQuery, RecordHistoryRequest},
    store::HistoryStore,
};

/// Validates a submission and appends it to the ledger.
pub async fn record(
    store: &dyn HistoryStore,
    req: RecordHistoryRequest,
) -> Result<HistoryEntry, AppError> {
    let entry = store.append(req.into_new_entry()?).await?;
    tracing::info!(
        "Recorded attempt #{} for {} ({}/{})",
        entry.id,
        entry.chapter,
        entry.correct,
        entry.total
    );
    Ok(entry)
}

/// Saves a completed quiz attempt.
///
/// The server assigns `id` and `startedAt`; a missing `title` defaults to the chapter code.
pub async fn save_history(
    State(store): State<Arc<dyn HistoryStore>>,
    payload: Result<Json<RecordHistoryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let entry = record(store.as_ref(), req).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Quiz history saved",
        "data": entry,
    })))
}

/// Lists recent attempts, most recent first.
/// A missing, non-numeric or non-positive `limit` means 10.
pub async fn list_history(
    State(store): State<Arc<dyn HistoryStore>>,
    params: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let entries = store.list(params.limit()).await?;

    Ok(Json(json!({
        "success": true,
        "data": entries,
    })))
}

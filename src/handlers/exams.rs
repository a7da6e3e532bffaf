// src/handlers/exams.rs

use axum::{Json, extract::Path, response::IntoResponse};
use serde_json::json;

use crate::{
    error::AppError,
    models::exam::{EXAMS, find_exam},
};

/// Lists the exam catalogue.
pub async fn list_exams() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "data": EXAMS,
    }))
}

/// Lists the chapters of one exam.
pub async fn list_chapters(Path(code): Path<String>) -> Result<impl IntoResponse, AppError> {
    let exam = find_exam(&code).ok_or(AppError::NotFound(format!("Exam '{}' not found", code)))?;

    Ok(Json(json!({
        "success": true,
        "data": exam.chapters(),
    })))
}

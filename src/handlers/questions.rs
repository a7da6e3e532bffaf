// src/handlers/questions.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{error::AppError, store::QuestionStore};

/// Query parameters for listing questions.
#[derive(Debug, Default, Deserialize)]
pub struct QuestionParams {
    pub chapter: Option<String>,
    pub exam: Option<String>,
}

/// Lists questions of a chapter or an exam, or the chapter counts when no filter is given.
///
/// * `?chapter=saa03` → exact chapter match.
/// * `?exam=saa` → id prefix match.
/// * no params → `{ chapters: { code: count }, totalQuestions }`.
///
/// `chapter` wins when both are present. Empty matches are a successful empty list.
pub async fn list_questions(
    State(store): State<Arc<QuestionStore>>,
    params: Result<Query<QuestionParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;

    let filtered = match (params.chapter.as_deref(), params.exam.as_deref()) {
        (Some(chapter), _) if !chapter.is_empty() => Some(store.list_by_chapter(chapter)),
        (_, Some(exam)) if !exam.is_empty() => Some(store.list_by_exam(exam)),
        _ => None,
    };

    let body = match filtered {
        Some(questions) => {
            tracing::debug!("Serving {} questions for {:?}", questions.len(), params);
            json!({
                "success": true,
                "count": questions.len(),
                "data": questions,
            })
        }
        None => {
            let summary = store.list_chapters();
            json!({
                "success": true,
                "chapters": summary.chapters,
                "totalQuestions": summary.total_questions,
            })
        }
    };

    Ok(Json(body))
}

/// Reports what the static bank contains.
pub async fn dataset_summary(State(store): State<Arc<QuestionStore>>) -> impl IntoResponse {
    let summary = store.list_chapters();
    Json(json!({
        "success": true,
        "totalQuestions": summary.total_questions,
        "totalChapters": summary.chapters.len(),
        "chapters": summary.chapters,
    }))
}

/// The bank is loaded from static data at startup, so there is nothing to seed.
pub async fn seed(State(store): State<Arc<QuestionStore>>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "No seeding needed - questions loaded from static data",
        "count": store.len(),
    }))
}

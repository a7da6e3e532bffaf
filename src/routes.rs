// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{exams, history, questions},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (questions, history, exams, seed).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (question bank and history ledger).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let exam_routes = Router::new()
        .route("/", get(exams::list_exams))
        .route("/{code}/chapters", get(exams::list_chapters));

    Router::new()
        .route("/api/questions", get(questions::list_questions))
        .route(
            "/api/history",
            get(history::list_history).post(history::save_history),
        )
        .route(
            "/api/seed",
            get(questions::dataset_summary).post(questions::seed),
        )
        .nest("/api/exams", exam_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::extraction::handlers as extraction;
use crate::sentiment::handlers as sentiment;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analysis", post(analysis::handle_analyze))
        .route(
            "/api/v1/analysis/upload",
            post(analysis::handle_analyze_upload).layer(upload_limit.clone()),
        )
        .route(
            "/api/v1/analysis/snippets",
            post(analysis::handle_export_snippets),
        )
        // Documents API
        .route(
            "/api/v1/documents/extract",
            post(extraction::handle_extract).layer(upload_limit),
        )
        // Sentiment API
        .route("/api/v1/sentiment", post(sentiment::handle_sentiment))
        .with_state(state)
}

//! Axum route handlers for the Sentiment API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::sentiment::Sentiment;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SentimentRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SentimentResponse {
    pub sentiment: Sentiment,
}

/// POST /api/v1/sentiment
///
/// Fails with CONFIGURATION_ERROR when no provider credential is configured.
pub async fn handle_sentiment(
    State(state): State<AppState>,
    Json(request): Json<SentimentRequest>,
) -> Result<Json<SentimentResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let sentiment = state.sentiment.classify(&request.text).await?;

    Ok(Json(SentimentResponse { sentiment }))
}

//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::matcher::{AnalysisInput, AnalysisResult};
use crate::analysis::snippets::{render_snippets_export, EXPORT_FILENAME};
use crate::errors::AppError;
use crate::extraction::handlers::{read_parts, take_part};
use crate::extraction::{extract_in_background, PREVIEW_CHARS};
use crate::state::AppState;

pub const MISSING_RESUME_MESSAGE: &str = "Please upload a resume PDF before analyzing.";
pub const MISSING_JD_MESSAGE: &str =
    "Please provide the job description (paste text or upload PDF).";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub result: AnalysisResult,
}

#[derive(Debug, Serialize)]
pub struct UploadAnalysisResponse {
    #[serde(flatten)]
    pub analysis: AnalysisResponse,
    pub resume_preview: String,
    pub jd_preview: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Validation + scoring
// ────────────────────────────────────────────────────────────────────────────

/// Rejects blank inputs with the user-facing guidance for each. The matcher
/// never sees them.
pub fn validate_inputs(resume_text: &str, jd_text: &str) -> Result<AnalysisInput, AppError> {
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(MISSING_RESUME_MESSAGE.to_string()));
    }
    if jd_text.trim().is_empty() {
        return Err(AppError::Validation(MISSING_JD_MESSAGE.to_string()));
    }
    Ok(AnalysisInput::new(resume_text, jd_text))
}

fn run_analysis(state: &AppState, input: &AnalysisInput) -> AnalysisResponse {
    let result = state.scorer.score(input);
    let analysis_id = Uuid::new_v4();
    info!(
        %analysis_id,
        backend = state.scorer.backend(),
        score = result.score,
        missing = result.missing_terms.len(),
        "Analysis complete"
    );

    AnalysisResponse {
        analysis_id,
        analyzed_at: Utc::now(),
        result,
    }
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analysis
///
/// Scores pasted resume text against pasted JD text.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let input = validate_inputs(&request.resume_text, &request.jd_text)?;
    Ok(Json(run_analysis(&state, &input)))
}

/// POST /api/v1/analysis/upload
///
/// Multipart: `resume` (document, required), `jd` (document, optional) and
/// `jd_text` (text, optional). An uploaded JD document wins over pasted text.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadAnalysisResponse>, AppError> {
    let mut parts = read_parts(multipart).await?;

    let resume_text = match take_part(&mut parts, "resume") {
        Some(file) => extract_in_background(file.data).await?.text,
        None => String::new(),
    };

    let jd_text = match take_part(&mut parts, "jd") {
        Some(file) if !file.data.is_empty() => extract_in_background(file.data).await?.text,
        _ => take_part(&mut parts, "jd_text")
            .map(|p| p.text())
            .unwrap_or_default(),
    };

    let input = validate_inputs(&resume_text, &jd_text)?;
    let analysis = run_analysis(&state, &input);

    Ok(Json(UploadAnalysisResponse {
        analysis,
        resume_preview: preview(&resume_text),
        jd_preview: preview(&jd_text),
    }))
}

/// POST /api/v1/analysis/snippets
///
/// Returns the rewritten snippets as a downloadable text file. A resume that
/// passes validation has a non-blank line, so the file is never empty.
pub async fn handle_export_snippets(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let input = validate_inputs(&request.resume_text, &request.jd_text)?;
    let result = state.scorer.score(&input);

    let body = render_snippets_export(&result.rewritten_snippets);
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_resume_rejected_first() {
        match validate_inputs("  \n ", "") {
            Err(AppError::Validation(msg)) => assert_eq!(msg, MISSING_RESUME_MESSAGE),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_jd_rejected() {
        match validate_inputs("Rust engineer", "\t") {
            Err(AppError::Validation(msg)) => assert_eq!(msg, MISSING_JD_MESSAGE),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_inputs_pass_through_untrimmed() {
        let input = validate_inputs(" Rust ", "Go\n").unwrap();
        assert_eq!(input.candidate_text, " Rust ");
        assert_eq!(input.reference_text, "Go\n");
    }

    #[test]
    fn test_preview_caps_length() {
        assert_eq!(preview(&"é".repeat(PREVIEW_CHARS * 2)).chars().count(), PREVIEW_CHARS);
    }
}

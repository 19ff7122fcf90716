//! Document text extraction.
//!
//! PDF payloads go through `pdf-extract`. Anything it cannot parse (corrupt
//! files, plain text uploaded as a document, library panics) degrades to a
//! lossy decode of the raw bytes. Extraction never fails: an empty string is a
//! valid outcome that callers surface as user guidance.

pub mod handlers;

use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;

use bytes::Bytes;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::AppError;

/// Characters of extracted text echoed back for display.
pub const PREVIEW_CHARS: usize = 10_000;

static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("valid blank-line regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub text: String,
    pub preview: String,
    pub char_count: usize,
    /// True when the PDF parser failed and the raw bytes were decoded instead.
    pub used_fallback: bool,
}

impl ExtractedDocument {
    fn new(text: String, used_fallback: bool) -> Self {
        let preview = text.chars().take(PREVIEW_CHARS).collect();
        let char_count = text.chars().count();
        Self {
            text,
            preview,
            char_count,
            used_fallback,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Extracts normalized text from a document payload.
pub fn extract_document_text(payload: &[u8]) -> ExtractedDocument {
    let (raw, used_fallback) = match parse_pdf(payload) {
        Ok(text) => (text, false),
        Err(reason) => {
            warn!(
                "PDF extraction failed ({reason}); decoding {} raw bytes",
                payload.len()
            );
            (decode_raw(payload), true)
        }
    };

    let text = normalize_text(&raw);
    debug!(
        "Extracted {} chars (fallback: {used_fallback})",
        text.chars().count()
    );
    ExtractedDocument::new(text, used_fallback)
}

/// Runs extraction on the blocking pool; PDF parsing is CPU-bound.
pub async fn extract_in_background(payload: Bytes) -> Result<ExtractedDocument, AppError> {
    tokio::task::spawn_blocking(move || extract_document_text(&payload))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))
}

/// Collapses runs of blank lines and trims the ends.
pub fn normalize_text(text: &str) -> String {
    BLANK_LINES_RE.replace_all(text, "\n").trim().to_string()
}

fn parse_pdf(payload: &[u8]) -> Result<String, String> {
    if payload.is_empty() {
        return Err("empty payload".to_string());
    }

    // pdf-extract panics on some malformed inputs instead of returning an error.
    match panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(payload)
    })) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("PDF parser panicked".to_string()),
    }
}

/// Lossy UTF-8 decode that drops undecodable bytes and NULs.
fn decode_raw(payload: &[u8]) -> String {
    String::from_utf8_lossy(payload)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER && c != '\0')
        .collect()
}

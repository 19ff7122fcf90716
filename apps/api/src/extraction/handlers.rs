//! Axum route handlers for document extraction, plus the multipart reader
//! shared with the analysis upload endpoint.

use axum::{extract::Multipart, Json};
use bytes::Bytes;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::{extract_in_background, ExtractedDocument};

/// One part of a multipart request body.
#[derive(Debug, Clone)]
pub struct UploadPart {
    pub name: String,
    pub file_name: Option<String>,
    pub data: Bytes,
}

impl UploadPart {
    /// Part body as text, for plain form fields.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

/// Drains a multipart body into memory. Unnamed parts are skipped.
pub async fn read_parts(mut multipart: Multipart) -> Result<Vec<UploadPart>, AppError> {
    let mut parts = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read field '{name}': {e}")))?;
        parts.push(UploadPart {
            name,
            file_name,
            data,
        });
    }

    Ok(parts)
}

/// Removes and returns the first part called `name`.
pub fn take_part(parts: &mut Vec<UploadPart>, name: &str) -> Option<UploadPart> {
    let idx = parts.iter().position(|p| p.name == name)?;
    Some(parts.remove(idx))
}

/// POST /api/v1/documents/extract
///
/// Extracts text from the uploaded `file` part. An unreadable document yields
/// an empty `text`, not an error.
pub async fn handle_extract(multipart: Multipart) -> Result<Json<ExtractedDocument>, AppError> {
    let mut parts = read_parts(multipart).await?;
    let file = take_part(&mut parts, "file")
        .ok_or_else(|| AppError::Validation("Upload a document in the 'file' field.".to_string()))?;

    info!(
        "Extracting {} ({} bytes)",
        file.file_name.as_deref().unwrap_or("<unnamed>"),
        file.data.len()
    );
    let document = extract_in_background(file.data).await?;
    if document.is_empty() {
        warn!("No text could be extracted; the document may be scanned or image-only");
    }

    Ok(Json(document))
}

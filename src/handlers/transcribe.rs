//! # Upload-and-Transcribe Handler
//!
//! Orchestrates the write path: multipart upload → scoped temp file →
//! external transcription call → derived fields → insert → response.
//!
//! The response is produced only after a successful insert; a persistence
//! failure after a successful transcription is a 500, never a silently
//! unsaved 200.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use serde_json::json;
use std::io::Write;
use tracing::info;

use crate::analysis::{self, MAX_KEY_POINTS, SUMMARY_LIMIT};
use crate::error::AppError;
use crate::state::AppState;

/// Maximum accepted upload size (50MB).
const MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

async fn read_upload(mut payload: Multipart) -> Result<Upload, AppError> {
    let mut upload: Option<Upload> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::Validation(format!("Multipart error: {}", e)))?;

        let Some(content_disposition) = field.content_disposition() else {
            continue;
        };

        if content_disposition.get_name() != Some("file") {
            continue;
        }

        let filename = content_disposition
            .get_filename()
            .unwrap_or("unknown")
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::Validation(format!("Chunk error: {}", e)))?;
            if bytes.len() + chunk.len() > MAX_FILE_SIZE {
                return Err(AppError::Validation(format!(
                    "File too large (max {} bytes)",
                    MAX_FILE_SIZE
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        upload = Some(Upload { filename, bytes });
    }

    let upload = upload.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    if upload.filename.is_empty() {
        return Err(AppError::Validation("No file selected".to_string()));
    }

    Ok(upload)
}

/// `POST /transcribe`
pub async fn transcribe(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let upload = read_upload(payload).await?;

    // Stage the upload to a uniquely named temp file; the transport wants a
    // file path, and the RAII guard deletes it on every exit path.
    let mut temp_file = tempfile::NamedTempFile::new()
        .map_err(|e| AppError::Internal(format!("Failed to create temp file: {}", e)))?;
    temp_file
        .write_all(&upload.bytes)
        .and_then(|_| temp_file.flush())
        .map_err(|e| AppError::Internal(format!("Failed to stage upload: {}", e)))?;

    let transcript = state.gateway.transcribe(temp_file.path()).await?;

    let summary = analysis::summarize(&transcript, SUMMARY_LIMIT);
    let category = analysis::categorize(&transcript);
    let key_points = analysis::extract_key_points(&transcript, MAX_KEY_POINTS);

    let id = state
        .storage
        .insert(&upload.filename, &transcript, &summary)?;

    info!(
        id = %id,
        filename = %upload.filename,
        transcript_chars = %transcript.chars().count(),
        "Transcription stored"
    );

    Ok(HttpResponse::Ok().json(json!({
        "filename": upload.filename,
        "transcript": transcript,
        "summary": summary,
        "category": category,
        "key_points": key_points
    })))
}

//! # Lecture Read/Delete Handlers
//!
//! Category and key points are not persisted; they are recomputed from the
//! stored transcript on every read, so a keyword-list change applies to all
//! historical records immediately.

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::analysis::{self, MAX_KEY_POINTS};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /history` — all records, most recent first. Transcript and key
/// points are omitted to keep the payload small.
pub async fn history(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let records = state.storage.list_all()?;

    let entries: Vec<_> = records
        .iter()
        .map(|record| {
            json!({
                "id": record.id,
                "filename": record.filename,
                "summary": record.summary,
                "category": analysis::categorize(&record.transcript)
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(entries))
}

/// `GET /lecture/{id}` — one full record plus recomputed derived fields.
pub async fn get_lecture(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let record = state
        .storage
        .get_by_id(id)?
        .ok_or_else(|| AppError::NotFound(format!("No lecture with id {}", id)))?;

    Ok(HttpResponse::Ok().json(json!({
        "id": record.id,
        "filename": record.filename,
        "transcript": record.transcript,
        "summary": record.summary,
        "category": analysis::categorize(&record.transcript),
        "key_points": analysis::extract_key_points(&record.transcript, MAX_KEY_POINTS)
    })))
}

/// `DELETE /lecture/{id}` — unconditional delete; an unknown id still
/// reports success, since no existence check is made.
pub async fn delete_lecture(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    state.storage.delete_by_id(id)?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "deleted",
        "id": id
    })))
}

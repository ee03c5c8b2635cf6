//! # Error Handling
//!
//! Custom error types and their conversion to HTTP responses.
//!
//! ## Error Categories:
//! - **Validation**: client sent invalid data, e.g. no file (400)
//! - **Auth**: missing or wrong access code (401)
//! - **NotFound**: requested record doesn't exist (404)
//! - **Gateway**: the external speech-to-text call failed; the underlying
//!   message is forwarded verbatim rather than replaced with a generic one,
//!   since the cause (auth, quota, network) is in that message (500)
//! - **Internal**: persistence and other server-side faults (500)
//!
//! All error responses share one JSON envelope:
//! ```json
//! {
//!   "error": {
//!     "type": "not_found",
//!     "message": "No lecture with id 7",
//!     "timestamp": "2025-01-01T12:00:00Z"
//!   }
//! }
//! ```

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

use crate::transcription::TranscriptionError;

#[derive(Debug)]
pub enum AppError {
    /// Client sent invalid or malformed data
    Validation(String),

    /// Missing or incorrect access code
    Auth(String),

    /// Requested resource was not found
    NotFound(String),

    /// The external speech-to-text call failed
    Gateway(String),

    /// Internal server errors (database failures, etc.)
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Auth(msg) => write!(f, "Auth error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Gateway(msg) => write!(f, "Gateway error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_type, message) = match self {
            AppError::Validation(msg) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "validation_error",
                msg.clone(),
            ),
            AppError::Auth(msg) => (
                actix_web::http::StatusCode::UNAUTHORIZED,
                "auth_error",
                msg.clone(),
            ),
            AppError::NotFound(msg) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "not_found",
                msg.clone(),
            ),
            AppError::Gateway(msg) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "gateway_error",
                msg.clone(),
            ),
            AppError::Internal(msg) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg.clone(),
            ),
        };

        HttpResponse::build(status).json(json!({
            "error": {
                "type": error_type,
                "message": message,
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        }))
    }
}

/// Persistence and other server faults reach handlers as anyhow errors.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Gateway failures keep their full message so the caller can tell an
/// auth failure from a quota failure from a network failure.
impl From<TranscriptionError> for AppError {
    fn from(err: TranscriptionError) -> Self {
        AppError::Gateway(err.to_string())
    }
}

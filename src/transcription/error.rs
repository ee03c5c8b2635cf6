use thiserror::Error;

/// Failures from the external speech-to-text call.
///
/// Variants are split by cause so callers can tell an auth problem from a
/// quota problem from a transient network failure, rather than receiving a
/// single opaque message string. Display output is forwarded verbatim to
/// the HTTP caller.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Failed to read audio file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transcription request failed: {0}")]
    Network(String),

    #[error("Transcription service rejected credentials: {0}")]
    Auth(String),

    #[error("Transcription service rate limit reached: {0}")]
    RateLimited(String),

    #[error("Transcription service returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Transcription service returned an unreadable response: {0}")]
    MalformedResponse(String),
}

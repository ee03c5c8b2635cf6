//! # Transcription Gateway
//!
//! Boundary to the external speech-to-text service. The service is treated
//! as a black box that accepts an audio file and returns `{text}`; accuracy,
//! supported formats, and rate limits are its concern, not ours.
//!
//! ## Key Components:
//! - **SpeechToText trait**: the seam handlers call through, so tests can
//!   substitute a fake gateway without touching HTTP
//! - **WhisperApiGateway**: reqwest client for OpenAI-compatible
//!   `/audio/transcriptions` endpoints
//! - **TranscriptionError**: typed failure causes (auth, quota, network,
//!   malformed audio) surfaced verbatim to the caller

pub mod error;
pub mod gateway;

pub use error::TranscriptionError;
pub use gateway::{SpeechToText, WhisperApiGateway};

//! # Speech-to-Text Gateway
//!
//! Wraps the external transcription API behind a trait so the rest of the
//! application never talks HTTP to the service directly. The gateway is an
//! explicitly constructed dependency injected through `AppState`, not a
//! process-wide singleton, so handler tests swap in a fake.

use async_trait::async_trait;
use std::path::Path;
use tracing::{error, info};

use super::error::TranscriptionError;
use crate::config::TranscriptionConfig;

/// The boundary trait for speech-to-text.
///
/// Takes a path rather than raw bytes because the transport wants a file;
/// callers stage uploads to a scoped temp file first.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError>;
}

/// Client for OpenAI-compatible `/audio/transcriptions` endpoints.
///
/// Posts the audio as a multipart form (`file` + `model` +
/// `response_format=json`) with bearer auth and reads `text` from the JSON
/// response. No retries or timeouts wrap the call; a hang here holds the
/// request for its full duration.
pub struct WhisperApiGateway {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl WhisperApiGateway {
    pub fn new(config: &TranscriptionConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    async fn build_form(&self, audio_path: &Path) -> Result<reqwest::multipart::Form, TranscriptionError> {
        let bytes = tokio::fs::read(audio_path).await?;

        let file_name = audio_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);

        Ok(reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "json"))
    }
}

#[async_trait]
impl SpeechToText for WhisperApiGateway {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError> {
        let form = self.build_form(audio_path).await?;

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("Transcription request error: {}", e);
                TranscriptionError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Transcription API error ({}): {}", status, message);

            return Err(match status.as_u16() {
                401 | 403 => TranscriptionError::Auth(message),
                429 => TranscriptionError::RateLimited(message),
                code => TranscriptionError::Api { status: code, message },
            });
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            error!("Failed to parse transcription response: {}", e);
            TranscriptionError::MalformedResponse(e.to_string())
        })?;

        let text = json
            .get("text")
            .and_then(|value| value.as_str())
            .ok_or_else(|| {
                TranscriptionError::MalformedResponse("response has no `text` field".to_string())
            })?
            .to_string();

        info!("Transcription successful: {} characters", text.len());
        Ok(text)
    }
}

//! # Configuration Management
//!
//! Loads application configuration from multiple sources:
//! - TOML configuration files (config.toml)
//! - Environment variables (with APP_ prefix)
//! - Default values (built into the code)
//!
//! ## Configuration Priority (highest to lowest):
//! 1. Deployment environment variables (HOST, PORT, OPENAI_API_KEY,
//!    ACCESS_CODE, DATABASE_PATH)
//! 2. Environment variables (APP_SERVER_HOST, APP_SERVER_PORT, etc.)
//! 3. Configuration file (config.toml)
//! 4. Default values (defined in the Default impl)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Main application configuration that contains all settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub transcription: TranscriptionConfig,
    pub storage: StorageConfig,
}

/// Server-specific configuration settings.
///
/// `access_code` is the optional shared secret callers must send in the
/// `X-Access-Code` header. When unset, all routes are open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub access_code: Option<String>,
}

/// External speech-to-text service settings.
///
/// Any OpenAI-compatible `/audio/transcriptions` endpoint works; the
/// service is a black box that takes an audio file and returns `{text}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

/// Persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub database_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                access_code: None,
            },
            transcription: TranscriptionConfig {
                api_url: "https://api.openai.com/v1/audio/transcriptions".to_string(),
                api_key: String::new(),
                model: "whisper-1".to_string(),
            },
            storage: StorageConfig {
                database_path: "transcriptions.db".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, config.toml, and the environment.
    ///
    /// The `APP_` prefixed variables follow the config crate's mapping
    /// (`APP_SERVER_HOST` → `server.host`). The unprefixed overrides exist
    /// for deployment platforms that inject `HOST`/`PORT` and for secrets
    /// that are conventionally set as bare variables.
    pub fn load() -> Result<Self> {
        let mut settings = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("_"));

        if let Ok(host) = env::var("HOST") {
            settings = settings.set_override("server.host", host)?;
        }

        if let Ok(port) = env::var("PORT") {
            settings = settings.set_override("server.port", port)?;
        }

        if let Ok(code) = env::var("ACCESS_CODE") {
            settings = settings.set_override("server.access_code", code)?;
        }

        if let Ok(key) = env::var("OPENAI_API_KEY") {
            settings = settings.set_override("transcription.api_key", key)?;
        }

        if let Ok(path) = env::var("DATABASE_PATH") {
            settings = settings.set_override("storage.database_path", path)?;
        }

        let config = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate that the configuration values make sense.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        if self.transcription.api_url.is_empty() {
            return Err(anyhow::anyhow!("Transcription API URL cannot be empty"));
        }

        if self.storage.database_path.is_empty() {
            return Err(anyhow::anyhow!("Database path cannot be empty"));
        }

        if let Some(code) = &self.server.access_code {
            if code.is_empty() {
                return Err(anyhow::anyhow!(
                    "Access code must be non-empty when configured (omit it to disable the gate)"
                ));
            }
        }

        Ok(())
    }
}

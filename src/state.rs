//! # Application State Management
//!
//! Shared state handed to every HTTP request handler via `web::Data`.
//!
//! There is deliberately no in-process mutable state here: configuration is
//! fixed at startup, the storage handle opens a fresh connection per
//! operation, and the gateway client is internally synchronized. Cloning
//! the state is cheap (an `Arc` bump and two small clones), which is what
//! actix does per worker.
//!
//! The gateway lives behind `Arc<dyn SpeechToText>` rather than a concrete
//! type so tests can construct the state with a fake that never leaves the
//! process.

use crate::config::AppConfig;
use crate::storage::Storage;
use crate::transcription::SpeechToText;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    /// Application configuration, fixed at startup
    pub config: AppConfig,

    /// Handle to the transcription record store
    pub storage: Storage,

    /// Boundary to the external speech-to-text service
    pub gateway: Arc<dyn SpeechToText>,

    /// When the server started (for the liveness probe)
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, storage: Storage, gateway: Arc<dyn SpeechToText>) -> Self {
        Self {
            config,
            storage,
            gateway,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

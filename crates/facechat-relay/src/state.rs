//! Application state shared across all route handlers.
//!
//! The relay keeps no per-request state; AppState only carries the
//! configuration and the upstream client. It is passed to handlers via
//! axum's State extractor.

use std::sync::Arc;
use std::time::Instant;

use facechat_core::config::RelayConfig;
use facechat_core::error::Result;

use crate::upstream::InferenceClient;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Relay configuration.
    pub config: Arc<RelayConfig>,
    /// Client for the inference backend.
    pub upstream: Arc<InferenceClient>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Build the state, creating the upstream client from `config`.
    pub fn new(config: RelayConfig) -> Result<Self> {
        let upstream = InferenceClient::from_config(&config)?;
        Ok(Self::with_upstream(config, upstream))
    }

    /// Build the state around an existing upstream client.
    pub fn with_upstream(config: RelayConfig, upstream: InferenceClient) -> Self {
        Self {
            config: Arc::new(config),
            upstream: Arc::new(upstream),
            start_time: Instant::now(),
        }
    }
}

//! Client for the inference backend the relay forwards to.
//!
//! Keeps the reason a forward failed (timeout, unreachable, bad status,
//! bad payload) even though the relay's callers only ever see the sentinel.

use std::time::Duration;

use reqwest::Client;

use facechat_core::config::RelayConfig;
use facechat_core::error::FacechatError;
use facechat_core::types::{ChatEnvelope, ChatRequest};

/// Why a forward to the inference backend failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    #[error("upstream did not answer within {0:?}")]
    Timeout(Duration),
    #[error("upstream unreachable: {0}")]
    Unreachable(String),
    #[error("upstream returned HTTP {0}")]
    UpstreamStatus(u16),
    #[error("malformed upstream payload: {0}")]
    MalformedPayload(String),
}

impl RelayError {
    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Timeout(_) => "timeout",
            RelayError::Unreachable(_) => "unreachable",
            RelayError::UpstreamStatus(_) => "upstream_status",
            RelayError::MalformedPayload(_) => "malformed_payload",
        }
    }

    /// True when the upstream was reached and answered, but not usefully.
    pub fn reached_upstream(&self) -> bool {
        matches!(
            self,
            RelayError::UpstreamStatus(_) | RelayError::MalformedPayload(_)
        )
    }
}

impl From<RelayError> for FacechatError {
    fn from(err: RelayError) -> Self {
        FacechatError::Relay(err.to_string())
    }
}

/// HTTP client for the inference backend's `POST /chat`.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl InferenceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FacechatError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FacechatError::Relay(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat", base_url.trim_end_matches('/')),
            timeout,
        })
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self, FacechatError> {
        Self::new(&config.upstream_url, config.upstream_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Forward one message and return the upstream's reply text.
    pub async fn forward(&self, message: &str) -> Result<String, RelayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest::new(message))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RelayError::Timeout(self.timeout)
                } else {
                    RelayError::Unreachable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::UpstreamStatus(status.as_u16()));
        }

        let envelope: ChatEnvelope = response.json().await.map_err(|e| {
            if e.is_timeout() {
                RelayError::Timeout(self.timeout)
            } else {
                RelayError::MalformedPayload(e.to_string())
            }
        })?;
        Ok(envelope.response)
    }
}

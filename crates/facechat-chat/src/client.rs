//! Transport from the chat session to the relay.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use facechat_core::config::ChatClientConfig;
use facechat_core::types::{ChatEnvelope, ChatRequest};

use crate::error::ChatError;

/// Sends one chat message and returns the reply text.
///
/// Implementations issue exactly one request per call and never retry.
pub trait RelayClient: Send + Sync {
    fn send(&self, message: &str) -> impl Future<Output = Result<String, ChatError>> + Send;
}

/// HTTP client for the relay's `POST /chat`.
#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpRelayClient {
    /// Create a client for the relay at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat", base_url.trim_end_matches('/')),
            timeout,
        })
    }

    pub fn from_config(config: &ChatClientConfig) -> Result<Self, ChatError> {
        Self::new(&config.relay_url, config.request_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RelayClient for HttpRelayClient {
    async fn send(&self, message: &str) -> Result<String, ChatError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest::new(message))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::RelayStatus(status.as_u16()));
        }

        let envelope: ChatEnvelope = response
            .json()
            .await
            .map_err(|e| ChatError::MalformedReply(e.to_string()))?;
        Ok(envelope.response)
    }
}

impl HttpRelayClient {
    fn classify(&self, err: reqwest::Error) -> ChatError {
        if err.is_timeout() {
            ChatError::Timeout(self.timeout)
        } else {
            ChatError::Transport(err.to_string())
        }
    }
}

//! Error types for the chat client.

use std::time::Duration;

use facechat_core::error::FacechatError;

/// Errors from the chat client.
///
/// None of these reach the transcript verbatim; the session replaces them
/// with a fixed sentinel and logs the detail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("a request is already in flight")]
    Busy,
    #[error("invalid session transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
    #[error("relay unreachable: {0}")]
    Transport(String),
    #[error("relay returned HTTP {0}")]
    RelayStatus(u16),
    #[error("malformed relay reply: {0}")]
    MalformedReply(String),
    #[error("no reply within {0:?}")]
    Timeout(Duration),
}

impl ChatError {
    /// Whether the error came from the network hop rather than local
    /// validation.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            ChatError::Transport(_)
                | ChatError::RelayStatus(_)
                | ChatError::MalformedReply(_)
                | ChatError::Timeout(_)
        )
    }
}

impl From<ChatError> for FacechatError {
    fn from(err: ChatError) -> Self {
        FacechatError::Chat(err.to_string())
    }
}

//! Transcript and outcome types for the chat client.

use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Bot,
}

/// A single transcript entry. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Bot,
            content: content.into(),
        }
    }
}

/// Why a submission was dropped without touching the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Empty or whitespace-only input.
    Empty,
    /// Another request is still in flight.
    Busy,
}

/// What a call to `submit` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The relay answered; `reply` was appended as a bot message.
    Replied { reply: String },
    /// The request failed; the error sentinel was appended instead.
    Failed { error: ChatError },
    /// Nothing happened.
    Ignored(IgnoreReason),
}

impl SubmitOutcome {
    /// Whether the submission reached the relay.
    pub fn was_sent(&self) -> bool {
        !matches!(self, SubmitOutcome::Ignored(_))
    }
}

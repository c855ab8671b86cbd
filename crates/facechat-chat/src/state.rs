//! Chat session state machine.
//!
//! Valid transitions:
//! - Idle -> Awaiting (message submitted)
//! - Awaiting -> Idle (reply appended, or request failed)

use std::fmt;

use crate::error::ChatError;

/// Turn-taking state of a chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// No request in flight. Ready to accept a message.
    #[default]
    Idle,
    /// A request is in flight; further submissions are refused.
    Awaiting,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Awaiting => write!(f, "Awaiting"),
        }
    }
}

impl SessionState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        matches!(
            (self, target),
            (SessionState::Idle, SessionState::Awaiting)
                | (SessionState::Awaiting, SessionState::Idle)
        )
    }

    /// Move to `target`, or report the rejected transition.
    pub fn transition(&mut self, target: SessionState) -> Result<(), ChatError> {
        if self.can_transition_to(&target) {
            tracing::debug!("Chat session state: {} -> {}", self, target);
            *self = target;
            Ok(())
        } else {
            Err(ChatError::InvalidTransition {
                from: self.to_string(),
                to: target.to_string(),
            })
        }
    }

    /// The pending flag: true exactly while a request is in flight.
    pub fn is_pending(&self) -> bool {
        *self == SessionState::Awaiting
    }
}

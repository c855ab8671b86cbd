//! Turn-taking chat session.
//!
//! Owns the transcript, the input buffer and the session state machine.
//! At most one relay request is in flight per session; submissions made
//! while one is pending are dropped.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use uuid::Uuid;

use crate::client::RelayClient;
use crate::error::ChatError;
use crate::state::SessionState;
use crate::types::{ChatMessage, IgnoreReason, SubmitOutcome};

/// Bot message appended when a request fails for any reason.
pub const SERVER_ERROR_REPLY: &str = "Server error.";

/// Default upper bound on a single request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Default)]
struct SessionInner {
    state: SessionState,
    transcript: Vec<ChatMessage>,
    input: String,
}

/// Client-side chat session against a relay.
pub struct ChatSession<R> {
    id: Uuid,
    relay: R,
    request_timeout: Duration,
    inner: Mutex<SessionInner>,
}

impl<R: RelayClient> ChatSession<R> {
    /// Create an idle session with an empty transcript.
    pub fn new(relay: R) -> Self {
        Self {
            id: Uuid::new_v4(),
            relay,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            inner: Mutex::new(SessionInner::default()),
        }
    }

    /// Override the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// True exactly while a request is in flight.
    pub fn is_pending(&self) -> bool {
        self.lock().state.is_pending()
    }

    /// Snapshot of the transcript in append order.
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.lock().transcript.clone()
    }

    /// Current contents of the input buffer.
    pub fn input(&self) -> String {
        self.lock().input.clone()
    }

    /// Replace the input buffer, as a text field would on every keystroke.
    pub fn set_input(&self, text: impl Into<String>) {
        self.lock().input = text.into();
    }

    /// Submit whatever is in the input buffer.
    pub async fn send_input(&self) -> SubmitOutcome {
        let message = self.input();
        self.submit(&message).await
    }

    /// Submit `message` to the relay.
    ///
    /// Appends the user message and clears the input buffer before the
    /// request goes out, then appends the reply (or the error sentinel)
    /// when it settles. Empty input and submissions made while a request is
    /// pending are ignored without touching the transcript.
    pub async fn submit(&self, message: &str) -> SubmitOutcome {
        {
            let mut inner = self.lock();
            if inner.state.is_pending() {
                tracing::debug!(session_id = %self.id, "Submission ignored: request in flight");
                return SubmitOutcome::Ignored(IgnoreReason::Busy);
            }
            if message.trim().is_empty() {
                return SubmitOutcome::Ignored(IgnoreReason::Empty);
            }
            if let Err(e) = inner.state.transition(SessionState::Awaiting) {
                tracing::warn!(session_id = %self.id, error = %e, "Submission rejected");
                return SubmitOutcome::Ignored(IgnoreReason::Busy);
            }
            inner.transcript.push(ChatMessage::user(message));
            inner.input.clear();
        }

        let mut guard = PendingGuard {
            session: self,
            settled: false,
        };

        let result = match tokio::time::timeout(self.request_timeout, self.relay.send(message))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(ChatError::Timeout(self.request_timeout)),
        };

        guard.settled = true;
        self.settle(result)
    }

    fn settle(&self, result: Result<String, ChatError>) -> SubmitOutcome {
        let mut inner = self.lock();
        let outcome = match result {
            Ok(reply) => {
                inner.transcript.push(ChatMessage::bot(reply.clone()));
                SubmitOutcome::Replied { reply }
            }
            Err(error) => {
                tracing::warn!(session_id = %self.id, error = %error, "Chat request failed");
                inner.transcript.push(ChatMessage::bot(SERVER_ERROR_REPLY));
                SubmitOutcome::Failed { error }
            }
        };
        if let Err(e) = inner.state.transition(SessionState::Idle) {
            tracing::warn!(session_id = %self.id, error = %e, "Unexpected state on settle");
            inner.state = SessionState::Idle;
        }
        outcome
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Returns the session to Idle if a submission future is dropped before its
/// request settles.
struct PendingGuard<'a, R: RelayClient> {
    session: &'a ChatSession<R>,
    settled: bool,
}

impl<R: RelayClient> Drop for PendingGuard<'_, R> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = self.session.lock();
        tracing::warn!(session_id = %self.session.id, "Chat request abandoned");
        inner.transcript.push(ChatMessage::bot(SERVER_ERROR_REPLY));
        inner.state = SessionState::Idle;
    }
}

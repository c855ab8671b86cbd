//! Chat client for facechat.
//!
//! Provides the turn-taking chat session (transcript, pending flag, input
//! buffer), its state machine, and the HTTP transport to the relay.

pub mod client;
pub mod error;
pub mod session;
pub mod state;
pub mod types;

pub use client::{HttpRelayClient, RelayClient};
pub use error::ChatError;
pub use session::{ChatSession, SERVER_ERROR_REPLY};
pub use state::SessionState;
pub use types::{ChatMessage, ChatRole, IgnoreReason, SubmitOutcome};

//! Shared types, configuration and errors for the facechat workspace.
//!
//! Holds the JSON wire envelopes spoken by the relay, the chat client and
//! the face backend client, the TOML configuration, and the top-level
//! error type every subsystem error converts into.

pub mod config;
pub mod error;
pub mod types;

pub use config::FacechatConfig;
pub use error::{FacechatError, Result};
pub use types::*;

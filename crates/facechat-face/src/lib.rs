//! Face capture client for facechat.
//!
//! Registers and recognizes faces against the face backend using still
//! images from a [`facechat_capture::ImageSource`], and exposes the
//! backend's registry upkeep endpoints.

pub mod backend;
pub mod client;
pub mod error;
pub mod types;

pub use backend::{FaceBackend, HttpFaceBackend};
pub use client::FaceClient;
pub use error::FaceError;
pub use types::{FailureKind, RecognitionResult, RegistrationOutcome};

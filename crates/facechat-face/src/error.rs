//! Error types for the face backend client.

use facechat_core::error::FacechatError;

/// Errors from a face flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FaceError {
    #[error("name required")]
    NameRequired,
    #[error("no image captured")]
    CameraNotReady,
    /// The backend answered with a non-success status.
    #[error("backend rejected the request: {0}")]
    Rejected(String),
    #[error("face backend unreachable: {0}")]
    Transport(String),
    #[error("face backend returned HTTP {0}")]
    BackendStatus(u16),
    #[error("malformed face backend response: {0}")]
    MalformedResponse(String),
    #[error("face backend timed out")]
    Timeout,
}

impl FaceError {
    /// Whether the error was raised before any network call.
    pub fn is_local(&self) -> bool {
        matches!(self, FaceError::NameRequired | FaceError::CameraNotReady)
    }

    /// Whether the error is a transport or server fault rather than a
    /// well-formed backend refusal.
    pub fn is_server_fault(&self) -> bool {
        matches!(
            self,
            FaceError::Transport(_)
                | FaceError::BackendStatus(_)
                | FaceError::MalformedResponse(_)
                | FaceError::Timeout
        )
    }
}

impl From<reqwest::Error> for FaceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FaceError::Timeout
        } else if err.is_decode() {
            FaceError::MalformedResponse(err.to_string())
        } else {
            FaceError::Transport(err.to_string())
        }
    }
}

impl From<FaceError> for FacechatError {
    fn from(err: FaceError) -> Self {
        FacechatError::Face(err.to_string())
    }
}

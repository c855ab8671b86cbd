use thiserror::Error;

/// Top-level error type for the facechat system.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for FacechatError` so that `?` works across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FacechatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("Face client error: {0}")]
    Face(String),

    #[error("Relay error: {0}")]
    Relay(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for FacechatError {
    fn from(err: toml::de::Error) -> Self {
        FacechatError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for FacechatError {
    fn from(err: toml::ser::Error) -> Self {
        FacechatError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for FacechatError {
    fn from(err: serde_json::Error) -> Self {
        FacechatError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for facechat operations.
pub type Result<T> = std::result::Result<T, FacechatError>;

/// Error taxonomy for the background worker
use thiserror::Error;

/// Every failure a request can end in. The `Display` text is what the
/// caller sees in the response envelope.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackgroundError {
    #[error("No tabs provided")]
    NoTabs,

    #[error("Unknown message type")]
    UnknownMessage,

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// A browser API call rejected (missing tab, permissions, ...)
    #[error("{0}")]
    Browser(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error: {0}")]
    Backend(u16),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for BackgroundError {
    fn from(e: serde_json::Error) -> Self {
        BackgroundError::Parse(e.to_string())
    }
}

impl From<url::ParseError> for BackgroundError {
    fn from(e: url::ParseError) -> Self {
        BackgroundError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BackgroundError>;

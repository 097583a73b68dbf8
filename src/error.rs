//! Error types for email-preview

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for preview operations
pub type Result<T> = std::result::Result<T, PreviewError>;

/// Preview error types
#[derive(Error, Debug)]
pub enum PreviewError {
    /// The request could not complete
    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("Server error ({status}): {message}")]
    ServerError { status: StatusCode, message: String },

    /// The body was not JSON or had no string `html` field
    #[error("Invalid response format: {0}")]
    InvalidResponseFormat(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PreviewError {
    /// Short name of the failure kind, for user-facing messages.
    pub fn kind(&self) -> &'static str {
        match self {
            PreviewError::NetworkFailure(_) => "network failure",
            PreviewError::ServerError { .. } => "server error",
            PreviewError::InvalidResponseFormat(_) => "invalid response format",
            PreviewError::Config(_) => "configuration error",
            PreviewError::Io(_) => "io error",
        }
    }
}

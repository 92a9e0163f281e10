//! Lab API error types.

use thiserror::Error;

/// Error that can occur while talking to the simulation service.
#[derive(Debug, Error)]
pub enum LabApiError {
    /// The client configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// The request failed before a status code was received
    /// (connection refused, timeout, TLS failure).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl LabApiError {
    /// Whether this failure happened without the server producing a
    /// response. Transport failures are tracked separately from HTTP
    /// rejections by the batch layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, LabApiError::Transport(_))
    }
}

/// Result type for lab API operations.
pub type LabApiResult<T> = Result<T, LabApiError>;

//! Directory error types
//!
//! Error definitions with transient/permanent classification so callers
//! can decide whether a failed operation is worth another attempt.

use thiserror::Error;

/// Error that can occur during directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Failed to establish a connection to the directory server.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Bind was refused with invalid credentials.
    #[error("authentication failed: invalid bind credentials")]
    AuthenticationFailed,

    /// A search operation failed.
    #[error("search failed under '{base}': {message}")]
    SearchFailed {
        base: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An add operation was rejected by the server.
    #[error("add failed for '{dn}': {message}")]
    AddFailed {
        dn: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A delete operation was rejected by the server.
    #[error("delete failed for '{dn}': {message}")]
    DeleteFailed {
        dn: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The client configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl DirectoryError {
    /// Check if this error is transient and the operation may succeed
    /// on a later attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, DirectoryError::ConnectionFailed { .. })
    }

    /// Check if this error is permanent and retry won't help.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        DirectoryError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection failed error with source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a search failed error with source.
    pub fn search_failed_with_source(
        base: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::SearchFailed {
            base: base.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an add failed error with source.
    pub fn add_failed_with_source(
        dn: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::AddFailed {
            dn: dn.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a delete failed error with source.
    pub fn delete_failed_with_source(
        dn: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::DeleteFailed {
            dn: dn.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

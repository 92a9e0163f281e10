//! Provisioning error types.

use thiserror::Error;

use simroll_directory::DirectoryError;

/// Error that can occur while preparing or running a provisioning
/// batch. Per-row add failures are not errors at this level; they are
/// tallied in the run report.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A row source could not be opened or read.
    #[error("row source '{path}' failed: {message}")]
    SourceFailed {
        path: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The uid allocator could not be seeded from the directory.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl ProvisionError {
    /// Create a source failed error.
    pub fn source_failed(path: impl Into<String>, message: impl Into<String>) -> Self {
        ProvisionError::SourceFailed {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a source failed error with source.
    pub fn source_failed_with_source(
        path: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ProvisionError::SourceFailed {
            path: path.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type for provisioning operations.
pub type ProvisionResult<T> = Result<T, ProvisionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_failed_display() {
        let err = ProvisionError::source_failed("roster.csv", "missing header row");
        assert_eq!(
            err.to_string(),
            "row source 'roster.csv' failed: missing header row"
        );
    }

    #[test]
    fn test_directory_error_is_transparent() {
        let err: ProvisionError = DirectoryError::connection_failed("down").into();
        assert_eq!(err.to_string(), "connection failed: down");
    }
}

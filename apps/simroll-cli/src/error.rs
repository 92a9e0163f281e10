//! CLI error types and exit codes

use thiserror::Error;

use simroll_directory::DirectoryError;
use simroll_labapi::LabApiError;
use simroll_provision::ProvisionError;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error (including batches that end with failures)
/// - 2: Authentication failed
/// - 3: Network error
/// - 4: Validation error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    LabApi(#[from] LabApiError),

    #[error(transparent)]
    Provision(#[from] ProvisionError),

    #[error("Batch finished with {failed} failed and {transport_failed} unanswered entries")]
    BatchIncomplete { failed: usize, transport_failed: usize },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::Io(_) => 1,
            CliError::Validation(_) => 4,
            CliError::Directory(DirectoryError::AuthenticationFailed) => 2,
            CliError::Directory(e) if e.is_transient() => 3,
            CliError::Directory(_) => 1,
            CliError::LabApi(e) if e.is_transport() => 3,
            CliError::LabApi(_) => 1,
            CliError::Provision(ProvisionError::Directory(DirectoryError::AuthenticationFailed)) => 2,
            CliError::Provision(ProvisionError::Directory(e)) if e.is_transient() => 3,
            CliError::Provision(_) => 1,
            CliError::BatchIncomplete { .. } => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    /// Get a suggested action for this error
    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Config(_) => {
                Some("Check the configuration file path and its [directory] / [lab_api] sections.")
            }
            CliError::Directory(DirectoryError::AuthenticationFailed) => {
                Some("Verify bind_dn and bind_password in the [directory] section.")
            }
            CliError::Directory(e) if e.is_transient() => {
                Some("Check that the directory server is reachable and try again.")
            }
            CliError::BatchIncomplete { .. } => {
                Some("Re-run with a higher --sweeps value, or inspect the failures above.")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_validation() {
        assert_eq!(CliError::Validation("bad".to_string()).exit_code(), 4);
    }

    #[test]
    fn test_exit_code_auth_failure() {
        assert_eq!(
            CliError::Directory(DirectoryError::AuthenticationFailed).exit_code(),
            2
        );
    }

    #[test]
    fn test_exit_code_transient_directory_failure() {
        assert_eq!(
            CliError::Directory(DirectoryError::connection_failed("down")).exit_code(),
            3
        );
    }

    #[test]
    fn test_exit_code_incomplete_batch() {
        let err = CliError::BatchIncomplete {
            failed: 2,
            transport_failed: 1,
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("2 failed"));
    }
}

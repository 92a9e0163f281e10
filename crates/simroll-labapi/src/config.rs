//! Lab API client configuration.

use serde::{Deserialize, Serialize};

use crate::error::{LabApiError, LabApiResult};

/// Configuration for the simulation service client.
#[derive(Clone, Serialize, Deserialize)]
pub struct LabApiConfig {
    /// Service base URL (e.g., "https://labs.example.edu/api").
    pub base_url: String,

    /// HTTP Basic username.
    pub username: String,

    /// HTTP Basic password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Per-request timeout in seconds. A request that exceeds this is
    /// treated as a transport failure.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for LabApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabApiConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***REDACTED***"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_timeout_secs() -> u64 {
    15
}

impl LabApiConfig {
    /// Create a new config with required fields.
    pub fn new(base_url: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Set the HTTP Basic password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> LabApiResult<()> {
        if self.base_url.is_empty() {
            return Err(LabApiError::InvalidConfiguration {
                message: "base_url must not be empty".to_string(),
            });
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(LabApiError::InvalidConfiguration {
                message: format!("base_url '{}' must use http:// or https://", self.base_url),
            });
        }
        if self.timeout_secs == 0 {
            return Err(LabApiError::InvalidConfiguration {
                message: "timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config =
            LabApiConfig::new("https://labs.example.edu/api", "operator").with_password("hunter2");
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn test_rejects_bad_scheme() {
        let config = LabApiConfig::new("ftp://labs.example.edu", "operator");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config =
            LabApiConfig::new("https://labs.example.edu", "operator").with_timeout_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let config =
            LabApiConfig::new("https://labs.example.edu", "operator").with_password("hunter2");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("***REDACTED***"));
        assert!(!rendered.contains("hunter2"));
    }
}

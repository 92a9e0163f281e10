//! Directory client configuration.

use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, DirectoryResult};

/// Configuration for the LDAP directory client.
#[derive(Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Directory server URL (e.g., "ldap://directory.example.edu:389").
    pub url: String,

    /// Bind DN for the administrative connection.
    pub bind_dn: String,

    /// Bind password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_password: Option<String>,

    /// Base DN under which user entries live.
    pub base_dn: String,

    /// DN of the subtree holding group entries.
    #[serde(default)]
    pub group_dn: String,

    /// LDAP protocol version. Only version 3 is supported.
    #[serde(default = "default_protocol_version")]
    pub protocol_version: u8,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl std::fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("url", &self.url)
            .field("bind_dn", &self.bind_dn)
            .field(
                "bind_password",
                &self.bind_password.as_ref().map(|_| "***REDACTED***"),
            )
            .field("base_dn", &self.base_dn)
            .field("group_dn", &self.group_dn)
            .field("protocol_version", &self.protocol_version)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

fn default_protocol_version() -> u8 {
    3
}

fn default_connect_timeout_secs() -> u64 {
    15
}

impl DirectoryConfig {
    /// Create a new directory config with required fields.
    pub fn new(
        url: impl Into<String>,
        bind_dn: impl Into<String>,
        base_dn: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            bind_dn: bind_dn.into(),
            bind_password: None,
            base_dn: base_dn.into(),
            group_dn: String::new(),
            protocol_version: default_protocol_version(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }

    /// Set the bind password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.bind_password = Some(password.into());
        self
    }

    /// Set the group subtree DN.
    pub fn with_group_dn(mut self, group_dn: impl Into<String>) -> Self {
        self.group_dn = group_dn.into();
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> DirectoryResult<()> {
        if self.url.is_empty() {
            return Err(DirectoryError::InvalidConfiguration {
                message: "directory url must not be empty".to_string(),
            });
        }
        if !self.url.starts_with("ldap://") && !self.url.starts_with("ldaps://") {
            return Err(DirectoryError::InvalidConfiguration {
                message: format!("directory url '{}' must use ldap:// or ldaps://", self.url),
            });
        }
        if self.bind_dn.is_empty() {
            return Err(DirectoryError::InvalidConfiguration {
                message: "bind_dn must not be empty".to_string(),
            });
        }
        if self.base_dn.is_empty() {
            return Err(DirectoryError::InvalidConfiguration {
                message: "base_dn must not be empty".to_string(),
            });
        }
        if self.protocol_version != 3 {
            return Err(DirectoryError::InvalidConfiguration {
                message: format!(
                    "protocol version {} is not supported (only 3)",
                    self.protocol_version
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> DirectoryConfig {
        DirectoryConfig::new(
            "ldap://directory.example.edu:389",
            "cn=admin,dc=example,dc=edu",
            "ou=people,dc=example,dc=edu",
        )
        .with_password("secret")
        .with_group_dn("ou=groups,dc=example,dc=edu")
    }

    #[test]
    fn test_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_scheme() {
        let mut config = valid_config();
        config.url = "http://directory.example.edu".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unsupported_protocol_version() {
        let mut config = valid_config();
        config.protocol_version = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", valid_config());
        assert!(rendered.contains("***REDACTED***"));
        assert!(!rendered.contains("secret"));
    }
}

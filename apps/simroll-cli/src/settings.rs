//! TOML-backed CLI settings.

use std::path::Path;

use serde::Deserialize;

use simroll_directory::DirectoryConfig;
use simroll_labapi::LabApiConfig;
use simroll_provision::ProvisionConfig;

use crate::error::{CliError, CliResult};

/// Full CLI configuration, one section per subsystem.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Directory connection settings.
    pub directory: DirectoryConfig,

    /// Simulation service settings.
    pub lab_api: LabApiConfig,

    /// Provisioning defaults.
    pub provision: ProvisionConfig,

    /// Domain appended to bare usernames in allow-list files.
    #[serde(default)]
    pub mail_domain: Option<String>,
}

impl Settings {
    /// Load and validate settings from a TOML file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("could not read '{}': {e}", path.display()))
        })?;
        let settings: Settings = toml::from_str(&raw).map_err(|e| {
            CliError::Config(format!("could not parse '{}': {e}", path.display()))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate every section.
    pub fn validate(&self) -> CliResult<()> {
        self.directory.validate()?;
        self.lab_api.validate()?;
        if self.provision.base_dn.is_empty() {
            return Err(CliError::Config(
                "provision.base_dn must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        mail_domain = "example.edu"

        [directory]
        url = "ldap://directory.example.edu:389"
        bind_dn = "cn=admin,dc=example,dc=edu"
        bind_password = "secret"
        base_dn = "ou=people,dc=example,dc=edu"
        group_dn = "ou=groups,dc=example,dc=edu"

        [lab_api]
        base_url = "https://labs.example.edu/api"
        username = "staff"
        password = "hunter2"

        [provision]
        base_dn = "ou=people,dc=example,dc=edu"
        default_password = "initial1"
        home_directory_base = "/home/students/"
    "#;

    #[test]
    fn test_parses_full_settings() {
        let settings: Settings = toml::from_str(SAMPLE).unwrap();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.mail_domain.as_deref(), Some("example.edu"));
        assert_eq!(settings.directory.protocol_version, 3);
        assert_eq!(settings.lab_api.timeout_secs, 15);
        // Unlisted provisioning fields fall back to defaults.
        assert!(!settings.provision.object_classes.is_empty());
    }

    #[test]
    fn test_missing_section_is_a_parse_error() {
        let trimmed = SAMPLE.replace("[lab_api]", "[lab_api_typo]");
        assert!(toml::from_str::<Settings>(&trimmed).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load(Path::new("/no/such/simroll.toml")).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}

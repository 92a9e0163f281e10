//! Row-by-row account provisioning.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use simroll_directory::{escape_dn_value, AttrValue, Attributes, DirectoryService};

use crate::error::ProvisionResult;
use crate::sanitize::sanitize_attributes;
use crate::source::{RowRecord, RowSource};
use crate::uid::UidAllocator;

/// Static settings for a provisioning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// Base DN new entries are created under.
    pub base_dn: String,

    /// Initial password assigned to every new account.
    #[serde(default = "default_password")]
    pub default_password: String,

    /// Object classes assigned to every new entry.
    #[serde(default = "default_object_classes")]
    pub object_classes: Vec<String>,

    /// Prefix of the home directory path; the lower-cased given name
    /// is appended.
    #[serde(default = "default_home_directory_base")]
    pub home_directory_base: String,
}

fn default_password() -> String {
    "changeme".to_string()
}

fn default_object_classes() -> Vec<String> {
    vec![
        "top".to_string(),
        "person".to_string(),
        "organizationalPerson".to_string(),
        "inetOrgPerson".to_string(),
        "posixAccount".to_string(),
    ]
}

fn default_home_directory_base() -> String {
    "/home/".to_string()
}

impl ProvisionConfig {
    /// Create a configuration with defaults for everything but the
    /// base DN.
    pub fn new(base_dn: impl Into<String>) -> Self {
        Self {
            base_dn: base_dn.into(),
            default_password: default_password(),
            object_classes: default_object_classes(),
            home_directory_base: default_home_directory_base(),
        }
    }

    /// Set the default password.
    pub fn with_default_password(mut self, password: impl Into<String>) -> Self {
        self.default_password = password.into();
        self
    }

    /// Set the object class list.
    pub fn with_object_classes(mut self, classes: Vec<String>) -> Self {
        self.object_classes = classes;
        self
    }

    /// Set the home directory base path.
    pub fn with_home_directory_base(mut self, base: impl Into<String>) -> Self {
        self.home_directory_base = base.into();
        self
    }
}

/// Tallies for one provisioning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionReport {
    /// Rows added to the directory.
    pub added: usize,
    /// Rows rejected, by validation or by the server.
    pub rejected: usize,
    /// Highest uid issued; the seed's predecessor when nothing was
    /// added.
    pub last_uid: u32,
    /// One message per rejected row, attributed by `cn` where known.
    pub errors: Vec<String>,
}

/// Provisions directory accounts from tabular rows.
///
/// Each row is a small state machine ending in Added or Rejected: the
/// required columns are checked, attributes are derived and sanitized
/// to printable ASCII, a uid is allocated, and the entry is submitted.
/// A rejected row rolls the uid allocator back so the next row reuses
/// its uid; rejection never aborts the batch.
pub struct ProvisionPipeline {
    directory: Arc<dyn DirectoryService>,
    config: ProvisionConfig,
}

/// Columns every row must provide.
const REQUIRED_COLUMNS: [&str; 4] = ["cn", "mail", "givenname", "gidnumber"];

impl ProvisionPipeline {
    /// Create a pipeline over the given directory.
    pub fn new(directory: Arc<dyn DirectoryService>, config: ProvisionConfig) -> Self {
        Self { directory, config }
    }

    /// Run a batch, seeding the uid allocator from the directory's
    /// current maximum.
    pub async fn run(&self, source: &mut dyn RowSource) -> ProvisionResult<ProvisionReport> {
        let mut allocator =
            UidAllocator::from_directory(self.directory.as_ref(), &self.config.base_dn).await?;
        self.run_with(source, &mut allocator).await
    }

    /// Run a batch with a caller-seeded uid allocator.
    pub async fn run_with(
        &self,
        source: &mut dyn RowSource,
        allocator: &mut UidAllocator,
    ) -> ProvisionResult<ProvisionReport> {
        let rows = source.rows()?;
        info!(rows = rows.len(), first_uid = allocator.peek(), "provisioning batch started");

        let mut report = ProvisionReport::default();
        for row in rows {
            let cn = row.get("cn").cloned().unwrap_or_default();

            let attrs = match self.build_attributes(&row, allocator.peek()) {
                Ok(attrs) => attrs,
                Err(message) => {
                    warn!(cn = %cn, %message, "row rejected before submission");
                    report.rejected += 1;
                    report.errors.push(format!("{cn}: {message}"));
                    continue;
                }
            };

            let uid = allocator.allocate();
            // The sanitized cn names the entry, not the raw cell.
            let cn = attrs.get_text("cn").unwrap_or_default().to_string();
            let dn = format!("cn={},{}", escape_dn_value(&cn), self.config.base_dn);

            match self.directory.add(&dn, &attrs).await {
                Ok(()) => {
                    info!(cn = %cn, uid, "account added");
                    report.added += 1;
                }
                Err(e) => {
                    error!(cn = %cn, uid, error = %e, "account add rejected");
                    allocator.rollback();
                    report.rejected += 1;
                    report.errors.push(format!("{cn}: {e}"));
                }
            }
        }

        report.last_uid = allocator.last_uid();
        info!(
            added = report.added,
            rejected = report.rejected,
            last_uid = report.last_uid,
            "provisioning batch complete"
        );
        Ok(report)
    }

    /// Derive the full attribute set for one row. Row columns pass
    /// through as text; the derived fields overwrite any homonymous
    /// columns.
    fn build_attributes(&self, row: &RowRecord, uid_number: u32) -> Result<Attributes, String> {
        for column in REQUIRED_COLUMNS {
            if row.get(column).map(String::as_str).unwrap_or("").is_empty() {
                return Err(format!("missing required column '{column}'"));
            }
        }

        let gid = normalize_numeric_cell(&row["gidnumber"])
            .ok_or_else(|| format!("gidnumber '{}' is not numeric", row["gidnumber"]))?;

        let mut attrs: Attributes = row
            .iter()
            .filter(|(name, _)| name.as_str() != "gidnumber")
            .map(|(name, value)| (name.clone(), AttrValue::Text(value.clone())))
            .collect();

        attrs.set("gidNumber", AttrValue::Text(gid));
        attrs.set("userPassword", self.config.default_password.clone());
        attrs.set("objectclass", self.config.object_classes.clone());
        attrs.set("uid", row["mail"].clone());
        attrs.set("uidNumber", i64::from(uid_number));
        attrs.set(
            "homeDirectory",
            format!("{}{}", self.config.home_directory_base, row["givenname"].to_lowercase()),
        );

        Ok(sanitize_attributes(attrs))
    }
}

/// Collapse spreadsheet float formatting on integer cells: `"600.0"`
/// becomes `"600"`. Cells with a fractional part are not numeric group
/// identifiers and are refused.
fn normalize_numeric_cell(cell: &str) -> Option<String> {
    let cell = cell.trim();
    if let Ok(n) = cell.parse::<i64>() {
        return Some(n.to_string());
    }
    match cell.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some((f as i64).to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_numeric_cell() {
        assert_eq!(normalize_numeric_cell("600"), Some("600".to_string()));
        assert_eq!(normalize_numeric_cell("600.0"), Some("600".to_string()));
        assert_eq!(normalize_numeric_cell(" 600 "), Some("600".to_string()));
        assert_eq!(normalize_numeric_cell("600.5"), None);
        assert_eq!(normalize_numeric_cell("six hundred"), None);
    }

    #[test]
    fn test_config_defaults() {
        let config = ProvisionConfig::new("ou=people,dc=example,dc=edu");
        assert_eq!(config.default_password, "changeme");
        assert_eq!(config.home_directory_base, "/home/");
        assert!(config.object_classes.contains(&"posixAccount".to_string()));
    }

    #[test]
    fn test_build_attributes_derives_fields() {
        let config = ProvisionConfig::new("ou=people,dc=example,dc=edu")
            .with_default_password("initial1")
            .with_home_directory_base("/home/students/");
        let pipeline = ProvisionPipeline {
            directory: Arc::new(NullDirectory),
            config,
        };

        let mut row = RowRecord::new();
        row.insert("cn".to_string(), "Jane Doe".to_string());
        row.insert("mail".to_string(), "jd123@example.edu".to_string());
        row.insert("givenname".to_string(), "Jane".to_string());
        row.insert("gidnumber".to_string(), "600.0".to_string());

        let attrs = pipeline.build_attributes(&row, 5001).unwrap();
        assert_eq!(attrs.get_text("uid"), Some("jd123@example.edu"));
        assert_eq!(attrs.get("uidNumber"), Some(&AttrValue::Int(5001)));
        assert_eq!(attrs.get_text("gidNumber"), Some("600"));
        assert_eq!(attrs.get_text("userPassword"), Some("initial1"));
        assert_eq!(attrs.get_text("homeDirectory"), Some("/home/students/jane"));
    }

    #[test]
    fn test_missing_required_column_is_rejected() {
        let pipeline = ProvisionPipeline {
            directory: Arc::new(NullDirectory),
            config: ProvisionConfig::new("ou=people"),
        };

        let mut row = RowRecord::new();
        row.insert("cn".to_string(), "Jane Doe".to_string());
        row.insert("mail".to_string(), "jd123@example.edu".to_string());

        let err = pipeline.build_attributes(&row, 5001).unwrap_err();
        assert!(err.contains("givenname"));
    }

    struct NullDirectory;

    #[async_trait::async_trait]
    impl DirectoryService for NullDirectory {
        async fn search_base(
            &self,
            _dn: &str,
            _attrs: Option<Vec<String>>,
        ) -> simroll_directory::DirectoryResult<Vec<simroll_directory::DirectoryEntry>> {
            Ok(vec![])
        }

        async fn search_subtree(
            &self,
            _base: &str,
            _filter: &str,
            _attrs: Option<Vec<String>>,
        ) -> simroll_directory::DirectoryResult<Vec<simroll_directory::DirectoryEntry>> {
            Ok(vec![])
        }

        async fn add(
            &self,
            _dn: &str,
            _attributes: &Attributes,
        ) -> simroll_directory::DirectoryResult<()> {
            Ok(())
        }

        async fn delete(&self, _dn: &str) -> simroll_directory::DirectoryResult<()> {
            Ok(())
        }

        async fn unbind(&self) -> simroll_directory::DirectoryResult<()> {
            Ok(())
        }
    }
}

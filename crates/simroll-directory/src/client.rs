//! Directory service trait and the `ldap3`-backed implementation.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchEntry};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::attrs::Attributes;
use crate::config::DirectoryConfig;
use crate::entry::DirectoryEntry;
use crate::error::{DirectoryError, DirectoryResult};

/// Directory operations consumed by the roster and provisioning layers.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Read a single entry at `dn` (base scope).
    async fn search_base(
        &self,
        dn: &str,
        attrs: Option<Vec<String>>,
    ) -> DirectoryResult<Vec<DirectoryEntry>>;

    /// Search the subtree under `base` with an LDAP filter.
    async fn search_subtree(
        &self,
        base: &str,
        filter: &str,
        attrs: Option<Vec<String>>,
    ) -> DirectoryResult<Vec<DirectoryEntry>>;

    /// Add a new entry at `dn`.
    async fn add(&self, dn: &str, attributes: &Attributes) -> DirectoryResult<()>;

    /// Delete the entry at `dn`.
    async fn delete(&self, dn: &str) -> DirectoryResult<()>;

    /// Close the connection gracefully.
    async fn unbind(&self) -> DirectoryResult<()>;
}

/// Escape special characters in DN attribute values per RFC 4514.
///
/// Escaped: `, + " \ < > ; =` anywhere, NUL as `\00`, leading/trailing
/// space as `\20`, and a leading `#` as `\23`.
pub fn escape_dn_value(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut result = String::with_capacity(value.len() * 2);

    for (i, ch) in chars.iter().enumerate() {
        let is_first = i == 0;
        let is_last = i == chars.len() - 1;

        match ch {
            ',' | '+' | '"' | '\\' | '<' | '>' | ';' | '=' => {
                result.push('\\');
                result.push(*ch);
            }
            '\0' => result.push_str("\\00"),
            ' ' if is_first || is_last => result.push_str("\\20"),
            '#' if is_first => result.push_str("\\23"),
            _ => result.push(*ch),
        }
    }

    result
}

/// LDAP-backed [`DirectoryService`].
pub struct LdapDirectory {
    config: DirectoryConfig,

    /// Cached LDAP handle (lazily initialized).
    connection: Arc<RwLock<Option<Ldap>>>,
}

impl LdapDirectory {
    /// Create a new directory client with the given configuration.
    pub fn new(config: DirectoryConfig) -> DirectoryResult<Self> {
        config.validate()?;

        Ok(Self {
            config,
            connection: Arc::new(RwLock::new(None)),
        })
    }

    /// Configuration this client was built with.
    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Get an LDAP handle, binding a new connection if necessary.
    async fn get_connection(&self) -> DirectoryResult<Ldap> {
        {
            let guard = self.connection.read().await;
            if let Some(ref conn) = *guard {
                return Ok(conn.clone());
            }
        }

        let conn = self.create_connection().await?;

        {
            let mut guard = self.connection.write().await;
            *guard = Some(conn.clone());
        }

        Ok(conn)
    }

    /// Connect and bind with the configured credentials.
    async fn create_connection(&self) -> DirectoryResult<Ldap> {
        debug!(url = %self.config.url, "connecting to directory server");

        let settings = LdapConnSettings::new().set_conn_timeout(std::time::Duration::from_secs(
            self.config.connect_timeout_secs,
        ));

        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &self.config.url)
            .await
            .map_err(|e| {
                DirectoryError::connection_failed_with_source(
                    format!("failed to connect to {}", self.config.url),
                    e,
                )
            })?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "LDAP connection driver error");
            }
        });

        let bind_dn = &self.config.bind_dn;
        let bind_password = self.config.bind_password.as_deref().unwrap_or("");

        debug!(bind_dn = %bind_dn, "performing LDAP bind");

        let result = ldap.simple_bind(bind_dn, bind_password).await.map_err(|e| {
            DirectoryError::connection_failed_with_source(format!("bind failed for {bind_dn}"), e)
        })?;

        if result.rc != 0 {
            // 49 = invalidCredentials
            if result.rc == 49 {
                return Err(DirectoryError::AuthenticationFailed);
            }
            return Err(DirectoryError::connection_failed(format!(
                "bind failed with code {}: {}",
                result.rc, result.text
            )));
        }

        info!(url = %self.config.url, "directory connection established");

        Ok(ldap)
    }

    async fn search(
        &self,
        base: &str,
        scope: Scope,
        filter: &str,
        attrs: Option<Vec<String>>,
    ) -> DirectoryResult<Vec<DirectoryEntry>> {
        let mut ldap = self.get_connection().await?;

        let attrs = attrs.unwrap_or_else(|| vec!["*".to_string()]);

        let (entries, _result) = ldap
            .search(base, scope, filter, &attrs)
            .await
            .map_err(|e| DirectoryError::search_failed_with_source(base, "search request", e))?
            .success()
            .map_err(|e| DirectoryError::search_failed_with_source(base, "search result", e))?;

        debug!(base = %base, filter = %filter, count = entries.len(), "directory search complete");

        Ok(entries
            .into_iter()
            .map(|raw| {
                let parsed = SearchEntry::construct(raw);
                DirectoryEntry::from_attrs(parsed.dn, parsed.attrs)
            })
            .collect())
    }
}

#[async_trait]
impl DirectoryService for LdapDirectory {
    async fn search_base(
        &self,
        dn: &str,
        attrs: Option<Vec<String>>,
    ) -> DirectoryResult<Vec<DirectoryEntry>> {
        self.search(dn, Scope::Base, "(objectClass=*)", attrs).await
    }

    async fn search_subtree(
        &self,
        base: &str,
        filter: &str,
        attrs: Option<Vec<String>>,
    ) -> DirectoryResult<Vec<DirectoryEntry>> {
        self.search(base, Scope::Subtree, filter, attrs).await
    }

    async fn add(&self, dn: &str, attributes: &Attributes) -> DirectoryResult<()> {
        let mut ldap = self.get_connection().await?;

        // Empty value lists are rejected by the server; drop them here.
        let ldif: Vec<(String, HashSet<String>)> = attributes
            .iter()
            .map(|(name, value)| (name.clone(), value.wire_values().into_iter().collect()))
            .filter(|(_, values): &(String, HashSet<String>)| !values.is_empty())
            .collect();

        ldap.add(dn, ldif)
            .await
            .map_err(|e| DirectoryError::add_failed_with_source(dn, "add request", e))?
            .success()
            .map_err(|e| DirectoryError::add_failed_with_source(dn, "add rejected", e))?;

        info!(dn = %dn, "directory entry added");
        Ok(())
    }

    async fn delete(&self, dn: &str) -> DirectoryResult<()> {
        let mut ldap = self.get_connection().await?;

        ldap.delete(dn)
            .await
            .map_err(|e| DirectoryError::delete_failed_with_source(dn, "delete request", e))?
            .success()
            .map_err(|e| DirectoryError::delete_failed_with_source(dn, "delete rejected", e))?;

        info!(dn = %dn, "directory entry deleted");
        Ok(())
    }

    async fn unbind(&self) -> DirectoryResult<()> {
        let conn = {
            let mut guard = self.connection.write().await;
            guard.take()
        };

        if let Some(mut ldap) = conn {
            ldap.unbind()
                .await
                .map_err(|e| DirectoryError::connection_failed_with_source("unbind failed", e))?;
            debug!("directory connection closed");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_dn_value_specials() {
        assert_eq!(escape_dn_value("Doe, Jane"), "Doe\\, Jane");
        assert_eq!(escape_dn_value("a=b"), "a\\=b");
        assert_eq!(escape_dn_value("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_escape_dn_value_edges() {
        assert_eq!(escape_dn_value(" padded "), "\\20padded\\20");
        assert_eq!(escape_dn_value("#tag"), "\\23tag");
        assert_eq!(escape_dn_value(""), "");
        // Interior spaces and hashes pass through.
        assert_eq!(escape_dn_value("Jane # Doe"), "Jane # Doe");
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = DirectoryConfig::new("", "cn=admin", "ou=people");
        assert!(LdapDirectory::new(config).is_err());
    }
}

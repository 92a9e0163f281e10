//! Cohort roster loading from the directory.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use simroll_directory::{escape_dn_value, DirectoryEntry, DirectoryService};

/// One student in a roster snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Display name (`cn`).
    pub name: String,
    /// Unique identifier within the snapshot (`uid`, typically a mail
    /// address).
    pub identifier: String,
}

impl RosterEntry {
    /// Create a roster entry.
    pub fn new(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
        }
    }
}

/// Builds rosters by resolving a group name to its `gidNumber` and
/// collecting the matching user entries.
pub struct RosterLoader {
    directory: Arc<dyn DirectoryService>,
    base_dn: String,
    group_dn: String,
}

impl RosterLoader {
    /// Create a loader over the given directory.
    pub fn new(
        directory: Arc<dyn DirectoryService>,
        base_dn: impl Into<String>,
        group_dn: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            base_dn: base_dn.into(),
            group_dn: group_dn.into(),
        }
    }

    /// Load the roster for a named group.
    ///
    /// Returns an empty roster when the group cannot be resolved or the
    /// membership search fails; the condition is logged and dependent
    /// steps simply see nothing to do. Entries with identical
    /// (name, identifier) pairs are deduplicated, first occurrence
    /// wins.
    pub async fn load(&self, group_name: &str) -> Vec<RosterEntry> {
        let group_name = group_name.trim();
        let group_cn = format!("cn={},{}", escape_dn_value(group_name), self.group_dn);

        let Some(gid) = self.resolve_gid(&group_cn).await else {
            error!(group = %group_name, "invalid group name: gidNumber could not be resolved");
            return Vec::new();
        };

        let filter = format!("(gidNumber={gid})");
        let entries = match self
            .directory
            .search_subtree(
                &self.base_dn,
                &filter,
                Some(vec!["cn".to_string(), "uid".to_string()]),
            )
            .await
        {
            Ok(entries) => entries,
            Err(e) => {
                error!(group = %group_name, error = %e, "roster membership search failed");
                return Vec::new();
            }
        };

        let mut seen: HashSet<RosterEntry> = HashSet::new();
        let mut roster = Vec::new();
        for entry in entries {
            let Some(member) = Self::to_member(&entry) else {
                warn!(dn = %entry.dn, "skipping roster entry without cn/uid");
                continue;
            };
            if seen.insert(member.clone()) {
                roster.push(member);
            }
        }

        info!(group = %group_name, gid, count = roster.len(), "roster loaded");
        roster
    }

    /// Look up a single user by `uid` under the base DN.
    pub async fn find_user(&self, uid: &str) -> Option<RosterEntry> {
        let uid = uid.trim();
        let filter = format!("(uid={uid})");
        match self
            .directory
            .search_subtree(
                &self.base_dn,
                &filter,
                Some(vec!["cn".to_string(), "uid".to_string()]),
            )
            .await
        {
            Ok(entries) => entries.iter().find_map(Self::to_member),
            Err(e) => {
                error!(uid = %uid, error = %e, "user lookup failed");
                None
            }
        }
    }

    /// Resolve a group's `gidNumber` via a base-scope read of its
    /// entry. `None` means the group does not exist or carries no
    /// `gidNumber`.
    async fn resolve_gid(&self, group_cn: &str) -> Option<u32> {
        match self.directory.search_base(group_cn, None).await {
            Ok(entries) => entries.first().and_then(|entry| entry.gid_number),
            Err(e) => {
                error!(group_cn = %group_cn, error = %e, "group lookup failed");
                None
            }
        }
    }

    fn to_member(entry: &DirectoryEntry) -> Option<RosterEntry> {
        match (&entry.cn, &entry.uid) {
            (Some(cn), Some(uid)) => Some(RosterEntry::new(cn, uid)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use simroll_directory::{Attributes, DirectoryError, DirectoryResult};
    use std::collections::HashMap;

    /// Directory stub serving a fixed group and membership list.
    struct StubDirectory {
        gid: Option<u32>,
        members: Vec<(Option<&'static str>, Option<&'static str>)>,
        fail_subtree: bool,
    }

    #[async_trait]
    impl DirectoryService for StubDirectory {
        async fn search_base(
            &self,
            dn: &str,
            _attrs: Option<Vec<String>>,
        ) -> DirectoryResult<Vec<DirectoryEntry>> {
            match self.gid {
                Some(gid) => {
                    let mut attrs = HashMap::new();
                    attrs.insert("gidNumber".to_string(), vec![gid.to_string()]);
                    Ok(vec![DirectoryEntry::from_attrs(dn, attrs)])
                }
                None => Err(DirectoryError::SearchFailed {
                    base: dn.to_string(),
                    message: "no such object".to_string(),
                    source: None,
                }),
            }
        }

        async fn search_subtree(
            &self,
            base: &str,
            _filter: &str,
            _attrs: Option<Vec<String>>,
        ) -> DirectoryResult<Vec<DirectoryEntry>> {
            if self.fail_subtree {
                return Err(DirectoryError::connection_failed("directory down"));
            }
            Ok(self
                .members
                .iter()
                .map(|(cn, uid)| {
                    let mut attrs = HashMap::new();
                    if let Some(cn) = cn {
                        attrs.insert("cn".to_string(), vec![(*cn).to_string()]);
                    }
                    if let Some(uid) = uid {
                        attrs.insert("uid".to_string(), vec![(*uid).to_string()]);
                    }
                    DirectoryEntry::from_attrs(base, attrs)
                })
                .collect())
        }

        async fn add(&self, _dn: &str, _attributes: &Attributes) -> DirectoryResult<()> {
            unimplemented!("not used by roster tests")
        }

        async fn delete(&self, _dn: &str) -> DirectoryResult<()> {
            unimplemented!("not used by roster tests")
        }

        async fn unbind(&self) -> DirectoryResult<()> {
            Ok(())
        }
    }

    fn loader(stub: StubDirectory) -> RosterLoader {
        RosterLoader::new(
            Arc::new(stub),
            "ou=people,dc=example,dc=edu",
            "ou=groups,dc=example,dc=edu",
        )
    }

    #[tokio::test]
    async fn test_load_builds_deduped_roster() {
        let loader = loader(StubDirectory {
            gid: Some(600),
            members: vec![
                (Some("Alice"), Some("a1@x")),
                (Some("Bob"), Some("b1@x")),
                (Some("Alice"), Some("a1@x")),
            ],
            fail_subtree: false,
        });

        let roster = loader.load("cohort-2026").await;
        assert_eq!(
            roster,
            vec![
                RosterEntry::new("Alice", "a1@x"),
                RosterEntry::new("Bob", "b1@x"),
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_group_yields_empty_roster() {
        let loader = loader(StubDirectory {
            gid: None,
            members: vec![(Some("Alice"), Some("a1@x"))],
            fail_subtree: false,
        });

        assert!(loader.load("no-such-cohort").await.is_empty());
    }

    #[tokio::test]
    async fn test_membership_search_failure_yields_empty_roster() {
        let loader = loader(StubDirectory {
            gid: Some(600),
            members: vec![],
            fail_subtree: true,
        });

        assert!(loader.load("cohort-2026").await.is_empty());
    }

    #[tokio::test]
    async fn test_entries_missing_uid_are_skipped() {
        let loader = loader(StubDirectory {
            gid: Some(600),
            members: vec![(Some("Alice"), Some("a1@x")), (Some("Ghost"), None)],
            fail_subtree: false,
        });

        let roster = loader.load("cohort-2026").await;
        assert_eq!(roster, vec![RosterEntry::new("Alice", "a1@x")]);
    }

    #[tokio::test]
    async fn test_find_user_returns_first_match() {
        let loader = loader(StubDirectory {
            gid: Some(600),
            members: vec![(Some("Alice"), Some("a1@x"))],
            fail_subtree: false,
        });

        let found = loader.find_user(" a1@x ").await;
        assert_eq!(found, Some(RosterEntry::new("Alice", "a1@x")));
    }
}

//! Directory entry records.

use std::collections::BTreeMap;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An entry returned from a directory search.
///
/// The attributes simroll consumes are promoted to fixed fields; every
/// other attribute is preserved verbatim in [`DirectoryEntry::extra`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Distinguished name of the entry.
    pub dn: String,

    /// Common name (`cn`), first value.
    pub cn: Option<String>,

    /// User identifier (`uid`), first value.
    pub uid: Option<String>,

    /// Numeric user identifier (`uidNumber`).
    pub uid_number: Option<u32>,

    /// Numeric group identifier (`gidNumber`).
    pub gid_number: Option<u32>,

    /// Remaining attributes, name to values.
    pub extra: BTreeMap<String, Vec<String>>,
}

impl DirectoryEntry {
    /// Build an entry from a raw attribute map as returned by the
    /// server. Known attribute names are matched case-insensitively.
    pub fn from_attrs(dn: impl Into<String>, attrs: HashMap<String, Vec<String>>) -> Self {
        let mut entry = DirectoryEntry {
            dn: dn.into(),
            ..DirectoryEntry::default()
        };

        for (name, values) in attrs {
            match name.to_ascii_lowercase().as_str() {
                "cn" => entry.cn = values.first().cloned(),
                "uid" => entry.uid = values.first().cloned(),
                "uidnumber" => {
                    entry.uid_number = values.first().and_then(|v| v.trim().parse().ok());
                }
                "gidnumber" => {
                    entry.gid_number = values.first().and_then(|v| v.trim().parse().ok());
                }
                _ => {
                    entry.extra.insert(name, values);
                }
            }
        }

        entry
    }

    /// First value of an extension attribute.
    pub fn first_extra(&self, name: &str) -> Option<&str> {
        self.extra
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

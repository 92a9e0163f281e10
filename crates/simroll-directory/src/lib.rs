//! # simroll directory client
//!
//! Typed LDAP surface consumed by the roster and provisioning layers.
//!
//! The crate exposes the [`DirectoryService`] trait — bind, base/subtree
//! search, add, delete — together with a production implementation
//! backed by `ldap3` ([`LdapDirectory`]). Entries come back as
//! [`DirectoryEntry`] records with the handful of attributes simroll
//! cares about promoted to fixed fields and everything else preserved
//! in an open extension map.
//!
//! ## Example
//!
//! ```ignore
//! use simroll_directory::{DirectoryConfig, DirectoryService, LdapDirectory};
//!
//! let config = DirectoryConfig::new(
//!     "ldap://directory.example.edu:389",
//!     "cn=admin,dc=example,dc=edu",
//!     "ou=people,dc=example,dc=edu",
//! )
//! .with_password("secret")
//! .with_group_dn("ou=groups,dc=example,dc=edu");
//!
//! let directory = LdapDirectory::new(config)?;
//! let entries = directory
//!     .search_subtree("ou=people,dc=example,dc=edu", "(gidNumber=5001)", None)
//!     .await?;
//! ```

pub mod attrs;
pub mod client;
pub mod config;
pub mod entry;
pub mod error;

pub use attrs::{AttrValue, Attributes};
pub use client::{escape_dn_value, DirectoryService, LdapDirectory};
pub use config::DirectoryConfig;
pub use entry::DirectoryEntry;
pub use error::{DirectoryError, DirectoryResult};

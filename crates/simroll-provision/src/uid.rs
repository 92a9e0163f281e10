//! Sequential `uidNumber` allocation.

use tracing::info;

use simroll_directory::DirectoryService;

use crate::error::ProvisionResult;

/// Hands out consecutive `uidNumber` values for a provisioning run.
///
/// The counter advances only on successful adds: [`UidAllocator::allocate`]
/// issues the current value, and a failed add is undone with
/// [`UidAllocator::rollback`] so the next row reuses the failed uid.
/// Issued uids therefore only ever correspond to entries that exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UidAllocator {
    next: u32,
}

impl UidAllocator {
    /// Create an allocator whose first issued uid is `next`.
    pub fn starting_at(next: u32) -> Self {
        Self { next }
    }

    /// Seed an allocator from the directory: one past the highest
    /// `uidNumber` found under `base_dn`. An empty subtree seeds from 1.
    pub async fn from_directory(
        directory: &dyn DirectoryService,
        base_dn: &str,
    ) -> ProvisionResult<Self> {
        let entries = directory
            .search_subtree(base_dn, "(cn=*)", Some(vec!["uidNumber".to_string()]))
            .await?;

        let max = entries
            .iter()
            .filter_map(|entry| entry.uid_number)
            .max()
            .unwrap_or(0);

        info!(entries = entries.len(), max_uid = max, "uid allocator seeded");
        Ok(Self::starting_at(max + 1))
    }

    /// The uid the next allocation will issue.
    pub fn peek(&self) -> u32 {
        self.next
    }

    /// Issue the next uid and advance the counter.
    pub fn allocate(&mut self) -> u32 {
        let uid = self.next;
        self.next += 1;
        uid
    }

    /// Undo the most recent allocation so its uid is issued again.
    pub fn rollback(&mut self) {
        self.next = self.next.saturating_sub(1);
    }

    /// The highest uid issued and kept so far. Before any allocation
    /// this is the seed minus one, the directory's existing maximum.
    pub fn last_uid(&self) -> u32 {
        self.next.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use simroll_directory::{
        Attributes, DirectoryEntry, DirectoryError, DirectoryResult,
    };
    use std::collections::HashMap;

    struct UidDirectory {
        uids: Vec<u32>,
        fail: bool,
    }

    #[async_trait]
    impl DirectoryService for UidDirectory {
        async fn search_base(
            &self,
            _dn: &str,
            _attrs: Option<Vec<String>>,
        ) -> DirectoryResult<Vec<DirectoryEntry>> {
            unimplemented!("not used by uid tests")
        }

        async fn search_subtree(
            &self,
            base: &str,
            _filter: &str,
            _attrs: Option<Vec<String>>,
        ) -> DirectoryResult<Vec<DirectoryEntry>> {
            if self.fail {
                return Err(DirectoryError::connection_failed("directory down"));
            }
            Ok(self
                .uids
                .iter()
                .map(|uid| {
                    let mut attrs = HashMap::new();
                    attrs.insert("uidNumber".to_string(), vec![uid.to_string()]);
                    DirectoryEntry::from_attrs(base, attrs)
                })
                .collect())
        }

        async fn add(&self, _dn: &str, _attributes: &Attributes) -> DirectoryResult<()> {
            unimplemented!("not used by uid tests")
        }

        async fn delete(&self, _dn: &str) -> DirectoryResult<()> {
            unimplemented!("not used by uid tests")
        }

        async fn unbind(&self) -> DirectoryResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_consecutive_allocations() {
        let mut allocator = UidAllocator::starting_at(5001);
        let issued: Vec<u32> = (0..4).map(|_| allocator.allocate()).collect();
        assert_eq!(issued, vec![5001, 5002, 5003, 5004]);
        assert_eq!(allocator.peek(), 5005);
        assert_eq!(allocator.last_uid(), 5004);
    }

    #[test]
    fn test_rollback_reissues_failed_uid() {
        let mut allocator = UidAllocator::starting_at(5001);
        assert_eq!(allocator.allocate(), 5001);
        allocator.rollback();
        assert_eq!(allocator.allocate(), 5001);
    }

    #[test]
    fn test_last_uid_before_any_allocation_is_the_existing_maximum() {
        let allocator = UidAllocator::starting_at(5001);
        assert_eq!(allocator.last_uid(), 5000);
        assert_eq!(UidAllocator::starting_at(1).last_uid(), 0);
    }

    #[tokio::test]
    async fn test_seeds_one_past_directory_maximum() {
        let directory = UidDirectory {
            uids: vec![5003, 4999, 5001],
            fail: false,
        };
        let allocator = UidAllocator::from_directory(&directory, "ou=people").await.unwrap();
        assert_eq!(allocator.peek(), 5004);
    }

    #[tokio::test]
    async fn test_empty_subtree_seeds_from_one() {
        let directory = UidDirectory {
            uids: vec![],
            fail: false,
        };
        let allocator = UidAllocator::from_directory(&directory, "ou=people").await.unwrap();
        assert_eq!(allocator.peek(), 1);
    }

    #[tokio::test]
    async fn test_seed_failure_propagates() {
        let directory = UidDirectory {
            uids: vec![],
            fail: true,
        };
        assert!(UidAllocator::from_directory(&directory, "ou=people").await.is_err());
    }
}

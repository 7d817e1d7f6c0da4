//! Seams between the pipeline and the two identity sources

use async_trait::async_trait;

use super::reconcile::{DatabaseAccountList, DirectoryMemberSet};
use crate::error::{DatabaseError, UpstreamRequestError};

/// Source of directory group members
#[async_trait]
pub trait DirectorySource: Send + Sync {
    /// Resolve `group_name` and return its normalized member set
    async fn fetch_group_members(
        &self,
        group_name: &str,
    ) -> Result<DirectoryMemberSet, UpstreamRequestError>;
}

/// Source of database account names
#[async_trait]
pub trait AccountSource: Send + Sync {
    /// Return normalized accounts with excluded names already removed
    async fn fetch_accounts(&self) -> Result<DatabaseAccountList, DatabaseError>;
}

#[cfg(test)]
pub mod mock {
    //! In-memory sources for pipeline tests

    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub struct MockDirectory {
        pub members: Option<Vec<String>>,
        pub calls: AtomicUsize,
    }

    impl MockDirectory {
        pub fn with_members(members: &[&str]) -> Self {
            Self {
                members: Some(members.iter().map(|m| m.to_string()).collect()),
                calls: AtomicUsize::new(0),
            }
        }

        /// A directory where no group matches the requested name
        pub fn without_group() -> Self {
            Self {
                members: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DirectorySource for MockDirectory {
        async fn fetch_group_members(
            &self,
            group_name: &str,
        ) -> Result<DirectoryMemberSet, UpstreamRequestError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.members {
                Some(members) => Ok(members.iter().collect()),
                None => Err(UpstreamRequestError::GroupNotFound(group_name.to_string())),
            }
        }
    }

    pub struct MockAccounts {
        pub accounts: Option<Vec<String>>,
        pub calls: AtomicUsize,
    }

    impl MockAccounts {
        pub fn with_accounts(accounts: &[&str]) -> Self {
            Self {
                accounts: Some(accounts.iter().map(|a| a.to_string()).collect()),
                calls: AtomicUsize::new(0),
            }
        }

        /// A database that cannot be reached
        pub fn failing() -> Self {
            Self {
                accounts: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AccountSource for MockAccounts {
        async fn fetch_accounts(&self) -> Result<DatabaseAccountList, DatabaseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.accounts {
                Some(accounts) => Ok(accounts.iter().collect()),
                None => Err(DatabaseError::Timeout(30)),
            }
        }
    }
}

use serde::Serialize;
use std::borrow::Borrow;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Normalized account name used as the join key between both sources.
///
/// Always trimmed and lower-cased, never empty. Both the directory and the
/// database side go through [`Identifier::normalize`], so comparisons are
/// case-insensitive by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Normalize a raw name. Returns None for blank input.
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Members of the directory group, deduplicated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryMemberSet(HashSet<Identifier>);

impl DirectoryMemberSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw member name. Returns false for blank names and duplicates.
    pub fn insert_raw(&mut self, raw: &str) -> bool {
        match Identifier::normalize(raw) {
            Some(id) => self.0.insert(id),
            None => false,
        }
    }

    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.0.contains(identifier)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Members in ascending order, for display
    pub fn sorted(&self) -> Vec<&Identifier> {
        let mut members: Vec<&Identifier> = self.0.iter().collect();
        members.sort();
        members
    }
}

impl<S: AsRef<str>> FromIterator<S> for DirectoryMemberSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for raw in iter {
            set.insert_raw(raw.as_ref());
        }
        set
    }
}

/// Database accounts, sorted ascending and deduplicated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseAccountList(Vec<Identifier>);

impl DatabaseAccountList {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_identifiers(identifiers: impl IntoIterator<Item = Identifier>) -> Self {
        let mut accounts: Vec<Identifier> = identifiers.into_iter().collect();
        accounts.sort();
        accounts.dedup();
        Self(accounts)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identifier> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for DatabaseAccountList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_identifiers(
            iter.into_iter()
                .filter_map(|raw| Identifier::normalize(raw.as_ref())),
        )
    }
}

/// Classification of one database account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccountStatus {
    #[serde(rename = "valid")]
    Valid,
    #[serde(rename = "needs deletion")]
    NeedsDeletion,
}

impl AccountStatus {
    /// Display label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            AccountStatus::Valid => "Valid account",
            AccountStatus::NeedsDeletion => "Needs to be deleted",
        }
    }
}

/// One line of the comparison table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationRow {
    pub identifier: Identifier,
    pub in_directory_group: bool,
    /// Always true, every row comes from the database side
    pub in_database: bool,
    pub status: AccountStatus,
}

/// Output of [`super::core::reconcile`]. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    rows: Vec<ReconciliationRow>,
    valid: BTreeSet<Identifier>,
    to_delete: BTreeSet<Identifier>,
}

impl ReconciliationResult {
    pub(super) fn new(
        rows: Vec<ReconciliationRow>,
        valid: BTreeSet<Identifier>,
        to_delete: BTreeSet<Identifier>,
    ) -> Self {
        Self {
            rows,
            valid,
            to_delete,
        }
    }

    /// Rows in ascending identifier order
    pub fn rows(&self) -> &[ReconciliationRow] {
        &self.rows
    }

    pub fn valid(&self) -> &BTreeSet<Identifier> {
        &self.valid
    }

    /// Accounts flagged for deletion, sorted
    pub fn to_delete(&self) -> &BTreeSet<Identifier> {
        &self.to_delete
    }
}

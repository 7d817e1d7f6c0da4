//! Exclusion and prefix rules applied to raw database account names

use serde::Deserialize;
use std::collections::BTreeSet;

use crate::services::reconcile::{DatabaseAccountList, Identifier};

/// Accounts every PostgreSQL/RDS instance carries that are never audited
pub const DEFAULT_EXCLUDED_ACCOUNTS: &[&str] = &["postgres", "rdsadmin"];

/// Removes a fixed number of characters from names starting with a literal prefix.
///
/// `strip_len` defaults to the prefix length but may be longer, for naming
/// schemes like `app_` followed by a two-character environment tag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrefixStrip {
    pub prefix: String,
    #[serde(default)]
    pub strip_len: Option<usize>,
}

impl PrefixStrip {
    pub fn new(prefix: impl Into<String>, strip_len: Option<usize>) -> Self {
        Self {
            prefix: prefix.into(),
            strip_len,
        }
    }

    fn effective_len(&self) -> usize {
        self.strip_len.unwrap_or_else(|| self.prefix.chars().count())
    }

    /// Apply to one raw name; names without the prefix pass through unchanged
    pub fn apply<'a>(&self, raw: &'a str) -> &'a str {
        if self.prefix.is_empty() || !raw.starts_with(&self.prefix) {
            return raw;
        }
        match raw.char_indices().nth(self.effective_len()) {
            Some((index, _)) => &raw[index..],
            None => "",
        }
    }
}

/// Turns raw catalog names into the account list fed to reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRules {
    /// Lower-cased names never included in the comparison
    pub excluded: BTreeSet<String>,
    pub prefix_strip: Option<PrefixStrip>,
}

impl Default for AccountRules {
    fn default() -> Self {
        Self {
            excluded: DEFAULT_EXCLUDED_ACCOUNTS.iter().map(|s| s.to_string()).collect(),
            prefix_strip: None,
        }
    }
}

impl AccountRules {
    pub fn new(excluded: impl IntoIterator<Item = String>, prefix_strip: Option<PrefixStrip>) -> Self {
        Self {
            excluded: excluded
                .into_iter()
                .map(|name| name.trim().to_lowercase())
                .filter(|name| !name.is_empty())
                .collect(),
            prefix_strip,
        }
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.contains(&name.trim().to_lowercase())
    }

    /// Normalize one raw name, or None when it must not be compared
    pub fn normalize(&self, raw: &str) -> Option<Identifier> {
        if self.is_excluded(raw) {
            return None;
        }

        let stripped = match &self.prefix_strip {
            Some(rule) => rule.apply(raw),
            None => raw,
        };

        let identifier = Identifier::normalize(stripped)?;
        if self.is_excluded(identifier.as_str()) {
            return None;
        }
        Some(identifier)
    }

    /// Build the sorted, deduplicated account list from raw catalog names
    pub fn build_list<I, S>(&self, raw_names: I) -> DatabaseAccountList
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dropped = 0;
        let identifiers: Vec<Identifier> = raw_names
            .into_iter()
            .filter_map(|raw| {
                let normalized = self.normalize(raw.as_ref());
                if normalized.is_none() {
                    dropped += 1;
                }
                normalized
            })
            .collect();

        let before_dedup = identifiers.len();
        let list = DatabaseAccountList::from_identifiers(identifiers);
        if list.len() < before_dedup {
            log::warn!(
                "{} database accounts collapsed onto an existing name after normalization",
                before_dedup - list.len()
            );
        }
        log::debug!("Dropped {} excluded or blank database accounts", dropped);
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &DatabaseAccountList) -> Vec<&str> {
        list.iter().map(|i| i.as_str()).collect()
    }

    #[test]
    fn test_default_exclusions() {
        let rules = AccountRules::default();
        let list = rules.build_list(["postgres", "alice", "rdsadmin", "bob"]);
        assert_eq!(names(&list), vec!["alice", "bob"]);
    }

    #[test]
    fn test_exclusion_is_case_insensitive() {
        let rules = AccountRules::default();
        assert!(rules.normalize("Postgres").is_none());
        assert!(rules.normalize("RDSADMIN").is_none());
    }

    #[test]
    fn test_prefix_strip_default_length() {
        let rule = PrefixStrip::new("svc_", None);
        assert_eq!(rule.apply("svc_alice"), "alice");
        assert_eq!(rule.apply("alice"), "alice");
    }

    #[test]
    fn test_prefix_strip_longer_than_prefix() {
        let rule = PrefixStrip::new("test", Some(6));
        assert_eq!(rule.apply("test__jdoe"), "jdoe");
        assert_eq!(rule.apply("testab"), "");
        assert_eq!(rule.apply("tes"), "tes");
    }

    #[test]
    fn test_prefix_strip_is_case_sensitive() {
        let rule = PrefixStrip::new("svc_", None);
        assert_eq!(rule.apply("SVC_alice"), "SVC_alice");
    }

    #[test]
    fn test_stripped_name_matching_exclusion_is_dropped() {
        let rules = AccountRules::new(
            vec!["postgres".to_string()],
            Some(PrefixStrip::new("app_", None)),
        );
        assert!(rules.normalize("app_postgres").is_none());
        assert_eq!(rules.normalize("app_Carol").unwrap().as_str(), "carol");
    }

    #[test]
    fn test_blank_after_strip_is_dropped() {
        let rules = AccountRules::new(Vec::new(), Some(PrefixStrip::new("app_", None)));
        assert!(rules.normalize("app_").is_none());
    }

    #[test]
    fn test_list_never_contains_excluded_names() {
        let rules = AccountRules::new(
            vec!["Postgres".to_string(), "rdsadmin".to_string(), "monitor".to_string()],
            Some(PrefixStrip::new("x_", None)),
        );
        let raw = ["postgres", "x_monitor", "rdsadmin", "zed", "x_amy", "MONITOR", "amy"];

        let list = rules.build_list(raw);

        assert_eq!(names(&list), vec!["amy", "zed"]);
        for excluded in &rules.excluded {
            assert!(list.iter().all(|id| id.as_str() != excluded));
        }
    }

    #[test]
    fn test_list_resorted_after_strip() {
        let rules = AccountRules::new(Vec::new(), Some(PrefixStrip::new("a_", None)));
        let list = rules.build_list(["a_zoe", "bob", "carl"]);
        assert_eq!(names(&list), vec!["bob", "carl", "zoe"]);
    }
}

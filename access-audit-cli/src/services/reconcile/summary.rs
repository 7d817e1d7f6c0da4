//! Aggregate counts derived from a reconciliation result

use chrono::{DateTime, Local};
use serde::Serialize;

use super::models::ReconciliationResult;

/// Timestamp layout used in summaries and report footers
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Scalar facts shown in every report's summary block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryFacts {
    pub total_database_accounts: usize,
    pub total_directory_members: usize,
    pub valid_count: usize,
    pub to_delete_count: usize,
    pub generated_at: DateTime<Local>,
}

impl SummaryFacts {
    pub fn build(
        result: &ReconciliationResult,
        total_directory_members: usize,
        generated_at: DateTime<Local>,
    ) -> Self {
        Self {
            total_database_accounts: result.rows().len(),
            total_directory_members,
            valid_count: result.valid().len(),
            to_delete_count: result.to_delete().len(),
            generated_at,
        }
    }

    pub fn generated_at_display(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Fixed-template summary lines consumed by the renderers
    pub fn lines(&self, group_name: &str) -> Vec<String> {
        vec![
            format!("Report generated on: {}", self.generated_at_display()),
            format!("Total accounts in database: {}", self.total_database_accounts),
            format!(
                "Members in directory group '{}': {}",
                group_name, self.total_directory_members
            ),
            format!(
                "Valid accounts (in both database and directory group): {}",
                self.valid_count
            ),
            format!(
                "Accounts that need to be deleted from database: {}",
                self.to_delete_count
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::reconcile::core::reconcile;
    use crate::services::reconcile::models::{DatabaseAccountList, DirectoryMemberSet};
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_counts_from_result() {
        let members: DirectoryMemberSet = ["alice", "bob"].into_iter().collect();
        let accounts: DatabaseAccountList = ["alice", "carol"].into_iter().collect();
        let result = reconcile(&members, &accounts);

        let facts = SummaryFacts::build(&result, members.len(), fixed_time());

        assert_eq!(facts.total_database_accounts, 2);
        assert_eq!(facts.total_directory_members, 2);
        assert_eq!(facts.valid_count, 1);
        assert_eq!(facts.to_delete_count, 1);
    }

    #[test]
    fn test_lines_template() {
        let facts = SummaryFacts {
            total_database_accounts: 4,
            total_directory_members: 10,
            valid_count: 3,
            to_delete_count: 1,
            generated_at: fixed_time(),
        };

        let lines = facts.lines("db-users");

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Report generated on: 2024-03-01 09:30:00");
        assert_eq!(lines[1], "Total accounts in database: 4");
        assert_eq!(lines[2], "Members in directory group 'db-users': 10");
        assert_eq!(lines[3], "Valid accounts (in both database and directory group): 3");
        assert_eq!(lines[4], "Accounts that need to be deleted from database: 1");
    }

    #[test]
    fn test_empty_result_counts_zero() {
        let facts = SummaryFacts::build(&ReconciliationResult::default(), 7, fixed_time());
        assert_eq!(facts.total_database_accounts, 0);
        assert_eq!(facts.to_delete_count, 0);
        assert_eq!(facts.total_directory_members, 7);
    }
}

//! The fetch, reconcile, summarize sequence for one run

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::reconcile::{DatabaseAccountList, ReconciliationResult, SummaryFacts, reconcile};
use super::sources::{AccountSource, DirectorySource};
use crate::error::AuditError;

/// What to do when the database cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseFailurePolicy {
    /// Log the failure and reconcile against an empty account list
    #[default]
    Degrade,
    /// Abort the run with the database error
    Fail,
}

impl FromStr for DatabaseFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "degrade" => Ok(DatabaseFailurePolicy::Degrade),
            "fail" | "strict" => Ok(DatabaseFailurePolicy::Fail),
            other => Err(format!("expected 'degrade' or 'fail', got '{}'", other)),
        }
    }
}

impl fmt::Display for DatabaseFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseFailurePolicy::Degrade => f.write_str("degrade"),
            DatabaseFailurePolicy::Fail => f.write_str("fail"),
        }
    }
}

/// Inputs for a pipeline run that do not come from the sources
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub group_name: String,
    pub database_failure_policy: DatabaseFailurePolicy,
}

/// Everything a run produced, ready for rendering
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub result: ReconciliationResult,
    pub summary: SummaryFacts,
    /// Set when the database failed and the run continued with no accounts
    pub database_degraded: Option<String>,
}

/// Run one reconciliation.
///
/// Directory failures abort before the database is touched. Database
/// failures follow `options.database_failure_policy`.
pub async fn run_pipeline(
    directory: &dyn DirectorySource,
    accounts: &dyn AccountSource,
    options: &PipelineOptions,
    now: DateTime<Local>,
) -> Result<RunOutcome, AuditError> {
    log::info!("Fetching members of directory group '{}'", options.group_name);
    let members = directory.fetch_group_members(&options.group_name).await?;
    log::info!("Directory group has {} members with an identifier", members.len());

    log::info!("Fetching database accounts");
    let (accounts, database_degraded) = match accounts.fetch_accounts().await {
        Ok(accounts) => (accounts, None),
        Err(e) => match options.database_failure_policy {
            DatabaseFailurePolicy::Fail => return Err(e.into()),
            DatabaseFailurePolicy::Degrade => {
                log::error!("{}; continuing with an empty account list", e);
                (DatabaseAccountList::empty(), Some(e.to_string()))
            }
        },
    };
    log::info!("Fetched {} database accounts", accounts.len());

    let result = reconcile(&members, &accounts);
    let summary = SummaryFacts::build(&result, members.len(), now);

    log::info!(
        "Reconciliation complete: {} valid, {} to delete",
        summary.valid_count,
        summary.to_delete_count
    );

    Ok(RunOutcome {
        result,
        summary,
        database_degraded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpstreamRequestError;
    use crate::services::sources::mock::{MockAccounts, MockDirectory};

    fn options(policy: DatabaseFailurePolicy) -> PipelineOptions {
        PipelineOptions {
            group_name: "test".to_string(),
            database_failure_policy: policy,
        }
    }

    #[tokio::test]
    async fn test_run_flags_accounts_outside_group() {
        let directory = MockDirectory::with_members(&["Alice", "bob"]);
        let accounts = MockAccounts::with_accounts(&["alice", "carol"]);

        let outcome = run_pipeline(
            &directory,
            &accounts,
            &options(DatabaseFailurePolicy::Degrade),
            Local::now(),
        )
        .await
        .unwrap();

        let to_delete: Vec<&str> = outcome.result.to_delete().iter().map(|i| i.as_str()).collect();
        assert_eq!(to_delete, vec!["carol"]);
        assert_eq!(outcome.summary.total_directory_members, 2);
        assert!(outcome.database_degraded.is_none());
    }

    #[tokio::test]
    async fn test_database_failure_degrades_to_empty() {
        let directory = MockDirectory::with_members(&["alice"]);
        let accounts = MockAccounts::failing();

        let outcome = run_pipeline(
            &directory,
            &accounts,
            &options(DatabaseFailurePolicy::Degrade),
            Local::now(),
        )
        .await
        .unwrap();

        assert!(outcome.result.to_delete().is_empty());
        assert_eq!(outcome.summary.total_database_accounts, 0);
        assert!(outcome.database_degraded.is_some());
    }

    #[tokio::test]
    async fn test_database_failure_fails_under_strict_policy() {
        let directory = MockDirectory::with_members(&["alice"]);
        let accounts = MockAccounts::failing();

        let err = run_pipeline(
            &directory,
            &accounts,
            &options(DatabaseFailurePolicy::Fail),
            Local::now(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AuditError::Database(_)));
    }

    #[tokio::test]
    async fn test_missing_group_aborts_before_database() {
        let directory = MockDirectory::without_group();
        let accounts = MockAccounts::with_accounts(&["alice"]);

        let err = run_pipeline(
            &directory,
            &accounts,
            &options(DatabaseFailurePolicy::Degrade),
            Local::now(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            AuditError::Upstream(UpstreamRequestError::GroupNotFound(ref name)) if name == "test"
        ));
        assert_eq!(accounts.call_count(), 0);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("degrade".parse(), Ok(DatabaseFailurePolicy::Degrade));
        assert_eq!("FAIL".parse(), Ok(DatabaseFailurePolicy::Fail));
        assert_eq!("strict".parse(), Ok(DatabaseFailurePolicy::Fail));
        assert!("ignore".parse::<DatabaseFailurePolicy>().is_err());
    }
}

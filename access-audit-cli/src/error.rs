//! Error types shared by the fetchers, the pipeline and the command handlers
//!
//! Component seams return these typed errors; command handlers wrap them in
//! `anyhow` with additional context.

use std::path::PathBuf;
use thiserror::Error;

/// Required input missing or unusable. Always raised before any I/O.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Missing required configuration: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },

    #[error("Failed to read config file {}: {reason}", path.display())]
    File { path: PathBuf, reason: String },

    #[error("{}", join_errors(.0))]
    Multiple(Vec<ConfigurationError>),
}

fn join_errors(errors: &[ConfigurationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ConfigurationError {
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Failure talking to the directory service. Aborts the run.
#[derive(Error, Debug)]
pub enum UpstreamRequestError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    #[error("Group '{0}' not found")]
    GroupNotFound(String),

    #[error("Group name '{name}' is ambiguous: {count} groups match")]
    AmbiguousGroup { name: String, count: usize },
}

impl UpstreamRequestError {
    /// Whether a retry of the same request could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            UpstreamRequestError::Transport { .. } => true,
            UpstreamRequestError::Status { status, .. } => is_transient_status(*status),
            _ => false,
        }
    }
}

/// Statuses worth retrying: throttling and gateway/server hiccups
pub fn is_transient_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Failure reading accounts from the database
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Database connection timed out after {0} seconds")]
    Timeout(u64),

    #[error("Account query failed: {0}")]
    Query(#[source] sqlx::Error),
}

/// Umbrella error for one reconciliation run
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Directory request failed: {0}")]
    Upstream(#[from] UpstreamRequestError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_lists_every_key() {
        let err = ConfigurationError::Missing(vec!["DB_HOST".into(), "AZURE_TENANT_ID".into()]);
        assert_eq!(
            err.to_string(),
            "Missing required configuration: DB_HOST, AZURE_TENANT_ID"
        );
    }

    #[test]
    fn test_multiple_joins_messages() {
        let err = ConfigurationError::Multiple(vec![
            ConfigurationError::Missing(vec!["DB_HOST".into()]),
            ConfigurationError::invalid("DB_PORT", "invalid digit found in string"),
        ]);
        assert_eq!(
            err.to_string(),
            "Missing required configuration: DB_HOST; \
             Invalid value for DB_PORT: invalid digit found in string"
        );
    }

    #[test]
    fn test_transient_statuses() {
        for status in [429, 500, 502, 503, 504] {
            assert!(is_transient_status(status));
        }
        for status in [400, 401, 403, 404] {
            assert!(!is_transient_status(status));
        }
    }

    #[test]
    fn test_group_not_found_is_not_transient() {
        let err = UpstreamRequestError::GroupNotFound("test".into());
        assert!(!err.is_transient());
        assert_eq!(err.to_string(), "Group 'test' not found");
    }

    #[test]
    fn test_upstream_wraps_into_audit_error() {
        let err: AuditError = UpstreamRequestError::GroupNotFound("test".into()).into();
        assert!(matches!(err, AuditError::Upstream(_)));
    }
}

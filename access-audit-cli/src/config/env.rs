//! Environment variable names and lookup

pub const DB_HOST: &str = "DB_HOST";
pub const DB_PORT: &str = "DB_PORT";
pub const DB_NAME: &str = "DB_NAME";
pub const DB_USER: &str = "DB_USER";
pub const DB_PASSWORD: &str = "DB_PASSWORD";
pub const DB_CONNECT_TIMEOUT_SECS: &str = "DB_CONNECT_TIMEOUT_SECS";
pub const DB_FAILURE_POLICY: &str = "DB_FAILURE_POLICY";

pub const AZURE_TENANT_ID: &str = "AZURE_TENANT_ID";
pub const AZURE_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const AZURE_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
pub const AZURE_GROUP_NAME: &str = "AZURE_GROUP_NAME";
pub const AZURE_MEMBER_ATTRIBUTE: &str = "AZURE_MEMBER_ATTRIBUTE";
pub const AZURE_AUTHORITY_HOST: &str = "AZURE_AUTHORITY_HOST";
pub const GRAPH_API_URL: &str = "GRAPH_API_URL";
pub const GRAPH_PAGE_SIZE: &str = "GRAPH_PAGE_SIZE";

pub const DEFAULT_USERS: &str = "DEFAULT_USERS";
pub const ACCOUNT_PREFIX: &str = "ACCOUNT_PREFIX";
pub const ACCOUNT_PREFIX_STRIP_LEN: &str = "ACCOUNT_PREFIX_STRIP_LEN";

pub const REPORT_DIR: &str = "REPORT_DIR";
pub const REPORT_FORMATS: &str = "REPORT_FORMATS";

pub const HTTP_MAX_ATTEMPTS: &str = "HTTP_MAX_ATTEMPTS";
pub const HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";

/// Read a variable from the process environment. Blank values count as unset.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Split a comma-separated list, dropping blank entries
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" postgres, rdsadmin ,,replicator "),
            vec!["postgres", "rdsadmin", "replicator"]
        );
        assert!(split_list(" , ").is_empty());
    }
}

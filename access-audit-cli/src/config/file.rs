//! Optional TOML configuration file

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::secret::Secret;
use crate::database::PrefixStrip;
use crate::error::ConfigurationError;
use crate::report::ReportFormat;
use crate::services::DatabaseFailurePolicy;

/// Contents of `config.toml`. Every value is optional; environment
/// variables and CLI flags take precedence.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub database: DatabaseSection,
    pub directory: DirectorySection,
    pub accounts: AccountsSection,
    pub report: ReportSection,
    pub http: HttpSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<Secret>,
    pub connect_timeout_secs: Option<u64>,
    pub on_error: Option<DatabaseFailurePolicy>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectorySection {
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<Secret>,
    pub group_name: Option<String>,
    pub member_attribute: Option<String>,
    pub graph_url: Option<String>,
    pub authority_host: Option<String>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccountsSection {
    pub excluded: Option<Vec<String>>,
    pub strip_prefix: Option<PrefixStrip>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSection {
    pub output_dir: Option<PathBuf>,
    pub file_stem: Option<String>,
    pub formats: Option<Vec<ReportFormat>>,
    pub timestamped: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpSection {
    pub max_attempts: Option<u32>,
    pub base_delay_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Parse TOML text
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigurationError> {
        toml::from_str(text).map_err(|e| ConfigurationError::File {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Read an explicitly requested file. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigurationError::File {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&text, path)
    }

    /// Read the explicit file if given, else the default location if it exists
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigurationError> {
        if let Some(path) = explicit {
            log::debug!("Loading config file {}", path.display());
            return Self::load(path);
        }

        match default_path() {
            Some(path) if path.is_file() => {
                log::debug!("Loading config file {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// `<config dir>/access-audit/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("access-audit").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let text = r#"
            [database]
            host = "db.internal"
            port = 5433
            name = "app"
            user = "auditor"
            password = "pw"
            on_error = "fail"

            [directory]
            tenant_id = "t"
            client_id = "c"
            client_secret = "s"
            group_name = "DB Users"
            page_size = 999

            [accounts]
            excluded = ["postgres", "rdsadmin", "replicator"]
            strip_prefix = { prefix = "test", strip_len = 6 }

            [report]
            output_dir = "reports"
            formats = ["text", "csv"]
            timestamped = true

            [http]
            max_attempts = 5
        "#;

        let config = FileConfig::parse(text, Path::new("config.toml")).unwrap();

        assert_eq!(config.database.port, Some(5433));
        assert_eq!(config.database.on_error, Some(DatabaseFailurePolicy::Fail));
        assert_eq!(config.database.password.unwrap().expose(), "pw");
        assert_eq!(config.directory.group_name.as_deref(), Some("DB Users"));
        assert_eq!(config.directory.page_size, Some(999));
        assert_eq!(config.accounts.excluded.unwrap().len(), 3);
        assert_eq!(
            config.accounts.strip_prefix,
            Some(PrefixStrip::new("test", Some(6)))
        );
        assert_eq!(
            config.report.formats,
            Some(vec![ReportFormat::Text, ReportFormat::Csv])
        );
        assert_eq!(config.http.max_attempts, Some(5));
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = FileConfig::parse("", Path::new("config.toml")).unwrap();
        assert!(config.database.host.is_none());
        assert!(config.report.formats.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = FileConfig::parse("[database]\nhots = \"x\"\n", Path::new("c.toml")).unwrap_err();
        assert!(matches!(err, ConfigurationError::File { .. }));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = FileConfig::discover(Some(Path::new("/nonexistent/access-audit.toml"))).unwrap_err();
        assert!(matches!(err, ConfigurationError::File { .. }));
    }
}

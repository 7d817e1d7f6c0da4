//! Run configuration
//!
//! One `Config` is built at start-up and passed by reference to every
//! component. Values are layered, lowest precedence first: built-in
//! defaults, the TOML file, environment variables (a `.env` file is loaded
//! into the environment by `main`), then CLI flags.

pub mod env;
pub mod file;
pub mod secret;

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub use file::FileConfig;
pub use secret::Secret;

use crate::api::resilience::ResilienceConfig;
use crate::database::{AccountRules, DEFAULT_EXCLUDED_ACCOUNTS, PrefixStrip};
use crate::error::ConfigurationError;
use crate::report::ReportFormat;
use crate::services::DatabaseFailurePolicy;

pub const DEFAULT_GRAPH_URL: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
pub const DEFAULT_MEMBER_ATTRIBUTE: &str = "onPremisesSamAccountName";
pub const DEFAULT_REPORT_STEM: &str = "user_sync_report";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the audited database
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: Secret,
    pub connect_timeout: Duration,
    pub failure_policy: DatabaseFailurePolicy,
}

/// App registration and group settings for the directory
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: Secret,
    pub group_name: String,
    pub member_attribute: String,
    pub graph_base_url: String,
    pub authority_host: String,
    pub page_size: Option<u32>,
    pub resilience: ResilienceConfig,
}

/// Where and how reports are written
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    pub file_stem: String,
    pub formats: Vec<ReportFormat>,
    pub timestamped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub directory: DirectoryConfig,
    pub accounts: AccountRules,
    pub report: ReportConfig,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub group_name: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub formats: Option<Vec<ReportFormat>>,
    pub timestamped: bool,
    pub strict_database: bool,
}

impl Config {
    /// Load from the process environment and the config file
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigurationError> {
        let file = FileConfig::discover(config_path)?;
        Self::resolve(file, &env::process_env, overrides)
    }

    /// Merge all layers and check that every required value is present.
    ///
    /// Every missing key is reported at once, named by its environment
    /// variable, together with every value that failed to parse.
    pub fn resolve(
        file: FileConfig,
        lookup: &dyn Fn(&str) -> Option<String>,
        overrides: &Overrides,
    ) -> Result<Self, ConfigurationError> {
        let mut layers = Layers::new(lookup);
        let FileConfig {
            database: db,
            directory: dir,
            accounts,
            report,
            http,
        } = file;

        let host = layers.required(env::DB_HOST, db.host);
        let port = layers.required_parsed(env::DB_PORT, db.port);
        let name = layers.required(env::DB_NAME, db.name);
        let user = layers.required(env::DB_USER, db.user);
        let password = layers.required_secret(env::DB_PASSWORD, db.password);
        let connect_timeout_secs = layers
            .parsed(env::DB_CONNECT_TIMEOUT_SECS, db.connect_timeout_secs)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);
        let failure_policy = if overrides.strict_database {
            DatabaseFailurePolicy::Fail
        } else {
            layers
                .parsed(env::DB_FAILURE_POLICY, db.on_error)
                .unwrap_or_default()
        };

        let tenant_id = layers.required(env::AZURE_TENANT_ID, dir.tenant_id);
        let client_id = layers.required(env::AZURE_CLIENT_ID, dir.client_id);
        let client_secret = layers.required_secret(env::AZURE_CLIENT_SECRET, dir.client_secret);
        let group_name = match overrides.group_name.clone() {
            Some(group) => group,
            None => layers.required(env::AZURE_GROUP_NAME, dir.group_name),
        };
        let member_attribute = layers
            .string(env::AZURE_MEMBER_ATTRIBUTE, dir.member_attribute)
            .unwrap_or_else(|| DEFAULT_MEMBER_ATTRIBUTE.to_string());
        let graph_base_url = layers
            .string(env::GRAPH_API_URL, dir.graph_url)
            .unwrap_or_else(|| DEFAULT_GRAPH_URL.to_string());
        let authority_host = layers
            .string(env::AZURE_AUTHORITY_HOST, dir.authority_host)
            .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_string());
        let page_size = layers.parsed(env::GRAPH_PAGE_SIZE, dir.page_size);

        let mut resilience = ResilienceConfig::builder();
        if let Some(attempts) = layers.parsed(env::HTTP_MAX_ATTEMPTS, http.max_attempts) {
            resilience = resilience.max_attempts(attempts);
        }
        if let Some(delay_ms) = http.base_delay_ms {
            resilience = resilience.base_delay(Duration::from_millis(delay_ms));
        }
        if let Some(secs) = layers.parsed(env::HTTP_TIMEOUT_SECS, http.timeout_secs) {
            resilience = resilience.request_timeout(Duration::from_secs(secs));
        }

        let excluded = match layers.env(env::DEFAULT_USERS) {
            Some(list) => env::split_list(&list),
            None => accounts.excluded.unwrap_or_else(|| {
                DEFAULT_EXCLUDED_ACCOUNTS.iter().map(|s| s.to_string()).collect()
            }),
        };
        let prefix_strip = match layers.env(env::ACCOUNT_PREFIX) {
            Some(prefix) => {
                let strip_len = layers.parsed::<usize>(env::ACCOUNT_PREFIX_STRIP_LEN, None);
                Some(PrefixStrip::new(prefix, strip_len))
            }
            None => accounts.strip_prefix,
        };

        let output_dir = overrides
            .output_dir
            .clone()
            .or_else(|| layers.env(env::REPORT_DIR).map(PathBuf::from))
            .or(report.output_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        let formats = match overrides.formats.clone() {
            Some(formats) => formats,
            None => match layers.env(env::REPORT_FORMATS) {
                Some(list) => parse_formats(&list).unwrap_or_else(|e| {
                    layers.reject(e);
                    ReportFormat::defaults()
                }),
                None => report.formats.unwrap_or_else(ReportFormat::defaults),
            },
        };
        if formats.is_empty() {
            layers.reject(ConfigurationError::invalid(
                env::REPORT_FORMATS,
                "at least one report format is required",
            ));
        }

        layers.finish()?;

        Ok(Config {
            database: DatabaseConfig {
                host,
                port: port.unwrap_or_default(),
                name,
                user,
                password,
                connect_timeout: Duration::from_secs(connect_timeout_secs),
                failure_policy,
            },
            directory: DirectoryConfig {
                tenant_id,
                client_id,
                client_secret,
                group_name,
                member_attribute,
                graph_base_url,
                authority_host,
                page_size,
                resilience: resilience.build(),
            },
            accounts: AccountRules::new(excluded, prefix_strip),
            report: ReportConfig {
                output_dir,
                file_stem: report
                    .file_stem
                    .unwrap_or_else(|| DEFAULT_REPORT_STEM.to_string()),
                formats,
                timestamped: overrides.timestamped || report.timestamped.unwrap_or(false),
            },
        })
    }

    /// Key/value view with secrets redacted, for `access-audit config`
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        let db = &self.database;
        let dir = &self.directory;
        vec![
            ("database.host", db.host.clone()),
            ("database.port", db.port.to_string()),
            ("database.name", db.name.clone()),
            ("database.user", db.user.clone()),
            ("database.password", db.password.to_string()),
            ("database.connect_timeout", format!("{}s", db.connect_timeout.as_secs())),
            ("database.on_error", db.failure_policy.to_string()),
            ("directory.tenant_id", dir.tenant_id.clone()),
            ("directory.client_id", dir.client_id.clone()),
            ("directory.client_secret", dir.client_secret.to_string()),
            ("directory.group_name", dir.group_name.clone()),
            ("directory.member_attribute", dir.member_attribute.clone()),
            ("directory.graph_url", dir.graph_base_url.clone()),
            ("directory.authority_host", dir.authority_host.clone()),
            (
                "directory.page_size",
                dir.page_size
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "server default".to_string()),
            ),
            (
                "http.max_attempts",
                dir.resilience.retry.max_attempts.to_string(),
            ),
            (
                "http.timeout",
                format!("{}s", dir.resilience.request_timeout.as_secs()),
            ),
            (
                "accounts.excluded",
                self.accounts
                    .excluded
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            (
                "accounts.strip_prefix",
                match &self.accounts.prefix_strip {
                    Some(rule) => format!(
                        "'{}' ({} chars)",
                        rule.prefix,
                        rule.strip_len.unwrap_or(rule.prefix.chars().count())
                    ),
                    None => "none".to_string(),
                },
            ),
            ("report.output_dir", self.report.output_dir.display().to_string()),
            ("report.file_stem", self.report.file_stem.clone()),
            (
                "report.formats",
                self.report
                    .formats
                    .iter()
                    .map(|f| f.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            ("report.timestamped", self.report.timestamped.to_string()),
        ]
    }
}

fn parse_formats(list: &str) -> Result<Vec<ReportFormat>, ConfigurationError> {
    env::split_list(list)
        .iter()
        .map(|f| {
            f.parse::<ReportFormat>()
                .map_err(|e| ConfigurationError::invalid(env::REPORT_FORMATS, e))
        })
        .collect()
}

/// Environment-over-file lookups that remember which required keys are
/// missing and which values were rejected
struct Layers<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
    missing: Vec<String>,
    invalid: Vec<ConfigurationError>,
}

impl<'a> Layers<'a> {
    fn new(lookup: &'a dyn Fn(&str) -> Option<String>) -> Self {
        Self {
            lookup,
            missing: Vec::new(),
            invalid: Vec::new(),
        }
    }

    fn env(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    fn string(&self, key: &str, file: Option<String>) -> Option<String> {
        self.env(key)
            .or(file)
            .filter(|v| !v.trim().is_empty())
    }

    fn required(&mut self, key: &str, file: Option<String>) -> String {
        match self.string(key, file) {
            Some(value) => value,
            None => {
                self.missing.push(key.to_string());
                String::new()
            }
        }
    }

    fn required_secret(&mut self, key: &str, file: Option<Secret>) -> Secret {
        match self.env(key).map(Secret::new).or(file) {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                self.missing.push(key.to_string());
                Secret::default()
            }
        }
    }

    /// Unparseable environment values are recorded and read as absent
    fn parsed<T>(&mut self, key: &str, file: Option<T>) -> Option<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.env(key) {
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(value) => Some(value),
                Err(e) => {
                    self.reject(ConfigurationError::invalid(key, e.to_string()));
                    None
                }
            },
            None => file,
        }
    }

    fn required_parsed<T>(&mut self, key: &str, file: Option<T>) -> Option<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        if self.env(key).is_none() && file.is_none() {
            self.missing.push(key.to_string());
            return None;
        }
        self.parsed(key, file)
    }

    fn reject(&mut self, err: ConfigurationError) {
        self.invalid.push(err);
    }

    fn finish(self) -> Result<(), ConfigurationError> {
        let mut errors = Vec::with_capacity(self.invalid.len() + 1);
        if !self.missing.is_empty() {
            errors.push(ConfigurationError::Missing(self.missing));
        }
        errors.extend(self.invalid);

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ConfigurationError::Multiple(errors)),
        }
    }
}

//! PostgreSQL account reader

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{Connection, Row};
use std::time::Duration;

use super::normalize::AccountRules;
use crate::config::DatabaseConfig;
use crate::error::DatabaseError;
use crate::services::AccountSource;
use crate::services::reconcile::DatabaseAccountList;

/// Catalog query listing every login role visible to the connecting user
pub const ACCOUNT_QUERY: &str = "SELECT usename FROM pg_catalog.pg_user ORDER BY usename";

/// Reads account names from `pg_catalog.pg_user` over a single connection
pub struct PostgresAccountSource {
    options: PgConnectOptions,
    connect_timeout: Duration,
    rules: AccountRules,
}

impl PostgresAccountSource {
    pub fn new(config: &DatabaseConfig, rules: AccountRules) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.name)
            .username(&config.user)
            .password(config.password.expose())
            .application_name("access-audit");

        Self {
            options,
            connect_timeout: config.connect_timeout,
            rules,
        }
    }

    async fn connect(&self) -> Result<PgConnection, DatabaseError> {
        match tokio::time::timeout(self.connect_timeout, PgConnection::connect_with(&self.options))
            .await
        {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(DatabaseError::Connection(e)),
            Err(_) => Err(DatabaseError::Timeout(self.connect_timeout.as_secs())),
        }
    }

    /// Raw account names in catalog order, before any rule is applied
    pub async fn fetch_raw_names(&self) -> Result<Vec<String>, DatabaseError> {
        let mut conn = self.connect().await?;

        let rows = sqlx::query(ACCOUNT_QUERY)
            .fetch_all(&mut conn)
            .await
            .map_err(DatabaseError::Query)?;

        let mut names = Vec::with_capacity(rows.len());
        for row in rows {
            // usename is `name`, which decodes as text
            let name: String = row.try_get("usename").map_err(DatabaseError::Query)?;
            names.push(name);
        }

        if let Err(e) = conn.close().await {
            log::debug!("Error closing database connection: {}", e);
        }

        Ok(names)
    }
}

#[async_trait]
impl AccountSource for PostgresAccountSource {
    async fn fetch_accounts(&self) -> Result<DatabaseAccountList, DatabaseError> {
        log::info!("Fetching users from PostgreSQL database");

        let raw = self.fetch_raw_names().await?;
        let total = raw.len();
        let accounts = self.rules.build_list(raw);

        log::info!(
            "Fetched {} users from PostgreSQL ({} after exclusions)",
            total,
            accounts.len()
        );
        Ok(accounts)
    }
}

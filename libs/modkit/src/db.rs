//! Database connection settings and startup connect with retries.

use std::{future::Future, pin::Pin, time::Duration};

use anyhow::Context;
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};

pub use sea_orm::ConnectionTrait as DbConnTrait;

/// `database` section of the server config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `sqlite://file.db?mode=rwc`, `sqlite::memory:`, `postgres://...`
    pub dsn: String,
    pub max_conns: u32,
    pub min_conns: u32,
    pub acquire_timeout_secs: u64,
    /// Attempts made before startup gives up on the database.
    pub connect_attempts: u32,
    pub retry_delay_ms: u64,
    /// Log every SQL statement at debug level.
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite://parkour.db?mode=rwc".to_owned(),
            max_conns: 10,
            min_conns: 0,
            acquire_timeout_secs: 5,
            connect_attempts: 30,
            retry_delay_ms: 1000,
            sqlx_logging: false,
        }
    }
}

impl DatabaseConfig {
    /// Throwaway in-memory SQLite database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            dsn: "sqlite::memory:".to_owned(),
            connect_attempts: 1,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.dsn.contains(":memory:") || self.dsn.contains("mode=memory")
    }

    /// Connection string with any password replaced, for logs.
    #[must_use]
    pub fn redacted_dsn(&self) -> String {
        let Some((scheme, rest)) = self.dsn.split_once("://") else {
            return self.dsn.clone();
        };
        let Some((userinfo, host)) = rest.split_once('@') else {
            return self.dsn.clone();
        };
        match userinfo.split_once(':') {
            Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
            None => self.dsn.clone(),
        }
    }
}

/// Open a connection pool.
///
/// An in-memory SQLite database lives only as long as its connection, so
/// for those the pool is pinned to a single long-lived connection.
///
/// # Errors
/// Returns the driver error when the pool cannot be opened.
pub async fn connect(cfg: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(cfg.dsn.clone());
    opts.acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);

    if cfg.is_in_memory() {
        let forever = Duration::from_secs(60 * 60 * 24 * 365);
        opts.max_connections(1)
            .min_connections(1)
            .idle_timeout(forever)
            .max_lifetime(forever);
    } else {
        opts.max_connections(cfg.max_conns)
            .min_connections(cfg.min_conns);
    }

    Database::connect(opts).await
}

/// Open a connection pool, retrying while the database comes up.
///
/// # Errors
/// Fails once `connect_attempts` attempts have failed.
pub async fn connect_with_retry(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let attempts = cfg.connect_attempts.max(1);
    let delay = Duration::from_millis(cfg.retry_delay_ms);
    let mut attempt = 1;

    loop {
        match connect(cfg).await {
            Ok(db) => {
                tracing::info!(dsn = %cfg.redacted_dsn(), attempt, "database connected");
                return Ok(db);
            }
            Err(e) if attempt < attempts => {
                tracing::warn!(
                    dsn = %cfg.redacted_dsn(),
                    attempt,
                    attempts,
                    error = %e,
                    "database not ready, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!(
                        "database {} unavailable after {attempts} attempts",
                        cfg.redacted_dsn()
                    )
                });
            }
        }
    }
}

/// Run `f` inside a transaction, committing on `Ok` and rolling back on `Err`.
///
/// Driver errors from begin/commit are mapped into the caller's error type,
/// so services keep returning their own domain errors.
///
/// # Errors
/// Returns the closure's error, or the mapped driver error if the
/// transaction cannot be started or committed.
pub async fn transaction_mapped<F, T, E>(db: &DatabaseConnection, f: F) -> Result<T, E>
where
    E: From<DbErr> + Send,
    F: for<'a> FnOnce(
            &'a DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>
        + Send,
    T: Send,
{
    let txn = db.begin().await.map_err(E::from)?;
    let res = f(&txn).await;

    match res {
        Ok(v) => {
            txn.commit().await.map_err(E::from)?;
            Ok(v)
        }
        Err(e) => {
            if let Err(rb) = txn.rollback().await {
                tracing::warn!(error = %rb, "transaction rollback failed");
            }
            Err(e)
        }
    }
}

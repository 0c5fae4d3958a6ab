//! Database connection management for the inventory store.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;

/// Errors from inventory store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Invalid status value in devices table: {0}")]
    InvalidStatus(String),
}

/// Configuration for connecting to the inventory database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// sqlx connection URL, e.g. `sqlite://netwatch.db` or `sqlite::memory:`.
    pub url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://netwatch.db".to_string(),
        }
    }
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS devices (
    ip          TEXT PRIMARY KEY,
    status      TEXT NOT NULL,
    fingerprint TEXT NOT NULL,
    domain      TEXT,
    last_seen   TEXT NOT NULL
)";

/// Handle on the inventory database.
///
/// Holds a single connection. The monitor opens one handle at the start of
/// each reconciliation cycle and drops it on every exit path, so the
/// connection never outlives the cycle that acquired it.
pub struct InventoryStore {
    pub(crate) conn: SqliteConnection,
}

impl InventoryStore {
    /// Connect to the database and ensure the devices table exists.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| StoreError::Connection(e.to_string()))?
            .create_if_missing(true);

        let mut conn = SqliteConnection::connect_with(&options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        sqlx::query(SCHEMA).execute(&mut conn).await?;

        tracing::debug!(url = %config.url, "Database connection established");
        Ok(Self { conn })
    }

    /// Close the connection, flushing any outstanding work.
    pub async fn close(self) -> Result<(), StoreError> {
        self.conn.close().await?;
        Ok(())
    }
}

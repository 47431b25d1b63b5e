use std::{str::FromStr, time::Duration};

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions},
    ConnectOptions,
};

use super::migrations;

/// Connection pool with the schema migrated.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connects to `database_url` (e.g. `sqlite://books.db`), creating the file if missing.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let connect_options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid database url")?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(30))
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(connect_options)
            .await
            .context("Failed to connect to database")?;

        Self::from_pool(pool).await
    }

    /// In-memory database. Every connection to `sqlite::memory:` is its own database,
    /// so the pool is pinned to a single connection that never expires.
    pub async fn new_in_memory() -> anyhow::Result<Self> {
        let connect_options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Invalid database url")?
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await
            .context("Failed to create in-memory database")?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        migrations::run_migrations(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

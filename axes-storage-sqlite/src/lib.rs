//! SQLite storage backend for axes.
//!
//! ```rust,ignore
//! use axes_storage_sqlite::SqliteStorage;
//!
//! let storage = SqliteStorage::connect("sqlite://axes.db").await?;
//! storage.migrate().await?;
//! let service = AccessService::new(Arc::new(storage.repositories()));
//! ```

pub mod migrations;
pub mod repositories;

use std::str::FromStr;

use axes_core::{Error, error::StorageError};
use serde::Deserialize;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub use repositories::{
    SqliteAccessAttemptRepository, SqliteAccessLogRepository, SqliteRepositoryProvider,
};

/// Connection settings for [`SqliteStorage::connect_with`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    pub url: String,
    pub max_connections: u32,
    pub create_if_missing: bool,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 5,
            create_if_missing: true,
        }
    }
}

#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect with default pool settings.
    pub async fn connect(url: &str) -> Result<Self, Error> {
        Self::connect_with(&SqliteConfig {
            url: url.to_string(),
            ..Default::default()
        })
        .await
    }

    pub async fn connect_with(config: &SqliteConfig) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .create_if_missing(config.create_if_missing);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, url = %config.url, "Failed to connect to SQLite");
                StorageError::Connection(e.to_string())
            })?;

        tracing::debug!(url = %config.url, "Connected to SQLite");
        Ok(Self::new(pool))
    }

    /// Apply all pending migrations.
    pub async fn migrate(&self) -> Result<(), Error> {
        migrations::run_migrations(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Repository provider sharing this storage's pool.
    pub fn repositories(&self) -> SqliteRepositoryProvider {
        SqliteRepositoryProvider::new(self.pool.clone())
    }
}

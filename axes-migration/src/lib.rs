//! Schema migrations for axes storage backends.
//!
//! Each backend lists its migrations as `Box<dyn Migration<DB>>` values and
//! applies them through its [`MigrationManager`], which records the applied
//! versions in a tracking table.
//!
//! The axes schema is small and grows by appending versions:
//!
//! | Version | Creates |
//! |---|---|
//! | 1 | `axes_accessattempt` |
//! | 2 | `axes_accesslog` |
//! | 3 | `attempt_time` indexes on both tables, username and IP indexes on attempts |
//!
//! Versions are never renumbered. A column change ships as a new version with
//! its own `down`, so rolling back in reverse order restores every step.

use async_trait::async_trait;
use axes_core::error::StorageError;
use sqlx::Database;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Migration failed: {0}")]
    Migration(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<MigrationError> for axes_core::Error {
    fn from(error: MigrationError) -> Self {
        StorageError::Migration(error.to_string()).into()
    }
}

pub type Result<T> = std::result::Result<T, MigrationError>;

/// One step of the axes schema, applied inside its own transaction.
#[async_trait]
pub trait Migration<DB: Database>: Send + Sync {
    /// Execute the migration
    async fn up<'a>(&'a self, conn: &'a mut <DB as Database>::Connection) -> Result<()>;

    /// Rollback the migration
    async fn down<'a>(&'a self, conn: &'a mut <DB as Database>::Connection) -> Result<()>;

    /// Unique version number for ordering migrations
    fn version(&self) -> i64;

    /// Human readable name of the migration
    fn name(&self) -> &str;
}

/// Row of the tracking table, one per applied axes schema version.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: i64, // unix seconds, like every other timestamp we store
}

#[async_trait]
pub trait MigrationManager<DB: Database>: Send + Sync {
    fn get_migration_table_name(&self) -> &str {
        "_axes_migrations"
    }

    /// Initialize migration tracking table
    async fn initialize(&self) -> Result<()>;

    /// Apply pending migrations in the given order
    async fn up(&self, migrations: &[Box<dyn Migration<DB>>]) -> Result<()>;

    /// Rollback applied migrations in the given order
    async fn down(&self, migrations: &[Box<dyn Migration<DB>>]) -> Result<()>;

    /// Get list of applied migrations
    async fn get_applied_migrations(&self) -> Result<Vec<MigrationRecord>>;

    /// Check if specific migration was applied
    async fn is_applied(&self, version: i64) -> Result<bool>;
}

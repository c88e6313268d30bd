//! SQLite schema for access attempts and access logs.

use async_trait::async_trait;
use axes_migration::{Migration, MigrationError, MigrationManager, MigrationRecord};
use chrono::Utc;
use sqlx::{Database, Sqlite, SqlitePool};

pub struct SqliteMigrationManager {
    pool: SqlitePool,
}

impl SqliteMigrationManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// All SQLite migrations, in the order they are applied.
pub fn migrations() -> Vec<Box<dyn Migration<Sqlite>>> {
    vec![
        Box::new(CreateAccessAttemptsTable),
        Box::new(CreateAccessLogsTable),
        Box::new(CreateAccessIndexes),
    ]
}

/// Create the tracking table and apply every pending migration.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrationError> {
    let manager = SqliteMigrationManager::new(pool.clone());
    manager.initialize().await?;
    manager.up(&migrations()).await
}

#[async_trait]
impl MigrationManager<Sqlite> for SqliteMigrationManager {
    async fn initialize(&self) -> Result<(), MigrationError> {
        let table = self.get_migration_table_name();
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at INTEGER NOT NULL DEFAULT (unixepoch())
            );"#
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn up(&self, migrations: &[Box<dyn Migration<Sqlite>>]) -> Result<(), MigrationError> {
        let table = self.get_migration_table_name();
        for migration in migrations {
            if self.is_applied(migration.version()).await? {
                continue;
            }

            let mut tx = self.pool.begin().await?;
            tracing::info!(
                version = migration.version(),
                name = migration.name(),
                "Applying migration"
            );

            migration
                .up(&mut *tx as &mut <Sqlite as Database>::Connection)
                .await?;

            sqlx::query(&format!(
                "INSERT INTO {table} (version, name, applied_at) VALUES (?, ?, ?)"
            ))
            .bind(migration.version())
            .bind(migration.name())
            .bind(Utc::now().timestamp())
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
        }
        Ok(())
    }

    async fn down(&self, migrations: &[Box<dyn Migration<Sqlite>>]) -> Result<(), MigrationError> {
        let table = self.get_migration_table_name();
        for migration in migrations {
            if !self.is_applied(migration.version()).await? {
                continue;
            }

            let mut tx = self.pool.begin().await?;
            tracing::info!(
                version = migration.version(),
                name = migration.name(),
                "Rolling back migration"
            );

            migration
                .down(&mut *tx as &mut <Sqlite as Database>::Connection)
                .await?;

            sqlx::query(&format!("DELETE FROM {table} WHERE version = ?"))
                .bind(migration.version())
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
        }
        Ok(())
    }

    async fn get_applied_migrations(&self) -> Result<Vec<MigrationRecord>, MigrationError> {
        let table = self.get_migration_table_name();
        let records = sqlx::query_as::<_, MigrationRecord>(&format!(
            "SELECT version, name, applied_at FROM {table} ORDER BY version"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn is_applied(&self, version: i64) -> Result<bool, MigrationError> {
        let table = self.get_migration_table_name();
        let applied: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE version = ?)"
        ))
        .bind(version)
        .fetch_one(&self.pool)
        .await?;
        Ok(applied)
    }
}

pub struct CreateAccessAttemptsTable;

#[async_trait]
impl Migration<Sqlite> for CreateAccessAttemptsTable {
    fn version(&self) -> i64 {
        1
    }

    fn name(&self) -> &str {
        "CreateAccessAttemptsTable"
    }

    async fn up<'a>(
        &'a self,
        conn: &'a mut <Sqlite as Database>::Connection,
    ) -> Result<(), MigrationError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS axes_accessattempt (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_agent TEXT NOT NULL CHECK (length(user_agent) <= 255),
                ip_address TEXT,
                username TEXT CHECK (username IS NULL OR length(username) <= 255),
                trusted BOOLEAN NOT NULL DEFAULT 0,
                http_accept TEXT NOT NULL CHECK (length(http_accept) <= 1025),
                path_info TEXT NOT NULL CHECK (length(path_info) <= 255),
                attempt_time INTEGER NOT NULL DEFAULT (unixepoch()),
                get_data TEXT NOT NULL,
                post_data TEXT NOT NULL,
                failures_since_start INTEGER NOT NULL CHECK (failures_since_start >= 0)
            );"#,
        )
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn down<'a>(
        &'a self,
        conn: &'a mut <Sqlite as Database>::Connection,
    ) -> Result<(), MigrationError> {
        sqlx::query("DROP TABLE IF EXISTS axes_accessattempt")
            .execute(conn)
            .await?;
        Ok(())
    }
}

pub struct CreateAccessLogsTable;

#[async_trait]
impl Migration<Sqlite> for CreateAccessLogsTable {
    fn version(&self) -> i64 {
        2
    }

    fn name(&self) -> &str {
        "CreateAccessLogsTable"
    }

    async fn up<'a>(
        &'a self,
        conn: &'a mut <Sqlite as Database>::Connection,
    ) -> Result<(), MigrationError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS axes_accesslog (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_agent TEXT NOT NULL CHECK (length(user_agent) <= 255),
                ip_address TEXT,
                username TEXT CHECK (username IS NULL OR length(username) <= 255),
                trusted BOOLEAN NOT NULL DEFAULT 0,
                http_accept TEXT NOT NULL CHECK (length(http_accept) <= 1025),
                path_info TEXT NOT NULL CHECK (length(path_info) <= 255),
                attempt_time INTEGER NOT NULL DEFAULT (unixepoch()),
                logout_time INTEGER
            );"#,
        )
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn down<'a>(
        &'a self,
        conn: &'a mut <Sqlite as Database>::Connection,
    ) -> Result<(), MigrationError> {
        sqlx::query("DROP TABLE IF EXISTS axes_accesslog")
            .execute(conn)
            .await?;
        Ok(())
    }
}

pub struct CreateAccessIndexes;

#[async_trait]
impl Migration<Sqlite> for CreateAccessIndexes {
    fn version(&self) -> i64 {
        3
    }

    fn name(&self) -> &str {
        "CreateAccessIndexes"
    }

    async fn up<'a>(
        &'a self,
        conn: &'a mut <Sqlite as Database>::Connection,
    ) -> Result<(), MigrationError> {
        for statement in [
            "CREATE INDEX IF NOT EXISTS idx_accessattempt_attempt_time ON axes_accessattempt(attempt_time)",
            "CREATE INDEX IF NOT EXISTS idx_accessattempt_username ON axes_accessattempt(username)",
            "CREATE INDEX IF NOT EXISTS idx_accessattempt_ip_address ON axes_accessattempt(ip_address)",
            "CREATE INDEX IF NOT EXISTS idx_accesslog_attempt_time ON axes_accesslog(attempt_time)",
        ] {
            sqlx::query(statement).execute(&mut *conn).await?;
        }
        Ok(())
    }

    async fn down<'a>(
        &'a self,
        conn: &'a mut <Sqlite as Database>::Connection,
    ) -> Result<(), MigrationError> {
        for index in [
            "idx_accessattempt_attempt_time",
            "idx_accessattempt_username",
            "idx_accessattempt_ip_address",
            "idx_accesslog_attempt_time",
        ] {
            sqlx::query(&format!("DROP INDEX IF EXISTS {index}"))
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }
}

//! Repository implementations for SQLite storage

pub mod attempt;
pub mod log;

pub use attempt::SqliteAccessAttemptRepository;
pub use log::SqliteAccessLogRepository;

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axes_core::{
    AccessQuery, Error,
    error::{StorageError, ValidationError},
    repositories::{AccessAttemptRepositoryProvider, AccessLogRepositoryProvider, RepositoryProvider},
};
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Repository provider implementation for SQLite
pub struct SqliteRepositoryProvider {
    pool: SqlitePool,
    attempts: Arc<SqliteAccessAttemptRepository>,
    logs: Arc<SqliteAccessLogRepository>,
}

impl SqliteRepositoryProvider {
    pub fn new(pool: SqlitePool) -> Self {
        let attempts = Arc::new(SqliteAccessAttemptRepository::new(pool.clone()));
        let logs = Arc::new(SqliteAccessLogRepository::new(pool.clone()));

        Self {
            pool,
            attempts,
            logs,
        }
    }
}

impl AccessAttemptRepositoryProvider for SqliteRepositoryProvider {
    type AttemptRepo = SqliteAccessAttemptRepository;

    fn attempts(&self) -> &Self::AttemptRepo {
        &self.attempts
    }
}

impl AccessLogRepositoryProvider for SqliteRepositoryProvider {
    type LogRepo = SqliteAccessLogRepository;

    fn logs(&self) -> &Self::LogRepo {
        &self.logs
    }
}

#[async_trait]
impl RepositoryProvider for SqliteRepositoryProvider {
    async fn migrate(&self) -> Result<(), Error> {
        crate::migrations::run_migrations(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}

pub(crate) fn to_datetime(timestamp: i64) -> Result<DateTime<Utc>, Error> {
    DateTime::from_timestamp(timestamp, 0)
        .ok_or(ValidationError::InvalidTimestamp(timestamp))
        .map_err(Error::from)
}

pub(crate) fn to_ip_address(value: Option<String>) -> Result<Option<IpAddr>, Error> {
    value
        .map(|ip| {
            ip.parse::<IpAddr>()
                .map_err(|_| Error::from(ValidationError::InvalidIpAddress(ip.clone())))
        })
        .transpose()
}

/// Smallest whole second not earlier than `time`.
///
/// Stored times are whole seconds, so `attempt_time >= time` and
/// `attempt_time < time` hold exactly when they hold against this value.
pub(crate) fn ceil_timestamp(time: DateTime<Utc>) -> i64 {
    time.timestamp() + i64::from(time.timestamp_subsec_nanos() > 0)
}

/// Append the `WHERE` clause for `query` to a statement on an access table.
pub(crate) fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, query: &AccessQuery) {
    builder.push(" WHERE 1 = 1");
    if let Some(username) = &query.username {
        builder.push(" AND username = ").push_bind(username.clone());
    }
    if let Some(ip_address) = query.ip_address {
        builder
            .push(" AND ip_address = ")
            .push_bind(ip_address.to_string());
    }
    if let Some(since) = query.since {
        builder
            .push(" AND attempt_time >= ")
            .push_bind(ceil_timestamp(since));
    }
}

/// Append the default ordering and the optional limit.
pub(crate) fn push_order_and_limit(builder: &mut QueryBuilder<'_, Sqlite>, query: &AccessQuery) {
    builder.push(" ORDER BY attempt_time DESC, id DESC");
    if let Some(limit) = query.limit {
        builder.push(" LIMIT ").push_bind(i64::from(limit));
    }
}

/// Map an insert error, turning CHECK and UNIQUE failures into constraint errors.
pub(crate) fn map_insert_err(error: sqlx::Error, context: &str) -> Error {
    if let sqlx::Error::Database(db) = &error {
        if db.is_check_violation() || db.is_unique_violation() {
            tracing::warn!(error = %error, "{context}");
            return StorageError::Constraint(db.message().to_string()).into();
        }
    }
    tracing::error!(error = %error, "{context}");
    StorageError::Database(format!("{context}: {error}")).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ceil_timestamp() {
        let whole = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(ceil_timestamp(whole), whole.timestamp());
        assert_eq!(
            ceil_timestamp(whole + chrono::Duration::milliseconds(500)),
            whole.timestamp() + 1
        );
        assert_eq!(
            ceil_timestamp(whole - chrono::Duration::nanoseconds(1)),
            whole.timestamp()
        );
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axes_core::NewAccessRecord;
    use sqlx::SqlitePool;

    pub async fn setup_test_db() -> SqlitePool {
        let _ = tracing_subscriber::fmt().try_init();

        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create pool");
        crate::migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    pub fn access(username: &str, ip: &str) -> NewAccessRecord {
        NewAccessRecord::builder()
            .user_agent("Mozilla/5.0")
            .ip_address(ip.parse().unwrap())
            .username(username)
            .http_accept("text/html,application/xhtml+xml")
            .path_info("/admin/login/")
            .build()
            .unwrap()
    }

    /// Pin one row of `table` to the given unix second.
    pub async fn set_attempt_time(pool: &SqlitePool, table: &str, id: i64, timestamp: i64) {
        sqlx::query(&format!("UPDATE {table} SET attempt_time = ? WHERE id = ?"))
            .bind(timestamp)
            .bind(id)
            .execute(pool)
            .await
            .expect("Failed to set attempt time");
    }

    /// Move one row of `table` back by `seconds`.
    pub async fn age_row(pool: &SqlitePool, table: &str, id: i64, seconds: i64) {
        sqlx::query(&format!(
            "UPDATE {table} SET attempt_time = attempt_time - ? WHERE id = ?"
        ))
        .bind(seconds)
        .bind(id)
        .execute(pool)
        .await
        .expect("Failed to age row");
    }
}

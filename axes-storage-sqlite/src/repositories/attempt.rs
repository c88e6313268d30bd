//! SQLite implementation of the access attempt repository.

use async_trait::async_trait;
use axes_core::{
    AccessAttempt, AccessQuery, Error, NewAccessAttempt, NewAccessRecord,
    error::{ValidationError, utilities::DatabaseResultExt},
    repositories::AccessAttemptRepository,
    validation::validate_access_record,
};
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{
    ceil_timestamp, map_insert_err, push_filters, push_order_and_limit, to_datetime,
    to_ip_address,
};

const COLUMNS: &str = "id, user_agent, ip_address, username, trusted, http_accept, path_info, \
                       attempt_time, get_data, post_data, failures_since_start";

/// SQLite repository for access attempts.
pub struct SqliteAccessAttemptRepository {
    pool: SqlitePool,
}

impl SqliteAccessAttemptRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Internal struct for query results
#[derive(Debug, sqlx::FromRow)]
struct SqliteAccessAttempt {
    id: i64,
    user_agent: String,
    ip_address: Option<String>,
    username: Option<String>,
    trusted: bool,
    http_accept: String,
    path_info: String,
    attempt_time: i64,
    get_data: String,
    post_data: String,
    failures_since_start: i64,
}

impl TryFrom<SqliteAccessAttempt> for AccessAttempt {
    type Error = Error;

    fn try_from(row: SqliteAccessAttempt) -> Result<Self, Self::Error> {
        let failures_since_start = u32::try_from(row.failures_since_start).map_err(|_| {
            ValidationError::InvalidField(format!(
                "failures_since_start out of range: {}",
                row.failures_since_start
            ))
        })?;

        let access = NewAccessRecord {
            user_agent: row.user_agent,
            ip_address: to_ip_address(row.ip_address)?,
            username: row.username,
            trusted: row.trusted,
            http_accept: row.http_accept,
            path_info: row.path_info,
        };

        Ok(NewAccessAttempt {
            access,
            get_data: row.get_data,
            post_data: row.post_data,
            failures_since_start,
        }
        .into_attempt(row.id, to_datetime(row.attempt_time)?))
    }
}

#[async_trait]
impl AccessAttemptRepository for SqliteAccessAttemptRepository {
    async fn create(&self, attempt: NewAccessAttempt) -> Result<AccessAttempt, Error> {
        validate_access_record(&attempt.access)?;

        let now = Utc::now().timestamp();

        let row = sqlx::query_as::<_, SqliteAccessAttempt>(&format!(
            r#"
            INSERT INTO axes_accessattempt
                (user_agent, ip_address, username, trusted, http_accept, path_info,
                 attempt_time, get_data, post_data, failures_since_start)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&attempt.access.user_agent)
        .bind(attempt.access.ip_address.map(|ip| ip.to_string()))
        .bind(&attempt.access.username)
        .bind(attempt.access.trusted)
        .bind(&attempt.access.http_accept)
        .bind(&attempt.access.path_info)
        .bind(now)
        .bind(&attempt.get_data)
        .bind(&attempt.post_data)
        .bind(i64::from(attempt.failures_since_start))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_err(e, "Failed to record access attempt"))?;

        row.try_into()
    }

    async fn get(&self, id: i64) -> Result<Option<AccessAttempt>, Error> {
        let row = sqlx::query_as::<_, SqliteAccessAttempt>(&format!(
            "SELECT {COLUMNS} FROM axes_accessattempt WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_db_err_with_context("Failed to get access attempt")?;

        row.map(AccessAttempt::try_from).transpose()
    }

    async fn list(&self, query: &AccessQuery) -> Result<Vec<AccessAttempt>, Error> {
        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM axes_accessattempt"));
        push_filters(&mut builder, query);
        push_order_and_limit(&mut builder, query);

        let rows = builder
            .build_query_as::<SqliteAccessAttempt>()
            .fetch_all(&self.pool)
            .await
            .map_db_err_with_context("Failed to list access attempts")?;

        rows.into_iter().map(AccessAttempt::try_from).collect()
    }

    async fn count(&self, query: &AccessQuery) -> Result<u64, Error> {
        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM axes_accessattempt");
        push_filters(&mut builder, query);

        let count: i64 = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_db_err_with_context("Failed to count access attempts")?;

        Ok(count as u64)
    }

    async fn delete_before(&self, before: DateTime<Utc>) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM axes_accessattempt WHERE attempt_time < ?")
            .bind(ceil_timestamp(before))
            .execute(&self.pool)
            .await
            .map_db_err_with_context("Failed to clean up access attempts")?;

        Ok(result.rows_affected())
    }

    async fn delete_matching(&self, query: &AccessQuery) -> Result<u64, Error> {
        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("DELETE FROM axes_accessattempt");
        push_filters(&mut builder, query);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_db_err_with_context("Failed to reset access attempts")?;

        Ok(result.rows_affected())
    }
}

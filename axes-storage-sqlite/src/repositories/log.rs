//! SQLite implementation of the access log repository.

use async_trait::async_trait;
use axes_core::{
    AccessLog, AccessQuery, Error, NewAccessLog, NewAccessRecord,
    error::{StorageError, utilities::DatabaseResultExt},
    repositories::AccessLogRepository,
    validation::validate_access_record,
};
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{
    ceil_timestamp, map_insert_err, push_filters, push_order_and_limit, to_datetime,
    to_ip_address,
};

const COLUMNS: &str = "id, user_agent, ip_address, username, trusted, http_accept, path_info, \
                       attempt_time, logout_time";

/// SQLite repository for access logs.
pub struct SqliteAccessLogRepository {
    pool: SqlitePool,
}

impl SqliteAccessLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SqliteAccessLog {
    id: i64,
    user_agent: String,
    ip_address: Option<String>,
    username: Option<String>,
    trusted: bool,
    http_accept: String,
    path_info: String,
    attempt_time: i64,
    logout_time: Option<i64>,
}

impl TryFrom<SqliteAccessLog> for AccessLog {
    type Error = Error;

    fn try_from(row: SqliteAccessLog) -> Result<Self, Self::Error> {
        let access = NewAccessRecord {
            user_agent: row.user_agent,
            ip_address: to_ip_address(row.ip_address)?,
            username: row.username,
            trusted: row.trusted,
            http_accept: row.http_accept,
            path_info: row.path_info,
        };
        let logout_time = row.logout_time.map(to_datetime).transpose()?;

        Ok(NewAccessLog::new(access).into_log(row.id, to_datetime(row.attempt_time)?, logout_time))
    }
}

#[async_trait]
impl AccessLogRepository for SqliteAccessLogRepository {
    async fn create(&self, log: NewAccessLog) -> Result<AccessLog, Error> {
        validate_access_record(&log.access)?;

        let now = Utc::now().timestamp();

        let row = sqlx::query_as::<_, SqliteAccessLog>(&format!(
            r#"
            INSERT INTO axes_accesslog
                (user_agent, ip_address, username, trusted, http_accept, path_info, attempt_time)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&log.access.user_agent)
        .bind(log.access.ip_address.map(|ip| ip.to_string()))
        .bind(&log.access.username)
        .bind(log.access.trusted)
        .bind(&log.access.http_accept)
        .bind(&log.access.path_info)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_err(e, "Failed to record access log"))?;

        row.try_into()
    }

    async fn get(&self, id: i64) -> Result<Option<AccessLog>, Error> {
        let row = sqlx::query_as::<_, SqliteAccessLog>(&format!(
            "SELECT {COLUMNS} FROM axes_accesslog WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_db_err_with_context("Failed to get access log")?;

        row.map(AccessLog::try_from).transpose()
    }

    async fn list(&self, query: &AccessQuery) -> Result<Vec<AccessLog>, Error> {
        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM axes_accesslog"));
        push_filters(&mut builder, query);
        push_order_and_limit(&mut builder, query);

        let rows = builder
            .build_query_as::<SqliteAccessLog>()
            .fetch_all(&self.pool)
            .await
            .map_db_err_with_context("Failed to list access logs")?;

        rows.into_iter().map(AccessLog::try_from).collect()
    }

    async fn set_logout_time(
        &self,
        id: i64,
        logout_time: DateTime<Utc>,
    ) -> Result<AccessLog, Error> {
        // Only rows without a logout time match, so concurrent callers cannot
        // overwrite each other.
        let row = sqlx::query_as::<_, SqliteAccessLog>(&format!(
            r#"
            UPDATE axes_accesslog
            SET logout_time = ?
            WHERE id = ? AND logout_time IS NULL
            RETURNING {COLUMNS}
            "#
        ))
        .bind(logout_time.timestamp())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_db_err_with_context("Failed to set logout time")?;

        match row {
            Some(row) => row.try_into(),
            None => match self.get(id).await? {
                Some(_) => Err(StorageError::Conflict(format!(
                    "logout time already set for access log {id}"
                ))
                .into()),
                None => Err(StorageError::NotFound.into()),
            },
        }
    }

    async fn delete_before(&self, before: DateTime<Utc>) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM axes_accesslog WHERE attempt_time < ?")
            .bind(ceil_timestamp(before))
            .execute(&self.pool)
            .await
            .map_db_err_with_context("Failed to clean up access logs")?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{access, age_row, setup_test_db};
    use axes_core::{Access, validation::MAX_PATH_INFO_LENGTH};
    use chrono::{Duration, TimeZone};

    #[tokio::test]
    async fn test_create_access_log() {
        let pool = setup_test_db().await;
        let repo = SqliteAccessLogRepository::new(pool);

        let log = repo
            .create(NewAccessLog::new(access("alice", "192.168.1.1")))
            .await
            .expect("Failed to record access log");

        assert!(log.id > 0);
        assert!(log.logout_time.is_none());
        assert_eq!(log.access.username.as_deref(), Some("alice"));
        assert!(log.to_string().starts_with("Access Log for alice @ "));
    }

    #[tokio::test]
    async fn test_set_logout_time_once() {
        let pool = setup_test_db().await;
        let repo = SqliteAccessLogRepository::new(pool);

        let log = repo
            .create(NewAccessLog::new(access("alice", "192.168.1.1")))
            .await
            .unwrap();

        let logout = Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap();
        let updated = repo.set_logout_time(log.id, logout).await.unwrap();
        assert_eq!(updated.logout_time, Some(logout));
        assert_eq!(updated.attempt_time(), log.attempt_time());

        let err = repo
            .set_logout_time(log.id, logout + Duration::hours(1))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let stored = repo.get(log.id).await.unwrap().unwrap();
        assert_eq!(stored.logout_time, Some(logout));
    }

    #[tokio::test]
    async fn test_set_logout_time_unknown_id() {
        let pool = setup_test_db().await;
        let repo = SqliteAccessLogRepository::new(pool);

        let err = repo.set_logout_time(42, Utc::now()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_newest_first_with_filters() {
        let pool = setup_test_db().await;
        let repo = SqliteAccessLogRepository::new(pool.clone());

        let old = repo
            .create(NewAccessLog::new(access("alice", "10.0.0.1")))
            .await
            .unwrap();
        let new = repo
            .create(NewAccessLog::new(access("alice", "10.0.0.1")))
            .await
            .unwrap();
        repo.create(NewAccessLog::new(access("bob", "10.0.0.2")))
            .await
            .unwrap();
        age_row(&pool, "axes_accesslog", old.id, 300).await;

        let alice = repo
            .list(&AccessQuery::new().username("alice"))
            .await
            .unwrap();
        let ids: Vec<i64> = alice.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![new.id, old.id]);

        let recent = repo
            .list(&AccessQuery::new().since(Utc::now() - Duration::minutes(1)))
            .await
            .unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent.iter().all(|l| l.id != old.id));
    }

    #[tokio::test]
    async fn test_rejects_oversized_path() {
        let pool = setup_test_db().await;
        let repo = SqliteAccessLogRepository::new(pool);

        let mut new = NewAccessLog::new(access("alice", "10.0.0.1"));
        new.access.path_info = "/".repeat(MAX_PATH_INFO_LENGTH + 1);

        let err = repo.create(new).await.unwrap_err();
        assert!(err.is_validation_error());
        assert!(repo.list(&AccessQuery::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_before() {
        let pool = setup_test_db().await;
        let repo = SqliteAccessLogRepository::new(pool.clone());

        let old = repo
            .create(NewAccessLog::new(access("alice", "10.0.0.1")))
            .await
            .unwrap();
        let kept = repo
            .create(NewAccessLog::new(access("alice", "10.0.0.1")))
            .await
            .unwrap();
        age_row(&pool, "axes_accesslog", old.id, 7200).await;

        let deleted = repo
            .delete_before(Utc::now() - Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert!(repo.get(old.id).await.unwrap().is_none());
        assert!(repo.get(kept.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sub_second_bounds() {
        let pool = setup_test_db().await;
        let repo = SqliteAccessLogRepository::new(pool);

        let log = repo
            .create(NewAccessLog::new(access("alice", "10.0.0.1")))
            .await
            .unwrap();
        let just_after = log.attempt_time() + Duration::milliseconds(500);

        let listed = repo
            .list(&AccessQuery::new().since(just_after))
            .await
            .unwrap();
        assert!(listed.iter().all(|l| l.attempt_time() >= just_after));
        assert!(listed.is_empty());

        let deleted = repo
            .delete_before(log.attempt_time() - Duration::milliseconds(500))
            .await
            .unwrap();
        assert_eq!(deleted, 0);

        assert_eq!(repo.delete_before(just_after).await.unwrap(), 1);
        assert!(repo.get(log.id).await.unwrap().is_none());
    }
}

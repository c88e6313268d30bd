//! Repository trait for access and logout history.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{AccessLog, AccessQuery, Error, NewAccessLog};

/// Repository for [`AccessLog`] records.
#[async_trait]
pub trait AccessLogRepository: Send + Sync + 'static {
    /// Store a new access log entry with no logout time.
    async fn create(&self, log: NewAccessLog) -> Result<AccessLog, Error>;

    /// Fetch one entry by id.
    async fn get(&self, id: i64) -> Result<Option<AccessLog>, Error>;

    /// Entries matching `query`, most recent first.
    async fn list(&self, query: &AccessQuery) -> Result<Vec<AccessLog>, Error>;

    /// Record the logout of an entry.
    ///
    /// The logout time can be set once. Setting it again returns
    /// `StorageError::Conflict`; an unknown id returns `StorageError::NotFound`.
    async fn set_logout_time(
        &self,
        id: i64,
        logout_time: DateTime<Utc>,
    ) -> Result<AccessLog, Error>;

    /// Delete entries with `attempt_time` strictly before `before`.
    async fn delete_before(&self, before: DateTime<Utc>) -> Result<u64, Error>;
}

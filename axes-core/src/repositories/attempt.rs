//! Repository trait for login attempt history.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{AccessAttempt, AccessQuery, Error, NewAccessAttempt};

/// Repository for [`AccessAttempt`] records.
///
/// Attempts are append-only: there is no update operation. Rows only leave
/// the store through the retention methods.
#[async_trait]
pub trait AccessAttemptRepository: Send + Sync + 'static {
    /// Store a new attempt.
    ///
    /// The implementation assigns the id and stamps `attempt_time` with the
    /// current time. Field constraints are checked before anything is written.
    async fn create(&self, attempt: NewAccessAttempt) -> Result<AccessAttempt, Error>;

    /// Fetch one attempt by id.
    async fn get(&self, id: i64) -> Result<Option<AccessAttempt>, Error>;

    /// Attempts matching `query`, most recent first.
    async fn list(&self, query: &AccessQuery) -> Result<Vec<AccessAttempt>, Error>;

    /// Number of attempts matching `query`. `limit` is ignored.
    async fn count(&self, query: &AccessQuery) -> Result<u64, Error>;

    /// Delete attempts with `attempt_time` strictly before `before`.
    ///
    /// # Returns
    ///
    /// The number of records deleted.
    async fn delete_before(&self, before: DateTime<Utc>) -> Result<u64, Error>;

    /// Delete every attempt matching `query`, e.g. to reset a username or IP.
    ///
    /// `limit` is ignored.
    async fn delete_matching(&self, query: &AccessQuery) -> Result<u64, Error>;
}

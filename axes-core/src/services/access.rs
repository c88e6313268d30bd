//! Service for recording login attempts and access history.
//!
//! The authentication middleware calls [`AccessService::record_attempt`] on
//! every login try, [`AccessService::record_access`] once a session starts and
//! [`AccessService::record_logout`] when it ends. Lockout decisions are left to
//! the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use axes_core::services::AccessService;
//!
//! let service = AccessService::new(storage);
//! let log = service.record_access(new_log).await?;
//! service.record_logout(log.id).await?;
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    AccessAttempt, AccessLog, AccessQuery, Error, NewAccessAttempt, NewAccessLog,
    repositories::{AccessAttemptRepository, AccessLogRepository, RepositoryProvider},
};

/// Counts removed by [`AccessService::purge_before`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeSummary {
    pub attempts: u64,
    pub logs: u64,
}

/// Coordinates the attempt and log repositories of a storage backend.
///
/// The service is cheap to clone and can be shared across tasks.
pub struct AccessService<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> Clone for AccessService<R> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
        }
    }
}

impl<R: RepositoryProvider> AccessService<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<R> {
        &self.provider
    }

    /// Record a login attempt.
    pub async fn record_attempt(&self, attempt: NewAccessAttempt) -> Result<AccessAttempt, Error> {
        let attempt = self.provider.attempts().create(attempt).await?;
        tracing::info!(
            attempt_id = attempt.id,
            username = attempt.access.username.as_deref().unwrap_or_default(),
            ip_address = ?attempt.access.ip_address,
            failures = attempt.failures(),
            "Recorded access attempt"
        );
        Ok(attempt)
    }

    /// Record the start of an authenticated session.
    pub async fn record_access(&self, log: NewAccessLog) -> Result<AccessLog, Error> {
        let log = self.provider.logs().create(log).await?;
        tracing::info!(
            log_id = log.id,
            username = log.access.username.as_deref().unwrap_or_default(),
            ip_address = ?log.access.ip_address,
            "Recorded access log"
        );
        Ok(log)
    }

    /// Stamp the logout time of an access log entry with the current time.
    pub async fn record_logout(&self, log_id: i64) -> Result<AccessLog, Error> {
        let log = self
            .provider
            .logs()
            .set_logout_time(log_id, Utc::now())
            .await
            .inspect_err(|e| tracing::warn!(log_id, error = %e, "Failed to record logout"))?;
        tracing::info!(log_id, "Recorded logout");
        Ok(log)
    }

    /// Attempts matching `query`, most recent first.
    pub async fn recent_attempts(&self, query: &AccessQuery) -> Result<Vec<AccessAttempt>, Error> {
        self.provider.attempts().list(query).await
    }

    /// Access log entries matching `query`, most recent first.
    pub async fn recent_logs(&self, query: &AccessQuery) -> Result<Vec<AccessLog>, Error> {
        self.provider.logs().list(query).await
    }

    /// Sum of [`AccessAttempt::failures`] over the attempts matching `query`.
    pub async fn failures_for(&self, query: &AccessQuery) -> Result<u64, Error> {
        let attempts = self.provider.attempts().list(query).await?;
        Ok(attempts.iter().map(|a| u64::from(a.failures())).sum())
    }

    /// Delete every attempt matching `query`.
    pub async fn reset_attempts(&self, query: &AccessQuery) -> Result<u64, Error> {
        let deleted = self.provider.attempts().delete_matching(query).await?;
        tracing::info!(deleted, "Reset access attempts");
        Ok(deleted)
    }

    /// Delete attempts and log entries created before `cutoff`.
    pub async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<PurgeSummary, Error> {
        let attempts = self.provider.attempts().delete_before(cutoff).await?;
        let logs = self.provider.logs().delete_before(cutoff).await?;
        tracing::info!(attempts, logs, %cutoff, "Purged old access records");
        Ok(PurgeSummary { attempts, logs })
    }
}

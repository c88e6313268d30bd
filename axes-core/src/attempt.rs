//! Login attempt history.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access::{Access, AccessRecord, NewAccessRecord, format_timestamp};

/// A recorded login try, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessAttempt {
    pub id: i64,
    #[serde(flatten)]
    pub access: AccessRecord,
    /// Snapshot of the query string parameters.
    pub get_data: String,
    /// Snapshot of the submitted form body.
    pub post_data: String,
    pub failures_since_start: u32,
}

impl AccessAttempt {
    /// Number of failed logins recorded for this attempt.
    pub fn failures(&self) -> u32 {
        self.failures_since_start
    }
}

impl Access for AccessAttempt {
    fn record(&self) -> &AccessRecord {
        &self.access
    }
}

impl fmt::Display for AccessAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Attempted Access: {}",
            format_timestamp(&self.access.attempt_time())
        )
    }
}

/// An attempt that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccessAttempt {
    #[serde(flatten)]
    pub access: NewAccessRecord,
    pub get_data: String,
    pub post_data: String,
    pub failures_since_start: u32,
}

impl NewAccessAttempt {
    pub fn new(access: NewAccessRecord) -> Self {
        Self {
            access,
            get_data: String::new(),
            post_data: String::new(),
            failures_since_start: 0,
        }
    }

    pub fn with_get_data(mut self, get_data: impl Into<String>) -> Self {
        self.get_data = get_data.into();
        self
    }

    pub fn with_post_data(mut self, post_data: impl Into<String>) -> Self {
        self.post_data = post_data.into();
        self
    }

    pub fn with_failures(mut self, failures_since_start: u32) -> Self {
        self.failures_since_start = failures_since_start;
        self
    }

    /// Attach the storage id and creation time.
    pub fn into_attempt(self, id: i64, attempt_time: DateTime<Utc>) -> AccessAttempt {
        AccessAttempt {
            id,
            access: self.access.with_attempt_time(attempt_time),
            get_data: self.get_data,
            post_data: self.post_data,
            failures_since_start: self.failures_since_start,
        }
    }
}

//! Access and logout history.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access::{Access, AccessRecord, NewAccessRecord, format_timestamp};

/// A recorded session with an optional logout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLog {
    pub id: i64,
    #[serde(flatten)]
    pub access: AccessRecord,
    pub logout_time: Option<DateTime<Utc>>,
}

impl AccessLog {
    pub fn is_logged_out(&self) -> bool {
        self.logout_time.is_some()
    }
}

impl Access for AccessLog {
    fn record(&self) -> &AccessRecord {
        &self.access
    }
}

impl fmt::Display for AccessLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Access Log for {} @ {}",
            self.access.username.as_deref().unwrap_or("None"),
            format_timestamp(&self.access.attempt_time())
        )
    }
}

/// An access log entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccessLog {
    #[serde(flatten)]
    pub access: NewAccessRecord,
}

impl NewAccessLog {
    pub fn new(access: NewAccessRecord) -> Self {
        Self { access }
    }

    /// Attach the storage id, creation time and logout time.
    pub fn into_log(
        self,
        id: i64,
        attempt_time: DateTime<Utc>,
        logout_time: Option<DateTime<Utc>>,
    ) -> AccessLog {
        AccessLog {
            id,
            access: self.access.with_attempt_time(attempt_time),
            logout_time,
        }
    }
}

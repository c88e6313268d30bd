//! Request fields shared by every access record.
//!
//! [`AccessRecord`] holds what the authentication middleware knows about a
//! request when a login attempt or a logout happens. The concrete record types
//! ([`AccessAttempt`](crate::AccessAttempt) and [`AccessLog`](crate::AccessLog))
//! compose it and expose it through the [`Access`] trait.
//!
//! A record only gets its `attempt_time` when it is created, either by
//! [`NewAccessRecord::stamp_now`] or, for rows read back from storage, by
//! [`NewAccessRecord::with_attempt_time`]. There is no way to change it afterwards.

use std::net::IpAddr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, utilities::RequiredFieldExt};

/// Common behaviour of the concrete access record types.
pub trait Access {
    /// The shared request fields of this record.
    fn record(&self) -> &AccessRecord;

    /// When the record was created.
    fn attempt_time(&self) -> DateTime<Utc> {
        self.record().attempt_time()
    }
}

/// The request fields of a persisted access record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub user_agent: String,
    pub ip_address: Option<IpAddr>,
    pub username: Option<String>,
    /// Once a user logs in from an IP, that combination is trusted and is not
    /// locked out during a distributed attack.
    pub trusted: bool,
    pub http_accept: String,
    pub path_info: String,
    attempt_time: DateTime<Utc>,
}

impl AccessRecord {
    pub fn attempt_time(&self) -> DateTime<Utc> {
        self.attempt_time
    }
}

impl Access for AccessRecord {
    fn record(&self) -> &AccessRecord {
        self
    }
}

/// Request fields of a record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccessRecord {
    pub user_agent: String,
    pub ip_address: Option<IpAddr>,
    pub username: Option<String>,
    #[serde(default)]
    pub trusted: bool,
    pub http_accept: String,
    pub path_info: String,
}

impl NewAccessRecord {
    pub fn builder() -> NewAccessRecordBuilder {
        NewAccessRecordBuilder::default()
    }

    /// Turn this into a record created right now.
    pub fn stamp_now(self) -> AccessRecord {
        self.with_attempt_time(Utc::now())
    }

    /// Turn this into a record created at `attempt_time`.
    ///
    /// Storage backends use this to rebuild rows they have read.
    pub fn with_attempt_time(self, attempt_time: DateTime<Utc>) -> AccessRecord {
        AccessRecord {
            user_agent: self.user_agent,
            ip_address: self.ip_address,
            username: self.username,
            trusted: self.trusted,
            http_accept: self.http_accept,
            path_info: self.path_info,
            attempt_time,
        }
    }
}

#[derive(Default)]
pub struct NewAccessRecordBuilder {
    user_agent: Option<String>,
    ip_address: Option<IpAddr>,
    username: Option<String>,
    trusted: bool,
    http_accept: Option<String>,
    path_info: Option<String>,
}

impl NewAccessRecordBuilder {
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn trusted(mut self, trusted: bool) -> Self {
        self.trusted = trusted;
        self
    }

    pub fn http_accept(mut self, http_accept: impl Into<String>) -> Self {
        self.http_accept = Some(http_accept.into());
        self
    }

    pub fn path_info(mut self, path_info: impl Into<String>) -> Self {
        self.path_info = Some(path_info.into());
        self
    }

    pub fn build(self) -> Result<NewAccessRecord, ValidationError> {
        Ok(NewAccessRecord {
            user_agent: self.user_agent.require_field("User agent")?,
            ip_address: self.ip_address,
            username: self.username,
            trusted: self.trusted,
            http_accept: self.http_accept.require_field("HTTP Accept")?,
            path_info: self.path_info.require_field("Path")?,
        })
    }
}

/// Render a timestamp the way record labels show it, e.g. `2024-01-01T00:00:00Z`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

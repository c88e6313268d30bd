use std::net::IpAddr;

use chrono::{DateTime, Utc};

/// Filter for listing, counting and deleting access records.
///
/// An empty query matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessQuery {
    pub username: Option<String>,
    pub ip_address: Option<IpAddr>,
    /// Only records with `attempt_time >= since`
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

impl AccessQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether the query has any filter besides `limit`.
    pub fn is_filtered(&self) -> bool {
        self.username.is_some() || self.ip_address.is_some() || self.since.is_some()
    }
}

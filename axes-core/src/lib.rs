//! Core functionality for the axes project
//!
//! This crate defines the two persisted record types of axes:
//!
//! - [`AccessAttempt`]: a login try, successful or not, with snapshots of the
//!   request payload and a failure counter
//! - [`AccessLog`]: an authenticated session with an optional logout time
//!
//! Both compose the shared request fields in [`AccessRecord`]. Storage backends
//! implement the traits in [`repositories`], and [`services::AccessService`]
//! is the entry point for application code.
//!
pub mod access;
pub mod attempt;
pub mod error;
pub mod labels;
pub mod log;
pub mod ordering;
pub mod query;
pub mod repositories;
pub mod services;
pub mod validation;

pub use access::{Access, AccessRecord, NewAccessRecord, NewAccessRecordBuilder};
pub use attempt::{AccessAttempt, NewAccessAttempt};
pub use error::Error;
pub use log::{AccessLog, NewAccessLog};
pub use query::AccessQuery;
pub use services::AccessService;

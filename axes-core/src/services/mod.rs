//! Service layer
//!
//! Services wrap a [`RepositoryProvider`](crate::repositories::RepositoryProvider)
//! and add logging around the storage calls.

pub mod access;

pub use access::{AccessService, PurgeSummary};

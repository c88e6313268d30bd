//! Repository traits for the data access layer
//!
//! Services talk to storage only through these traits.
//!
//! - [`AccessAttemptRepository`] and [`AccessLogRepository`] define the
//!   operations for each record type
//! - [`AccessAttemptRepositoryProvider`] and [`AccessLogRepositoryProvider`]
//!   hand out the repositories
//! - [`RepositoryProvider`] combines both providers with lifecycle methods

pub mod attempt;
pub mod log;

pub use attempt::AccessAttemptRepository;
pub use log::AccessLogRepository;

use async_trait::async_trait;

use crate::Error;

/// Provider trait for access attempt repository access.
pub trait AccessAttemptRepositoryProvider: Send + Sync + 'static {
    /// The access attempt repository implementation type
    type AttemptRepo: AccessAttemptRepository;

    /// Get the access attempt repository
    fn attempts(&self) -> &Self::AttemptRepo;
}

/// Provider trait for access log repository access.
pub trait AccessLogRepositoryProvider: Send + Sync + 'static {
    /// The access log repository implementation type
    type LogRepo: AccessLogRepository;

    /// Get the access log repository
    fn logs(&self) -> &Self::LogRepo;
}

/// Provider trait that storage implementations must implement to provide all repositories.
///
/// # Example
///
/// ```rust,ignore
/// use axes_core::repositories::*;
///
/// struct MyStorage { /* ... */ }
///
/// impl AccessAttemptRepositoryProvider for MyStorage {
///     type AttemptRepo = MyAttemptRepository;
///     fn attempts(&self) -> &Self::AttemptRepo { &self.attempts }
/// }
///
/// #[async_trait]
/// impl RepositoryProvider for MyStorage {
///     async fn migrate(&self) -> Result<(), Error> { /* ... */ }
///     async fn health_check(&self) -> Result<(), Error> { /* ... */ }
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider: AccessAttemptRepositoryProvider + AccessLogRepositoryProvider {
    /// Run migrations for all repositories
    async fn migrate(&self) -> Result<(), Error>;

    /// Health check for all repositories
    async fn health_check(&self) -> Result<(), Error>;
}

//! # Axes
//!
//! Axes keeps the login history of a web application: every login attempt
//! ([`AccessAttempt`]) and every authenticated session with its logout time
//! ([`AccessLog`]). The records are written by the authentication middleware;
//! deciding whether to lock someone out is up to the application.
//!
//! ## Storage Support
//!
//! - SQLite (`sqlite` feature, enabled by default)
//!
//! ## Example
//!
//! ```rust,no_run
//! use axes::{AccessQuery, NewAccessAttempt, NewAccessRecord};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), axes::Error> {
//!     let axes = axes::sqlite("sqlite::memory:").await?;
//!
//!     let access = NewAccessRecord::builder()
//!         .user_agent("Mozilla/5.0")
//!         .username("alice")
//!         .http_accept("text/html")
//!         .path_info("/admin/login/")
//!         .build()?;
//!     let attempt = axes
//!         .record_attempt(NewAccessAttempt::new(access).with_failures(1))
//!         .await?;
//!     println!("{attempt}");
//!
//!     let recent = axes.recent_attempts(&AccessQuery::new().limit(10)).await?;
//!     assert_eq!(recent.len(), 1);
//!     Ok(())
//! }
//! ```

/// Re-export core types from axes_core
pub use axes_core::{
    Access, AccessAttempt, AccessLog, AccessQuery, AccessRecord, AccessService, Error,
    NewAccessAttempt, NewAccessLog, NewAccessRecord, error, labels, ordering, repositories,
    services, validation,
};

#[cfg(feature = "sqlite")]
pub use axes_storage_sqlite::{SqliteConfig, SqliteRepositoryProvider, SqliteStorage};

#[cfg(feature = "sqlite")]
use std::sync::Arc;

/// Connect to a SQLite database, apply migrations and return a ready service.
#[cfg(feature = "sqlite")]
pub async fn sqlite(url: &str) -> Result<AccessService<SqliteRepositoryProvider>, Error> {
    sqlite_with(&SqliteConfig {
        url: url.to_string(),
        ..Default::default()
    })
    .await
}

/// Like [`sqlite`], with explicit connection settings.
#[cfg(feature = "sqlite")]
pub async fn sqlite_with(
    config: &SqliteConfig,
) -> Result<AccessService<SqliteRepositoryProvider>, Error> {
    let storage = SqliteStorage::connect_with(config).await?;
    storage.migrate().await?;
    tracing::info!(url = %config.url, "Axes SQLite storage ready");
    Ok(AccessService::new(Arc::new(storage.repositories())))
}

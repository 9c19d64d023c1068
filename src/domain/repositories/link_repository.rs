//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// Uniqueness of short codes and aliases is enforced here (by the store's
/// unique constraint), not by the code generator.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code or alias already
    /// exists. Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Deletes a link by its short code.
    ///
    /// The database cascade removes the link's visit rows.
    ///
    /// Returns `Ok(true)` if the link was found and deleted, `Ok(false)` if
    /// not found.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_by_code(&self, code: &str) -> Result<bool, AppError>;

    /// Atomically adds one to the link's click counter.
    ///
    /// The counter is denormalized and best-effort; callers on the redirect
    /// path log a failure here instead of propagating it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_click_count(&self, code: &str) -> Result<(), AppError>;

    /// Bulk-deletes every link whose expiry is in the past.
    ///
    /// Returns the number of links removed. Scheduling this is the
    /// operator's concern; the redirect path also reaps expired links
    /// lazily, one at a time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_expired(&self) -> Result<u64, AppError>;
}

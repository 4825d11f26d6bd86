//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::StoreError;
use async_trait::async_trait;

/// Repository interface for the Link Store.
///
/// Links are keyed by their integer id. The store never filters expired rows:
/// whether a link is still live is decided by the caller at read time.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local map
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by id, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on query failures.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, StoreError>;

    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if a link with the same id exists.
    /// Returns [`StoreError::Database`] on other failures.
    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError>;

    /// Deletes a link by id. Deleting a missing id succeeds.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Deletes every link whose expiry lies strictly before `now`.
    ///
    /// Returns the number of removed links.
    async fn delete_expired(&self, now: i64) -> Result<u64, StoreError>;

    /// Counts stored links, expired ones included.
    async fn count(&self) -> Result<i64, StoreError>;
}

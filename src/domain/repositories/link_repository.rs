//! Repository trait for link data access.

use crate::domain::entities::{LinkDetails, LinkFilter, LinkStatus, NewLink, StatusChange};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing submitted links.
///
/// Read operations return [`LinkDetails`] — the link joined with its
/// category display fields and submitter name. Counter increments are
/// atomic at the store level: `views = views + 1` in a single statement,
/// never a read-modify-write pair.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link and returns it joined with category/submitter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors, including a
    /// foreign-key violation for a nonexistent category or submitter
    /// (callers validate those references first).
    async fn insert(&self, new_link: NewLink) -> Result<LinkDetails, AppError>;

    /// Finds a link by id, joined with category/submitter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_details(&self, id: i64) -> Result<Option<LinkDetails>, AppError>;

    /// Lists links matching `filter`, ordered by `created_at` descending.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, filter: LinkFilter) -> Result<Vec<LinkDetails>, AppError>;

    /// Applies a status change and returns the updated joined record.
    ///
    /// Approval stamp fields in `change` that are `None` leave the stored
    /// values untouched, so a move away from `approved` keeps its audit
    /// trail.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if no link has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn set_status(
        &self,
        id: i64,
        change: StatusChange,
    ) -> Result<Option<LinkDetails>, AppError>;

    /// Atomically increments the view counter, returning the new count.
    ///
    /// Must be a single conditional update executed by the store; two
    /// concurrent calls both land (no lost update).
    ///
    /// # Returns
    ///
    /// `Ok(None)` if no link has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_views(&self, id: i64) -> Result<Option<i64>, AppError>;

    /// Atomically increments the click counter, returning the new count.
    ///
    /// Same contract as [`Self::increment_views`], independent counter.
    async fn increment_clicks(&self, id: i64) -> Result<Option<i64>, AppError>;

    /// Hard-deletes a link regardless of status.
    ///
    /// Returns `Ok(true)` if a row was removed, `Ok(false)` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Counts links, optionally restricted to one status.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_by_status(&self, status: Option<LinkStatus>) -> Result<i64, AppError>;

    /// Counts links referencing the given category.
    ///
    /// Used to block category deletion while references remain.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_in_category(&self, category_id: i64) -> Result<i64, AppError>;
}

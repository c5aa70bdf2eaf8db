//! Repository trait for category data access.

use crate::domain::entities::{Category, CategoryPatch, NewCategory};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing link categories.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCategoryRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Inserts a new category.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name or slug already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(&self, new_category: NewCategory) -> Result<Category, AppError>;

    /// Finds a category by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, AppError>;

    /// Lists all categories ordered by name ascending.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self) -> Result<Vec<Category>, AppError>;

    /// Partially updates a category. `None` fields are unchanged.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if no category has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the new name or slug collides.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, id: i64, patch: CategoryPatch) -> Result<Option<Category>, AppError>;

    /// Deletes a category.
    ///
    /// Returns `Ok(true)` if a row was removed, `Ok(false)` if not found.
    /// Callers enforce the no-referencing-links policy before calling.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Counts all categories.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}

//! Category management service.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{Category, CategoryPatch, Identity, NewCategory};
use crate::domain::repositories::{CategoryRepository, LinkRepository};
use crate::error::AppError;
use crate::utils::slug::slugify;

/// Input for creating or updating a category.
#[derive(Debug, Clone, Default)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Service for administrator-owned category management.
///
/// Slugs are always derived from names here, never accepted from callers.
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    links: Arc<dyn LinkRepository>,
}

impl CategoryService {
    /// Creates a new category service.
    pub fn new(categories: Arc<dyn CategoryRepository>, links: Arc<dyn LinkRepository>) -> Self {
        Self { categories, links }
    }

    /// Lists all categories ordered by name.
    pub async fn list(&self) -> Result<Vec<Category>, AppError> {
        self.categories.list().await
    }

    /// Creates a category with a slug derived from its name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] for non-admin callers,
    /// [`AppError::Validation`] for a missing name, and
    /// [`AppError::Conflict`] when the name or slug already exists.
    pub async fn create(
        &self,
        input: CategoryInput,
        actor: &Identity,
    ) -> Result<Category, AppError> {
        self.require_admin(actor)?;

        let name = input
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| AppError::missing_field("name"))?;
        let slug = slugify(&name);

        self.categories
            .insert(NewCategory {
                name,
                slug,
                description: input.description,
                icon: input.icon,
                color: input.color,
            })
            .await
    }

    /// Partially updates a category; a name change re-derives the slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] for non-admin callers and
    /// [`AppError::NotFound`] for an unknown id.
    pub async fn update(
        &self,
        id: i64,
        input: CategoryInput,
        actor: &Identity,
    ) -> Result<Category, AppError> {
        self.require_admin(actor)?;

        let slug = input.name.as_deref().map(slugify);
        let patch = CategoryPatch {
            name: input.name,
            slug,
            description: input.description,
            icon: input.icon,
            color: input.color,
        };

        self.categories
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found", json!({ "id": id })))
    }

    /// Deletes a category.
    ///
    /// Deletion is blocked while any link still references the category:
    /// orphaning would break the read-time join and reassignment would
    /// invent a sentinel category that does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] for non-admin callers,
    /// [`AppError::Conflict`] while links reference the category, and
    /// [`AppError::NotFound`] for an unknown id.
    pub async fn delete(&self, id: i64, actor: &Identity) -> Result<(), AppError> {
        self.require_admin(actor)?;

        let referencing = self.links.count_in_category(id).await?;
        if referencing > 0 {
            return Err(AppError::conflict(
                "Category is referenced by existing links",
                json!({ "id": id, "links": referencing }),
            ));
        }

        if !self.categories.delete(id).await? {
            return Err(AppError::not_found(
                "Category not found",
                json!({ "id": id }),
            ));
        }

        Ok(())
    }

    fn require_admin(&self, actor: &Identity) -> Result<(), AppError> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "Admin role required",
                json!({ "role": actor.role }),
            ))
        }
    }
}

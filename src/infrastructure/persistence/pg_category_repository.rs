//! PostgreSQL implementation of the category repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Category, CategoryPatch, NewCategory};
use crate::domain::repositories::CategoryRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    slug: String,
    description: Option<String>,
    icon: Option<String>,
    color: String,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            icon: row.icon,
            color: row.color,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL repository for category storage.
pub struct PgCategoryRepository {
    pool: Arc<PgPool>,
}

impl PgCategoryRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn insert(&self, new_category: NewCategory) -> Result<Category, AppError> {
        let row: CategoryRow = sqlx::query_as(
            r#"
            INSERT INTO categories (name, slug, description, icon, color)
            VALUES ($1, $2, $3, $4, COALESCE($5, '#3b82f6'))
            RETURNING id, name, slug, description, icon, color, created_at
            "#,
        )
        .bind(&new_category.name)
        .bind(&new_category.slug)
        .bind(&new_category.description)
        .bind(&new_category.icon)
        .bind(&new_category.color)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, AppError> {
        let row: Option<CategoryRow> = sqlx::query_as(
            "SELECT id, name, slug, description, icon, color, created_at \
             FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Category>, AppError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            "SELECT id, name, slug, description, icon, color, created_at \
             FROM categories ORDER BY name ASC",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, patch: CategoryPatch) -> Result<Option<Category>, AppError> {
        let row: Option<CategoryRow> = sqlx::query_as(
            r#"
            UPDATE categories
            SET name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                icon = COALESCE($5, icon),
                color = COALESCE($6, color)
            WHERE id = $1
            RETURNING id, name, slug, description, icon, color, created_at
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.slug)
        .bind(&patch.description)
        .bind(&patch.icon)
        .bind(&patch.color)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}

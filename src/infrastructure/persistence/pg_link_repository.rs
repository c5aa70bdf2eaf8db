//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{
    CategoryRef, LinkDetails, LinkFilter, LinkStatus, LinkView, NewLink, StatusChange,
    SubmitterRef,
};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Columns selected for the joined link projection.
const DETAILS_COLUMNS: &str = r#"
    l.id, l.url, l.title, l.description, l.image, l.favicon,
    l.category_id, l.submitted_by, l.status, l.views, l.clicks, l.tags,
    l.created_at, l.approved_at, l.approved_by,
    c.name AS category_name, c.slug AS category_slug,
    c.icon AS category_icon, c.color AS category_color,
    u.name AS submitter_name
"#;

/// Row shape for the link joined with category and submitter.
#[derive(sqlx::FromRow)]
struct LinkDetailsRow {
    id: i64,
    url: String,
    title: String,
    description: Option<String>,
    image: Option<String>,
    favicon: Option<String>,
    category_id: i64,
    submitted_by: i64,
    status: String,
    views: i64,
    clicks: i64,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    approved_at: Option<DateTime<Utc>>,
    approved_by: Option<i64>,
    category_name: String,
    category_slug: String,
    category_icon: Option<String>,
    category_color: String,
    submitter_name: String,
}

impl TryFrom<LinkDetailsRow> for LinkDetails {
    type Error = AppError;

    fn try_from(row: LinkDetailsRow) -> Result<Self, Self::Error> {
        let status: LinkStatus = row.status.parse().map_err(|e: String| {
            AppError::internal("Corrupt link status", serde_json::json!({ "reason": e }))
        })?;

        Ok(LinkDetails {
            link: LinkView {
                id: row.id,
                url: row.url,
                title: row.title,
                description: row.description,
                image: row.image,
                favicon: row.favicon,
                status,
                views: row.views,
                clicks: row.clicks,
                tags: row.tags,
                created_at: row.created_at,
                approved_at: row.approved_at,
                approved_by: row.approved_by,
            },
            category: CategoryRef {
                id: row.category_id,
                name: row.category_name,
                slug: row.category_slug,
                icon: row.category_icon,
                color: row.category_color,
            },
            submitted_by: SubmitterRef {
                id: row.submitted_by,
                name: row.submitter_name,
            },
        })
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Queries are runtime-bound prepared statements; counters use single
/// `UPDATE … SET n = n + 1 … RETURNING` statements so concurrent
/// increments cannot lose updates.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<LinkDetails, AppError> {
        let sql = format!(
            r#"
            WITH l AS (
                INSERT INTO links
                    (url, title, description, image, favicon, category_id,
                     submitted_by, status, tags, approved_at, approved_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING *
            )
            SELECT {DETAILS_COLUMNS}
            FROM l
            JOIN categories c ON c.id = l.category_id
            JOIN users u ON u.id = l.submitted_by
            "#
        );

        let row: LinkDetailsRow = sqlx::query_as(&sql)
            .bind(&new_link.url)
            .bind(&new_link.title)
            .bind(&new_link.description)
            .bind(&new_link.image)
            .bind(&new_link.favicon)
            .bind(new_link.category_id)
            .bind(new_link.submitted_by)
            .bind(new_link.status.as_str())
            .bind(&new_link.tags)
            .bind(new_link.approved_at)
            .bind(new_link.approved_by)
            .fetch_one(self.pool.as_ref())
            .await?;

        row.try_into()
    }

    async fn find_details(&self, id: i64) -> Result<Option<LinkDetails>, AppError> {
        let sql = format!(
            r#"
            SELECT {DETAILS_COLUMNS}
            FROM links l
            JOIN categories c ON c.id = l.category_id
            JOIN users u ON u.id = l.submitted_by
            WHERE l.id = $1
            "#
        );

        let row: Option<LinkDetailsRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self, filter: LinkFilter) -> Result<Vec<LinkDetails>, AppError> {
        let sql = format!(
            r#"
            SELECT {DETAILS_COLUMNS}
            FROM links l
            JOIN categories c ON c.id = l.category_id
            JOIN users u ON u.id = l.submitted_by
            WHERE l.status = $1
              AND ($2::bigint IS NULL OR l.category_id = $2)
              AND ($3::text IS NULL
                   OR l.title ILIKE '%' || $3 || '%'
                   OR l.description ILIKE '%' || $3 || '%')
            ORDER BY l.created_at DESC
            "#
        );

        let rows: Vec<LinkDetailsRow> = sqlx::query_as(&sql)
            .bind(filter.status.as_str())
            .bind(filter.category_id)
            .bind(filter.search)
            .fetch_all(self.pool.as_ref())
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn set_status(
        &self,
        id: i64,
        change: StatusChange,
    ) -> Result<Option<LinkDetails>, AppError> {
        // COALESCE keeps the stored approval stamps when the change does not
        // carry new ones, so a move away from `approved` retains its audit
        // trail.
        let sql = format!(
            r#"
            WITH l AS (
                UPDATE links
                SET status = $2,
                    approved_at = COALESCE($3, approved_at),
                    approved_by = COALESCE($4, approved_by)
                WHERE id = $1
                RETURNING *
            )
            SELECT {DETAILS_COLUMNS}
            FROM l
            JOIN categories c ON c.id = l.category_id
            JOIN users u ON u.id = l.submitted_by
            "#
        );

        let row: Option<LinkDetailsRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(change.status.as_str())
            .bind(change.approved_at)
            .bind(change.approved_by)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn increment_views(&self, id: i64) -> Result<Option<i64>, AppError> {
        let views: Option<i64> =
            sqlx::query_scalar("UPDATE links SET views = views + 1 WHERE id = $1 RETURNING views")
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(views)
    }

    async fn increment_clicks(&self, id: i64) -> Result<Option<i64>, AppError> {
        let clicks: Option<i64> = sqlx::query_scalar(
            "UPDATE links SET clicks = clicks + 1 WHERE id = $1 RETURNING clicks",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(clicks)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_status(&self, status: Option<LinkStatus>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM links WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn count_in_category(&self, category_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}

//! Category entity: a named grouping for links.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A link category with display metadata.
///
/// The `slug` is derived from `name` and is unique alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating a category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// Display color; the store defaults to `#3b82f6` when absent.
    pub color: Option<String>,
}

/// Partial update for a category. `None` fields are left unchanged.
///
/// A `name` change always carries the re-derived `slug` with it.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

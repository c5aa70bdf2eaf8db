//! DTOs for link listing and featured ranking.

use serde::Deserialize;
use serde_json::json;

use crate::domain::entities::LinkStatus;
use crate::error::AppError;

/// Query parameters for `GET /api/links`.
///
/// `status` and `category` arrive as raw strings so an unknown value can
/// be reported through the regular error taxonomy instead of a generic
/// deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListLinksQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ListLinksQuery {
    /// Parses the requested status; `None` lets the service apply its
    /// public default (`approved`).
    pub fn status(&self) -> Result<Option<LinkStatus>, AppError> {
        self.status
            .as_deref()
            .map(|raw| {
                raw.parse().map_err(|_| {
                    AppError::bad_request("Invalid status filter", json!({ "status": raw }))
                })
            })
            .transpose()
    }

    /// Parses the category filter; the sentinel `"all"` (and absence)
    /// mean no restriction.
    pub fn category_id(&self) -> Result<Option<i64>, AppError> {
        match self.category.as_deref() {
            None | Some("all") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| {
                    AppError::bad_request("Invalid category filter", json!({ "category": raw }))
                }),
        }
    }
}

/// Query parameters for `GET /api/links/featured`.
#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    pub limit: Option<usize>,
}

impl FeaturedQuery {
    /// Number of links to return; defaults to 6, capped at 100.
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(6).min(100)
    }
}

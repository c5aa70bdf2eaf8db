//! Handlers for link listing, submission, moderation, and analytics.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::api::dto::counters::{ClickCountResponse, ViewCountResponse};
use crate::api::dto::list_links::{FeaturedQuery, ListLinksQuery};
use crate::api::dto::submit::SubmitLinkRequest;
use crate::api::dto::transition::TransitionRequest;
use crate::domain::entities::{Identity, LinkDetails};
use crate::error::AppError;
use crate::state::AppState;

/// Lists links joined with category and submitter, newest first.
///
/// # Endpoint
///
/// `GET /api/links?status=&category=&search=`
///
/// # Filters
///
/// - `status` - exact match; defaults to `approved`. Only an explicit
///   request sees `pending` or `rejected` links.
/// - `category` - category id, or `all` (same as absent) for every category
/// - `search` - case-insensitive substring matched against title or
///   description
///
/// # Errors
///
/// Returns 400 Bad Request for an unknown status or non-numeric category.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(query): Query<ListLinksQuery>,
) -> Result<Json<Vec<LinkDetails>>, AppError> {
    let status = query.status()?;
    let category_id = query.category_id()?;

    let links = state.links.list(status, category_id, query.search).await?;

    Ok(Json(links))
}

/// Returns the most popular approved links.
///
/// # Endpoint
///
/// `GET /api/links/featured?limit=6`
///
/// Popularity is `views + clicks`, descending; ties keep newest-first
/// order.
pub async fn featured_links_handler(
    State(state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> Result<Json<Vec<LinkDetails>>, AppError> {
    let links = state.links.featured(query.limit()).await?;

    Ok(Json(links))
}

/// Submits a new link for moderation.
///
/// # Endpoint
///
/// `POST /api/links` (authenticated)
///
/// # Behavior
///
/// A submission by an administrator is approved immediately with the
/// approval stamp set; everyone else's starts `pending`.
///
/// # Errors
///
/// Returns 400 Bad Request naming the first missing field (checked in
/// order url, title, category) or rejecting a non-absolute URL.
/// Returns 404 Not Found for an unknown category.
pub async fn submit_link_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<SubmitLinkRequest>,
) -> Result<(StatusCode, Json<LinkDetails>), AppError> {
    let link = state.links.submit(payload.into(), &identity).await?;

    Ok((StatusCode::CREATED, Json(link)))
}

/// Moves a link to a new moderation status.
///
/// # Endpoint
///
/// `PATCH /api/links/{id}/status` (authenticated, admin)
///
/// # Request Body
///
/// ```json
/// {
///   "status": "approved",
///   "approved_at": "2026-01-01T00:00:00Z"  // optional
/// }
/// ```
///
/// # Errors
///
/// Returns 403 Forbidden for non-admin callers and 404 Not Found when the
/// link no longer exists (e.g. another administrator deleted it first).
pub async fn transition_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<TransitionRequest>,
) -> Result<Json<LinkDetails>, AppError> {
    let status = payload.status()?;

    let link = state
        .links
        .transition(id, status, payload.approved_at, &identity)
        .await?;

    Ok(Json(link))
}

/// Hard-deletes a link regardless of status.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}` (authenticated, admin)
pub async fn delete_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<StatusCode, AppError> {
    state.links.delete(id, &identity).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Records one view and returns the new count.
///
/// # Endpoint
///
/// `POST /api/links/{id}/view`
///
/// The increment is atomic at the store; the endpoint performs no
/// deduplication. Consumers fire it at most once per link per page visit,
/// gated by a visibility threshold.
pub async fn record_view_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ViewCountResponse>, AppError> {
    let views = state.links.record_view(id).await?;

    Ok(Json(ViewCountResponse { views }))
}

/// Records one click and returns the new count.
///
/// # Endpoint
///
/// `POST /api/links/{id}/click`
pub async fn record_click_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ClickCountResponse>, AppError> {
    let clicks = state.links.record_click(id).await?;

    Ok(Json(ClickCountResponse { clicks }))
}

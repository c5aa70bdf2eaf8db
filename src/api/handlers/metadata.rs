//! Handler for the metadata preview endpoint.

use axum::{Json, extract::State};

use crate::api::dto::metadata::MetadataRequest;
use crate::domain::entities::PageMetadata;
use crate::error::AppError;
use crate::state::AppState;

/// Fetches and extracts metadata for a candidate URL.
///
/// # Endpoint
///
/// `POST /api/metadata`
///
/// Used interactively while composing a submission: the extracted record
/// pre-fills the form, nothing is persisted.
///
/// # Errors
///
/// Returns 400 Bad Request for a missing or non-absolute URL (no network
/// call is made) and 502 Bad Gateway when the remote fetch fails — the
/// network-level vs HTTP-status-level distinction is only logged.
pub async fn preview_metadata_handler(
    State(state): State<AppState>,
    Json(payload): Json<MetadataRequest>,
) -> Result<Json<PageMetadata>, AppError> {
    let url = payload
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::missing_field("url"))?;

    let metadata = state.metadata.extract(&url).await?;

    Ok(Json(metadata))
}

//! Handlers for category management endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::category::CategoryRequest;
use crate::domain::entities::{Category, Identity};
use crate::error::AppError;
use crate::state::AppState;

/// Lists all categories ordered by name.
///
/// # Endpoint
///
/// `GET /api/categories`
pub async fn list_categories_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = state.categories.list().await?;

    Ok(Json(categories))
}

/// Creates a category; its slug is derived from the name.
///
/// # Endpoint
///
/// `POST /api/categories` (authenticated, admin)
///
/// # Errors
///
/// Returns 409 Conflict when the name or derived slug already exists.
pub async fn create_category_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    payload.validate()?;

    let category = state.categories.create(payload.into(), &identity).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Partially updates a category; renaming re-derives the slug.
///
/// # Endpoint
///
/// `PUT /api/categories/{id}` (authenticated, admin)
pub async fn update_category_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Json<Category>, AppError> {
    payload.validate()?;

    let category = state
        .categories
        .update(id, payload.into(), &identity)
        .await?;

    Ok(Json(category))
}

/// Deletes a category.
///
/// # Endpoint
///
/// `DELETE /api/categories/{id}` (authenticated, admin)
///
/// # Errors
///
/// Returns 409 Conflict while links still reference the category.
pub async fn delete_category_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<StatusCode, AppError> {
    state.categories.delete(id, &identity).await?;

    Ok(StatusCode::NO_CONTENT)
}

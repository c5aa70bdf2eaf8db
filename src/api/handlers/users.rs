//! Handlers for user listing and statistics.

use axum::{Extension, Json, extract::State};

use crate::application::services::UserStats;
use crate::domain::entities::{Identity, User};
use crate::error::AppError;
use crate::state::AppState;

/// Lists all users, newest first.
///
/// # Endpoint
///
/// `GET /api/users` (authenticated, admin)
pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = state.users.list(&identity).await?;

    Ok(Json(users))
}

/// Returns aggregate user statistics.
///
/// # Endpoint
///
/// `GET /api/users/stats`
pub async fn user_stats_handler(
    State(state): State<AppState>,
) -> Result<Json<UserStats>, AppError> {
    let stats = state.users.stats().await?;

    Ok(Json(stats))
}

//! REST API route definitions.

use axum::Router;
use axum::routing::{delete, get, patch, post, put};

use crate::api::handlers::categories::{
    create_category_handler, delete_category_handler, list_categories_handler,
    update_category_handler,
};
use crate::api::handlers::links::{
    delete_link_handler, featured_links_handler, list_links_handler, record_click_handler,
    record_view_handler, submit_link_handler, transition_link_handler,
};
use crate::api::handlers::metadata::preview_metadata_handler;
use crate::api::handlers::users::{list_users_handler, user_stats_handler};
use crate::state::AppState;

/// Routes reachable without authentication.
///
/// Listing defaults to approved links; counters and the metadata preview
/// are deliberately open because the public directory UI calls them for
/// anonymous visitors.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler))
        .route("/links/featured", get(featured_links_handler))
        .route("/links/{id}/view", post(record_view_handler))
        .route("/links/{id}/click", post(record_click_handler))
        .route("/categories", get(list_categories_handler))
        .route("/users/stats", get(user_stats_handler))
        .route("/metadata", post(preview_metadata_handler))
}

/// Routes requiring a bearer token.
///
/// The auth middleware only resolves the caller identity; admin-only
/// operations are gated inside the services.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(submit_link_handler))
        .route("/links/{id}/status", patch(transition_link_handler))
        .route("/links/{id}", delete(delete_link_handler))
        .route("/categories", post(create_category_handler))
        .route(
            "/categories/{id}",
            put(update_category_handler).delete(delete_category_handler),
        )
        .route("/users", get(list_users_handler))
}

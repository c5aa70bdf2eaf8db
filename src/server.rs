//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, schema migration, service wiring, and
//! Axum server lifecycle.

use crate::application::services::{
    AuthService, CategoryService, LinkService, MetadataService, UserService,
};
use crate::config::Config;
use crate::infrastructure::persistence::{
    PgCategoryRepository, PgLinkRepository, PgTokenRepository, PgUserRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Schema migrations (every entity shape is registered here, once,
///   before the server accepts queries)
/// - Application services and shared state
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let pool = Arc::new(pool);
    let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));
    let category_repository = Arc::new(PgCategoryRepository::new(pool.clone()));
    let user_repository = Arc::new(PgUserRepository::new(pool.clone()));
    let token_repository = Arc::new(PgTokenRepository::new(pool.clone()));

    let metadata = MetadataService::new(Duration::from_secs(config.metadata_timeout_seconds))
        .context("Failed to build metadata fetch client")?;

    let state = AppState {
        links: Arc::new(LinkService::new(
            link_repository.clone(),
            category_repository.clone(),
        )),
        categories: Arc::new(CategoryService::new(
            category_repository,
            link_repository,
        )),
        users: Arc::new(UserService::new(user_repository)),
        auth: Arc::new(AuthService::new(
            token_repository,
            config.token_signing_secret.clone(),
        )),
        metadata: Arc::new(metadata),
    };

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown signal handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}

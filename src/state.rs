//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::application::services::{
    AuthService, CategoryService, LinkService, MetadataService, UserService,
};

/// Handles to the application services.
///
/// Built once at startup (or by a test harness around in-memory
/// repositories) and cloned cheaply into every handler.
#[derive(Clone)]
pub struct AppState {
    pub links: Arc<LinkService>,
    pub categories: Arc<CategoryService>,
    pub users: Arc<UserService>,
    pub auth: Arc<AuthService>,
    pub metadata: Arc<MetadataService>,
}

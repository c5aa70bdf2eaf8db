#![allow(dead_code)]

//! Shared test harness: an in-memory document store implementing the
//! repository traits, plus state/router builders.
//!
//! The store backs integration tests the way PostgreSQL backs production:
//! services receive it through the same `Arc<dyn …>` seams. Counter
//! increments happen under one lock per store operation, which is the
//! in-memory equivalent of the database's atomic `n = n + 1` update.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::routing::get;
use axum::{Router, middleware};
use chrono::{DateTime, Utc};
use serde_json::json;

use linkboard::api::handlers::health_handler;
use linkboard::api::middleware::auth;
use linkboard::api::routes::{protected_routes, public_routes};
use linkboard::application::services::{
    AuthService, CategoryService, LinkService, MetadataService, UserService,
};
use linkboard::domain::entities::{
    Category, CategoryPatch, CategoryRef, Identity, Link, LinkDetails, LinkFilter, LinkStatus,
    LinkView, NewCategory, NewLink, NewUser, Role, StatusChange, SubmitterRef, User,
};
use linkboard::domain::repositories::{
    ApiToken, CategoryRepository, LinkRepository, TokenRepository, UserRepository,
};
use linkboard::error::AppError;
use linkboard::state::AppState;
use linkboard::utils::slug::slugify;

/// Signing secret used by every test state.
pub const TEST_SECRET: &str = "test-signing-secret";

#[derive(Clone)]
struct StoredToken {
    id: i64,
    user_id: i64,
    name: String,
    token_hash: String,
    revoked: bool,
    created_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct StoreInner {
    links: BTreeMap<i64, Link>,
    categories: BTreeMap<i64, Category>,
    users: BTreeMap<i64, User>,
    tokens: Vec<StoredToken>,
    next_id: i64,
}

impl StoreInner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Strictly increasing creation timestamps so newest-first ordering is
    /// deterministic even within one test.
    fn stamp(&self, id: i64) -> DateTime<Utc> {
        Utc::now() + chrono::Duration::milliseconds(id)
    }

    fn details(&self, link: &Link) -> Result<LinkDetails, AppError> {
        let category = self
            .categories
            .get(&link.category_id)
            .ok_or_else(|| AppError::internal("Dangling category reference", json!({})))?;
        let submitter = self
            .users
            .get(&link.submitted_by)
            .ok_or_else(|| AppError::internal("Dangling submitter reference", json!({})))?;

        Ok(LinkDetails {
            link: LinkView {
                id: link.id,
                url: link.url.clone(),
                title: link.title.clone(),
                description: link.description.clone(),
                image: link.image.clone(),
                favicon: link.favicon.clone(),
                status: link.status,
                views: link.views,
                clicks: link.clicks,
                tags: link.tags.clone(),
                created_at: link.created_at,
                approved_at: link.approved_at,
                approved_by: link.approved_by,
            },
            category: CategoryRef {
                id: category.id,
                name: category.name.clone(),
                slug: category.slug.clone(),
                icon: category.icon.clone(),
                color: category.color.clone(),
            },
            submitted_by: SubmitterRef {
                id: submitter.id,
                name: submitter.name.clone(),
            },
        })
    }
}

/// In-memory document store implementing every repository trait.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // ── Seed helpers (the tests' equivalent of SQL fixtures) ───────────

    pub fn add_user(&self, name: &str, email: &str, role: Role) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        let created_at = inner.stamp(id);
        inner.users.insert(
            id,
            User {
                id,
                name: name.to_string(),
                email: email.to_string(),
                role,
                created_at,
            },
        );
        id
    }

    pub fn add_category(&self, name: &str) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        let created_at = inner.stamp(id);
        inner.categories.insert(
            id,
            Category {
                id,
                name: name.to_string(),
                slug: slugify(name),
                description: None,
                icon: None,
                color: "#3b82f6".to_string(),
                created_at,
            },
        );
        id
    }

    pub fn add_link(&self, seed: LinkSeed) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        let created_at = inner.stamp(id);
        inner.links.insert(
            id,
            Link {
                id,
                url: seed
                    .url
                    .unwrap_or_else(|| format!("https://example.com/{id}")),
                title: seed.title,
                description: seed.description,
                image: None,
                favicon: None,
                category_id: seed.category_id,
                submitted_by: seed.submitted_by,
                status: seed.status,
                views: seed.views,
                clicks: seed.clicks,
                tags: vec![],
                created_at,
                approved_at: None,
                approved_by: None,
            },
        );
        id
    }

    pub fn add_token(&self, user_id: i64, name: &str, token_hash: &str) {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        let created_at = inner.stamp(id);
        inner.tokens.push(StoredToken {
            id,
            user_id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            revoked: false,
            created_at,
            last_used_at: None,
        });
    }

    /// Reads a link back for white-box assertions.
    pub fn get_link(&self, id: i64) -> Option<Link> {
        self.inner.lock().unwrap().links.get(&id).cloned()
    }
}

/// Seed data for a stored link.
pub struct LinkSeed {
    pub url: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub submitted_by: i64,
    pub status: LinkStatus,
    pub views: i64,
    pub clicks: i64,
}

impl LinkSeed {
    pub fn approved(title: &str, category_id: i64, submitted_by: i64) -> Self {
        Self {
            url: None,
            title: title.to_string(),
            description: None,
            category_id,
            submitted_by,
            status: LinkStatus::Approved,
            views: 0,
            clicks: 0,
        }
    }

    pub fn pending(title: &str, category_id: i64, submitted_by: i64) -> Self {
        Self {
            status: LinkStatus::Pending,
            ..Self::approved(title, category_id, submitted_by)
        }
    }

    pub fn with_counters(mut self, views: i64, clicks: i64) -> Self {
        self.views = views;
        self.clicks = clicks;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

#[async_trait]
impl LinkRepository for InMemoryStore {
    async fn insert(&self, new_link: NewLink) -> Result<LinkDetails, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        let created_at = inner.stamp(id);
        let link = Link {
            id,
            url: new_link.url,
            title: new_link.title,
            description: new_link.description,
            image: new_link.image,
            favicon: new_link.favicon,
            category_id: new_link.category_id,
            submitted_by: new_link.submitted_by,
            status: new_link.status,
            views: 0,
            clicks: 0,
            tags: new_link.tags,
            created_at,
            approved_at: new_link.approved_at,
            approved_by: new_link.approved_by,
        };
        let details = inner.details(&link)?;
        inner.links.insert(id, link);
        Ok(details)
    }

    async fn find_details(&self, id: i64) -> Result<Option<LinkDetails>, AppError> {
        let inner = self.inner.lock().unwrap();
        inner
            .links
            .get(&id)
            .map(|link| inner.details(link))
            .transpose()
    }

    async fn list(&self, filter: LinkFilter) -> Result<Vec<LinkDetails>, AppError> {
        let inner = self.inner.lock().unwrap();

        let mut matches: Vec<&Link> = inner
            .links
            .values()
            .filter(|l| l.status == filter.status)
            .filter(|l| filter.category_id.is_none_or(|c| l.category_id == c))
            .filter(|l| {
                filter.search.as_deref().is_none_or(|q| {
                    let q = q.to_lowercase();
                    l.title.to_lowercase().contains(&q)
                        || l.description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(&q))
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        matches.into_iter().map(|l| inner.details(l)).collect()
    }

    async fn set_status(
        &self,
        id: i64,
        change: StatusChange,
    ) -> Result<Option<LinkDetails>, AppError> {
        let mut inner = self.inner.lock().unwrap();

        let Some(mut link) = inner.links.get(&id).cloned() else {
            return Ok(None);
        };

        link.status = change.status;
        // Same semantics as the SQL COALESCE: absent stamps leave the
        // stored audit trail untouched.
        if let Some(ts) = change.approved_at {
            link.approved_at = Some(ts);
        }
        if let Some(by) = change.approved_by {
            link.approved_by = Some(by);
        }

        let details = inner.details(&link)?;
        inner.links.insert(id, link);
        Ok(Some(details))
    }

    async fn increment_views(&self, id: i64) -> Result<Option<i64>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.links.get_mut(&id).map(|l| {
            l.views += 1;
            l.views
        }))
    }

    async fn increment_clicks(&self, id: i64) -> Result<Option<i64>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.links.get_mut(&id).map(|l| {
            l.clicks += 1;
            l.clicks
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.inner.lock().unwrap().links.remove(&id).is_some())
    }

    async fn count_by_status(&self, status: Option<LinkStatus>) -> Result<i64, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .links
            .values()
            .filter(|l| status.is_none_or(|s| l.status == s))
            .count() as i64)
    }

    async fn count_in_category(&self, category_id: i64) -> Result<i64, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .links
            .values()
            .filter(|l| l.category_id == category_id)
            .count() as i64)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn insert(&self, new_category: NewCategory) -> Result<Category, AppError> {
        let mut inner = self.inner.lock().unwrap();

        if inner
            .categories
            .values()
            .any(|c| c.name == new_category.name || c.slug == new_category.slug)
        {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "categories_name_key" }),
            ));
        }

        let id = inner.next_id();
        let created_at = inner.stamp(id);
        let category = Category {
            id,
            name: new_category.name,
            slug: new_category.slug,
            description: new_category.description,
            icon: new_category.icon,
            color: new_category.color.unwrap_or_else(|| "#3b82f6".to_string()),
            created_at,
        };
        inner.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, AppError> {
        Ok(self.inner.lock().unwrap().categories.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut categories: Vec<Category> = inner.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn update(&self, id: i64, patch: CategoryPatch) -> Result<Option<Category>, AppError> {
        let mut inner = self.inner.lock().unwrap();

        let Some(mut category) = inner.categories.get(&id).cloned() else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(slug) = patch.slug {
            category.slug = slug;
        }
        if let Some(description) = patch.description {
            category.description = Some(description);
        }
        if let Some(icon) = patch.icon {
            category.icon = Some(icon);
        }
        if let Some(color) = patch.color {
            category.color = color;
        }

        inner.categories.insert(id, category.clone());
        Ok(Some(category))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.inner.lock().unwrap().categories.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.inner.lock().unwrap().categories.len() as i64)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut inner = self.inner.lock().unwrap();

        if inner.users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "users_email_key" }),
            ));
        }

        let id = inner.next_id();
        let created_at = inner.stamp(id);
        let user = User {
            id,
            name: new_user.name,
            email: new_user.email,
            role: new_user.role,
            created_at,
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.inner.lock().unwrap().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut users: Vec<User> = inner.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.inner.lock().unwrap().users.len() as i64)
    }

    async fn set_role(&self, id: i64, role: Role) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.users.get_mut(&id) {
            Some(user) => {
                user.role = role;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl TokenRepository for InMemoryStore {
    async fn insert(
        &self,
        user_id: i64,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        let mut inner = self.inner.lock().unwrap();

        if inner.tokens.iter().any(|t| t.name == name) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "api_tokens_name_key" }),
            ));
        }

        let id = inner.next_id();
        let created_at = inner.stamp(id);
        let stored = StoredToken {
            id,
            user_id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            revoked: false,
            created_at,
            last_used_at: None,
        };
        inner.tokens.push(stored.clone());
        Ok(ApiToken {
            id: stored.id,
            user_id: stored.user_id,
            name: stored.name,
            revoked: stored.revoked,
            created_at: stored.created_at,
            last_used_at: stored.last_used_at,
        })
    }

    async fn find_identity(&self, token_hash: &str) -> Result<Option<Identity>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .tokens
            .iter()
            .find(|t| t.token_hash == token_hash && !t.revoked)
            .and_then(|t| inner.users.get(&t.user_id))
            .map(|u| Identity {
                id: u.id,
                name: u.name.clone(),
                role: u.role,
            }))
    }

    async fn touch_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(token) = inner.tokens.iter_mut().find(|t| t.token_hash == token_hash) {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ApiToken>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut tokens: Vec<ApiToken> = inner
            .tokens
            .iter()
            .map(|t| ApiToken {
                id: t.id,
                user_id: t.user_id,
                name: t.name.clone(),
                revoked: t.revoked,
                created_at: t.created_at,
                last_used_at: t.last_used_at,
            })
            .collect();
        tokens.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tokens)
    }

    async fn revoke(&self, name: &str) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.tokens.iter_mut().find(|t| t.name == name) {
            Some(token) => {
                token.revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Builds application state around one shared in-memory store.
pub fn test_state(store: Arc<InMemoryStore>) -> AppState {
    AppState {
        links: Arc::new(LinkService::new(store.clone(), store.clone())),
        categories: Arc::new(CategoryService::new(store.clone(), store.clone())),
        users: Arc::new(UserService::new(store.clone())),
        auth: Arc::new(AuthService::new(store, TEST_SECRET.to_string())),
        metadata: Arc::new(
            MetadataService::new(Duration::from_secs(2)).expect("metadata client builds"),
        ),
    }
}

/// Builds the application router without the per-IP rate limiters (they
/// need socket peer addresses the mock transport does not provide).
pub fn test_router(state: AppState) -> Router {
    let api = Router::new().merge(public_routes()).merge(
        protected_routes()
            .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer)),
    );

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api)
        .with_state(state)
}

/// Registers a bearer token for `user_id` and returns the raw value.
pub fn issue_token(store: &InMemoryStore, user_id: i64, name: &str) -> String {
    let raw = format!("{name}-raw-token");
    let hash = AuthService::hash_token(TEST_SECRET, &raw);
    store.add_token(user_id, name, &hash);
    raw
}

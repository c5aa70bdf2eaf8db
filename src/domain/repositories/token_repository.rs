//! Repository trait for API token authentication.

use crate::domain::entities::Identity;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A stored API token (hash only; the raw token is shown once at creation).
#[derive(Debug, Clone)]
pub struct ApiToken {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Repository interface for API token storage and identity resolution.
///
/// Tokens are stored as HMAC-SHA256 hashes; resolving a hash yields the
/// owning user's [`Identity`]. This is the seam to the external
/// authenticator: swapping the implementation swaps the identity source.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTokenRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Stores a token hash for a user (operator CLI only).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the token name already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(
        &self,
        user_id: i64,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError>;

    /// Resolves a token hash to the owning user's identity.
    ///
    /// Revoked tokens resolve to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_identity(&self, token_hash: &str) -> Result<Option<Identity>, AppError>;

    /// Updates the token's `last_used_at` timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn touch_last_used(&self, token_hash: &str) -> Result<(), AppError>;

    /// Lists all tokens, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self) -> Result<Vec<ApiToken>, AppError>;

    /// Revokes a token by name.
    ///
    /// Returns `Ok(true)` if a token was revoked, `Ok(false)` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn revoke(&self, name: &str) -> Result<bool, AppError>;
}

//! Read-only user queries.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{Identity, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// Aggregate user statistics exposed publicly.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UserStats {
    pub total_users: i64,
}

/// Service for reading externally-owned users.
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Lists all users, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] for non-admin callers.
    pub async fn list(&self, actor: &Identity) -> Result<Vec<User>, AppError> {
        if !actor.is_admin() {
            return Err(AppError::forbidden(
                "Admin role required",
                json!({ "role": actor.role }),
            ));
        }

        self.users.list().await
    }

    /// Returns aggregate user statistics.
    pub async fn stats(&self) -> Result<UserStats, AppError> {
        let total_users = self.users.count().await?;
        Ok(UserStats { total_users })
    }
}

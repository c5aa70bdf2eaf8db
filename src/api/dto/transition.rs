//! DTO for moderation status changes.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::domain::entities::LinkStatus;
use crate::error::AppError;

/// Request to move a link to a new moderation status.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: Option<String>,
    /// Optional explicit approval timestamp; defaults to now when the
    /// target status is `approved`.
    pub approved_at: Option<DateTime<Utc>>,
}

impl TransitionRequest {
    /// Parses the target status.
    pub fn status(&self) -> Result<LinkStatus, AppError> {
        let raw = self
            .status
            .as_deref()
            .ok_or_else(|| AppError::missing_field("status"))?;

        raw.parse()
            .map_err(|_| AppError::bad_request("Invalid status", json!({ "status": raw })))
    }
}

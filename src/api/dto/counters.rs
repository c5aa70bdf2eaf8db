//! DTOs for view/click analytics responses.

use serde::Serialize;

/// Response after recording a view.
#[derive(Debug, Serialize)]
pub struct ViewCountResponse {
    pub views: i64,
}

/// Response after recording a click.
#[derive(Debug, Serialize)]
pub struct ClickCountResponse {
    pub clicks: i64,
}

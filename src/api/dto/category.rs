//! DTO for category create/update requests.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use validator::Validate;

use crate::application::services::CategoryInput;

/// Compiled regex for hex color validation.
static HEX_COLOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap());

/// Request body shared by category creation and update.
///
/// The slug is never accepted from callers; it is derived from `name` by
/// the category service.
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(length(max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    pub icon: Option<String>,

    /// Display color as a hex code, e.g. `#3b82f6`.
    #[validate(regex(path = "*HEX_COLOR_REGEX", message = "Color must be a hex code"))]
    pub color: Option<String>,
}

impl From<CategoryRequest> for CategoryInput {
    fn from(req: CategoryRequest) -> Self {
        CategoryInput {
            name: req.name,
            description: req.description,
            icon: req.icon,
            color: req.color,
        }
    }
}

//! DTO for link submission.

use serde::Deserialize;

use crate::application::services::SubmitLink;

/// Request to submit a new link.
///
/// Required-field presence is checked by the lifecycle engine so the
/// response can name the first missing field; the DTO itself accepts
/// everything optional.
#[derive(Debug, Deserialize)]
pub struct SubmitLinkRequest {
    pub url: Option<String>,
    pub title: Option<String>,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub favicon: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<SubmitLinkRequest> for SubmitLink {
    fn from(req: SubmitLinkRequest) -> Self {
        SubmitLink {
            url: req.url,
            title: req.title,
            category_id: req.category_id,
            description: req.description,
            image: req.image,
            favicon: req.favicon,
            tags: req.tags,
        }
    }
}

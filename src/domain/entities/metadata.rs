//! Page metadata scraped from a target website.

use serde::Serialize;

/// Normalized metadata extracted from a remote HTML document.
///
/// Ephemeral: produced by the extractor and consumed once to seed a new
/// link submission, never persisted on its own. Missing fields carry
/// their documented fallbacks (`"No title"`, empty strings, the site's
/// `/favicon.ico`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub image: String,
    pub favicon: String,
}

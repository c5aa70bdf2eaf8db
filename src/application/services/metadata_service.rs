//! HTML metadata extraction from remote pages.
//!
//! Fetches a page once (bounded timeout, browser-like user agent, no
//! retry, no caching) and scrapes `{title, description, image, favicon}`
//! out of its metadata tags, repairing origin-relative resource URLs.

use std::time::Duration;

use scraper::{Html, Selector};
use serde_json::json;

use crate::domain::entities::PageMetadata;
use crate::error::AppError;
use crate::utils::url::{origin_of, parse_absolute};

/// User agent sent with metadata fetches. Browser-like on purpose: plain
/// library agents get bot-blocked by enough sites to matter.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Service fetching and extracting page metadata.
///
/// Holds one shared HTTP client; every call performs a fresh fetch. That
/// is acceptable because extraction runs interactively at submission
/// time, not in a hot path.
pub struct MetadataService {
    client: reqwest::Client,
}

impl MetadataService {
    /// Creates the service with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    /// Fetches `raw_url` and extracts its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a non-absolute URL, without
    /// touching the network. Connection-level failures and non-2xx
    /// responses both collapse to [`AppError::Fetch`]; the distinction is
    /// logged here and not surfaced to the caller.
    pub async fn extract(&self, raw_url: &str) -> Result<PageMetadata, AppError> {
        let url = parse_absolute(raw_url)?;
        let origin = origin_of(&url);

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::warn!(url = raw_url, error = %e, "Metadata fetch failed");
            AppError::fetch_failed(json!({ "url": raw_url }))
        })?;

        let response = response.error_for_status().map_err(|e| {
            tracing::warn!(
                url = raw_url,
                status = e.status().map(|s| s.as_u16()),
                "Metadata fetch returned error status"
            );
            AppError::fetch_failed(json!({ "url": raw_url }))
        })?;

        let body = response.text().await.map_err(|e| {
            tracing::warn!(url = raw_url, error = %e, "Metadata body read failed");
            AppError::fetch_failed(json!({ "url": raw_url }))
        })?;

        Ok(parse_document(&body, &origin))
    }
}

/// Extracts metadata from an HTML document fetched from `origin`.
///
/// Per field, the first non-empty source wins:
///
/// - title: `og:title` → `twitter:title` → `<title>` → `"No title"`
/// - description: `og:description` → `twitter:description` →
///   `meta[name=description]` → `""`
/// - image: `og:image` → `twitter:image` → `""`
/// - favicon: `link[rel=icon]` → `link[rel="shortcut icon"]` → `/favicon.ico`
fn parse_document(html: &str, origin: &str) -> PageMetadata {
    let doc = Html::parse_document(html);

    let title = meta_content(&doc, r#"meta[property="og:title"]"#)
        .or_else(|| meta_content(&doc, r#"meta[name="twitter:title"]"#))
        .or_else(|| title_text(&doc))
        .unwrap_or_else(|| "No title".to_string());

    let description = meta_content(&doc, r#"meta[property="og:description"]"#)
        .or_else(|| meta_content(&doc, r#"meta[name="twitter:description"]"#))
        .or_else(|| meta_content(&doc, r#"meta[name="description"]"#))
        .unwrap_or_default();

    let image = meta_content(&doc, r#"meta[property="og:image"]"#)
        .or_else(|| meta_content(&doc, r#"meta[name="twitter:image"]"#))
        .unwrap_or_default();

    let favicon = attr_of(&doc, r#"link[rel="icon"]"#, "href")
        .or_else(|| attr_of(&doc, r#"link[rel="shortcut icon"]"#, "href"))
        .unwrap_or_else(|| "/favicon.ico".to_string());

    PageMetadata {
        title,
        description,
        image: resolve_against_origin(origin, &image),
        favicon: resolve_against_origin(origin, &favicon),
    }
}

/// First non-empty `content` attribute among elements matching `css`.
fn meta_content(doc: &Html, css: &str) -> Option<String> {
    attr_of(doc, css, "content")
}

fn attr_of(doc: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    doc.select(&selector).find_map(|el| {
        el.value()
            .attr(attr)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    })
}

fn title_text(doc: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let el = doc.select(&selector).next()?;
    let text: String = el.text().collect();
    let text = text.trim();

    (!text.is_empty()).then(|| text.to_string())
}

/// Repairs an origin-relative resource URL into an absolute one.
///
/// Values already carrying a scheme pass through untouched; everything
/// else is concatenated directly onto the page's origin (a `/` is
/// inserted when the value lacks a leading one). Exact-path semantics —
/// deliberately not RFC 3986 directory-relative resolution.
fn resolve_against_origin(origin: &str, value: &str) -> String {
    if value.is_empty() || value.starts_with("http") {
        value.to_string()
    } else if value.starts_with('/') {
        format!("{origin}{value}")
    } else {
        format!("{origin}/{value}")
    }
}

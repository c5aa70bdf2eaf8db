//! Absolute URL validation helpers.

use crate::error::AppError;
use serde_json::json;
use url::Url;

/// Parses `raw` as an absolute http(s) URL.
///
/// # Errors
///
/// Returns [`AppError::Validation`] when the value does not parse, uses a
/// non-web scheme, or lacks a host.
pub fn parse_absolute(raw: &str) -> Result<Url, AppError> {
    let parsed = Url::parse(raw).map_err(|e| {
        AppError::bad_request(
            "Invalid URL format",
            json!({ "url": raw, "reason": e.to_string() }),
        )
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(AppError::bad_request(
            "URL scheme must be http or https",
            json!({ "url": raw, "scheme": parsed.scheme() }),
        ));
    }

    if !parsed.has_host() {
        return Err(AppError::bad_request(
            "URL must have a host",
            json!({ "url": raw }),
        ));
    }

    Ok(parsed)
}

/// Returns the origin (`scheme://host[:port]`) of a parsed URL.
///
/// Non-default ports are preserved; path, query, and fragment are not.
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

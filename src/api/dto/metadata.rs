//! DTO for metadata preview requests.

use serde::Deserialize;

/// Request to preview metadata for a candidate URL before submitting it.
#[derive(Debug, Deserialize)]
pub struct MetadataRequest {
    pub url: Option<String>,
}

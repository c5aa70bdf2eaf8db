//! Request/response DTOs for the REST API.

pub mod category;
pub mod counters;
pub mod list_links;
pub mod metadata;
pub mod submit;
pub mod transition;

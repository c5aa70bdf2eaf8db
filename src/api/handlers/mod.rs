//! HTTP request handlers for the REST API.

pub mod categories;
pub mod health;
pub mod links;
pub mod metadata;
pub mod users;

pub use health::health_handler;

//! Application services implementing business logic.
//!
//! Services orchestrate domain operations through repository traits and
//! own every policy decision: role gating, moderation state changes,
//! field validation, metadata fallbacks. They hold injected `Arc<dyn …>`
//! repository handles so tests can slot in doubles.
//!
//! - [`LinkService`] - link lifecycle, counters, listing, featured ranking
//! - [`CategoryService`] - administrator-owned category management
//! - [`UserService`] - read-only user queries
//! - [`AuthService`] - bearer token resolution to caller identities
//! - [`MetadataService`] - remote page metadata extraction

pub mod auth_service;
pub mod category_service;
pub mod link_service;
pub mod metadata_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use category_service::{CategoryInput, CategoryService};
pub use link_service::{LinkService, SubmitLink};
pub use metadata_service::MetadataService;
pub use user_service::{UserService, UserStats};

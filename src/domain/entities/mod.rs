//! Core domain entities representing the business data model.
//!
//! This module contains the fundamental data structures that represent the
//! core concepts of the link directory. Entities are plain data structures
//! without business logic.
//!
//! # Entity Types
//!
//! - [`Link`] - A community-submitted website reference with moderation state
//! - [`Category`] - A named grouping with display metadata
//! - [`User`] / [`Identity`] - External identities, read-only here
//! - [`PageMetadata`] - Ephemeral scrape result used to seed a submission
//!
//! # Design Pattern
//!
//! Entities follow the "New Type" pattern with separate structs for creation:
//! - `NewLink`, `NewCategory` - For creating new records
//! - `CategoryPatch`, `StatusChange` - For partial updates
//!
//! [`LinkDetails`] is the read-time projection joining a link with its
//! category display fields and submitter name.

pub mod category;
pub mod link;
pub mod metadata;
pub mod user;

pub use category::{Category, CategoryPatch, NewCategory};
pub use link::{
    CategoryRef, Link, LinkDetails, LinkFilter, LinkStatus, LinkView, NewLink, StatusChange,
    SubmitterRef,
};
pub use metadata::PageMetadata;
pub use user::{Identity, NewUser, Role, User};

//! Infrastructure layer: concrete adapters for external systems.

pub mod persistence;

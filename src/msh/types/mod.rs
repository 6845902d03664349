//! Foundational data structures, error types, and the version registry.

pub mod error;
pub mod models;
pub mod version;

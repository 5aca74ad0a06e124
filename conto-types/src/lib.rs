//! Shared types for the conto workspace.
//!
//! This crate carries the pieces every other crate needs without pulling in
//! transport or storage dependencies: the unified [`ContoError`] enum, the
//! configuration structs consumed by the client builder, dot-path resolution
//! over JSON values, and the one-or-many list normalization helper used by
//! the typed API models.
#![warn(missing_docs)]

mod config;
mod error;
/// Serde helpers for fields the upstream API emits as object-or-list.
pub mod list;
/// Dot-separated path resolution over `serde_json::Value` trees.
pub mod path;

pub use config::{BackoffConfig, CacheConfig, ClientConfig};
pub use error::ContoError;

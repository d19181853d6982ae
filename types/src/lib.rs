//! Core domain types shared across the jamctl crates.
//!
//! Everything here is plain data: resource kinds, attribute payloads,
//! JSON Patch operations, and manifest entries. No IO, no async.

mod kind;
mod manifest;
mod patch;

pub use kind::ResourceKind;
pub use manifest::CollectionDef;
pub use patch::PatchOp;

/// Attribute payload attached to a resource at creation or update time.
///
/// The client treats attributes as an inert mapping from string keys to
/// JSON-compatible values; only the `/schema` and `/flags` leaves carry
/// meaning, and only for the userify operation.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

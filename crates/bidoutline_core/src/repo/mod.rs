//! Storage collaborator contracts and implementations.
//!
//! # Responsibility
//! - Define the load/save contract the outline service depends on.
//! - Isolate SQLite query details from normalization and editing logic.
//!
//! # Invariants
//! - Storage is touched only at session boundaries: load before
//!   normalization, save after commit.

pub mod outline_store;

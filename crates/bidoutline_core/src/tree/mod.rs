//! Outline tree operations.
//!
//! # Responsibility
//! - Address nodes by `(file_index, path)` and expose read/insert/update/
//!   delete operations as pure functions over `OutlineDocumentSet`.
//! - Render documents for terminal review.
//!
//! # Invariants
//! - Every operation returns a new document; the input is left untouched.
//! - Tree errors are reported to the caller, never silently repaired.

pub mod ops;
pub mod render;

pub use ops::{
    add_child, add_file, add_root_node, get_node, remove_file, remove_node, rename_file,
    set_field, set_summary, OutlineError, OutlineField, OutlineResult, RemoveFileOutcome,
};
pub use render::render_document;

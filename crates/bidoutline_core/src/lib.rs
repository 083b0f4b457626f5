//! Core domain logic for bid-document outlines.
//! This crate is the single source of truth for outline invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod repo;
pub mod service;
pub mod session;
pub mod template;
pub mod tree;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::outline::{
    OutlineDocumentSet, OutlineFile, OutlineNode, OutlinePath, ProjectId,
};
pub use normalize::{normalize, normalize_with, NormalizeMode, RawOutline};
pub use repo::outline_store::{
    MemoryOutlineStore, OutlineStore, SqliteOutlineStore, StoreError, StoreResult,
};
pub use service::outline_service::{OutlineService, OutlineServiceError};
pub use session::{CancelPolicy, EditingSession, SessionError, SessionResult, SessionState};
pub use template::{resolve_template, TemplateError, TemplateId, TemplateResolver};
pub use tree::{OutlineError, OutlineField, OutlineResult, RemoveFileOutcome};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

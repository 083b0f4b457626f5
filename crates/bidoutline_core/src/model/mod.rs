//! Outline domain model for bid-document chapter requirements.
//!
//! # Responsibility
//! - Define canonical data structures used by tree, normalization and
//!   session logic.
//!
//! # Invariants
//! - After normalization every document has at least one file and every
//!   file has at least one root node.

pub mod outline;

//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate storage, normalization and editing sessions into
//!   use-case level APIs.
//! - Keep callers decoupled from storage details.

pub mod outline_service;

//! Outline use-case service.
//!
//! # Responsibility
//! - Load stored outlines through normalization.
//! - Open editing sessions and persist their commits.
//!
//! # Invariants
//! - Every document handed to callers has been normalized.
//! - Every document written to storage is re-normalized first, so a file
//!   emptied during editing is restored before it is persisted.

use crate::model::outline::{OutlineDocumentSet, ProjectId};
use crate::normalize::{normalize, NormalizeMode, RawOutline};
use crate::repo::outline_store::{OutlineStore, StoreError};
use crate::session::{CancelPolicy, EditingSession, SessionError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for outline use-cases.
#[derive(Debug)]
pub enum OutlineServiceError {
    /// Storage collaborator failure.
    Store(StoreError),
    /// Session state did not allow the commit.
    Session(SessionError),
}

impl Display for OutlineServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Session(err) => write!(f, "{err}"),
        }
    }
}

impl Error for OutlineServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Session(err) => Some(err),
        }
    }
}

impl From<StoreError> for OutlineServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<SessionError> for OutlineServiceError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

/// Outline service facade over a storage collaborator.
pub struct OutlineService<S: OutlineStore> {
    store: S,
    mode: NormalizeMode,
    cancel_policy: CancelPolicy,
}

impl<S: OutlineStore> OutlineService<S> {
    /// Creates a service using the provided store and placeholder mode.
    pub fn new(store: S, mode: NormalizeMode) -> Self {
        Self {
            store,
            mode,
            cancel_policy: CancelPolicy::default(),
        }
    }

    /// Overrides the cancel policy of sessions opened by this service.
    pub fn with_cancel_policy(mut self, cancel_policy: CancelPolicy) -> Self {
        self.cancel_policy = cancel_policy;
        self
    }

    pub fn mode(&self) -> NormalizeMode {
        self.mode
    }

    /// Loads and normalizes one project's outline.
    pub fn load_outline(
        &self,
        project_id: ProjectId,
    ) -> Result<OutlineDocumentSet, OutlineServiceError> {
        let raw = match self.store.load(project_id)? {
            Some(payload) => RawOutline::from_directory(&payload),
            None => RawOutline::Missing,
        };
        Ok(normalize(raw, self.mode))
    }

    /// Opens a viewing session over the normalized outline.
    pub fn open_session(
        &self,
        project_id: ProjectId,
    ) -> Result<EditingSession, OutlineServiceError> {
        let doc = self.load_outline(project_id)?;
        Ok(EditingSession::with_cancel_policy(doc, self.cancel_policy))
    }

    /// Saves the session's working copy and persists the committed document.
    ///
    /// Returns the document as written to storage.
    pub fn commit_session(
        &self,
        project_id: ProjectId,
        session: &mut EditingSession,
    ) -> Result<OutlineDocumentSet, OutlineServiceError> {
        let committed = session.save()?.clone();
        self.save_outline(project_id, committed)
    }

    /// Normalizes and persists `doc` for `project_id`.
    pub fn save_outline(
        &self,
        project_id: ProjectId,
        doc: OutlineDocumentSet,
    ) -> Result<OutlineDocumentSet, OutlineServiceError> {
        let canonical = normalize(RawOutline::Canonical(doc), self.mode);
        self.store.save(project_id, &canonical)?;
        info!(
            "event=outline_save module=service status=ok project_id={} file_count={}",
            project_id,
            canonical.files.len()
        );
        Ok(canonical)
    }

    /// Deletes one project's outline.
    pub fn delete_outline(&self, project_id: ProjectId) -> Result<(), OutlineServiceError> {
        self.store.delete(project_id)?;
        Ok(())
    }
}

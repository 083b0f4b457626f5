//! Editing session state machine for one project outline.
//!
//! # Responsibility
//! - Scope outline mutations to a working copy while one section is edited.
//! - Commit or discard the working copy at the end of the edit.
//!
//! # Invariants
//! - Mutations are accepted only in `Editing`; `Viewing` rejects them.
//! - The canonical document changes only through `save()`, or through
//!   `cancel()` under `CancelPolicy::KeepWorkingCopy`.
//! - Snapshots are `Arc`-backed clones, so beginning an edit copies no nodes.

use crate::model::outline::{OutlineDocumentSet, OutlineNode, OutlinePath};
use crate::tree::{self, OutlineError, OutlineField, RemoveFileOutcome};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Session lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No edit in progress.
    Viewing,
    /// One section is being edited.
    Editing { section_key: String },
}

/// What `cancel()` does with mutations already applied to the working copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancelPolicy {
    /// Drop the working copy and keep the canonical document.
    #[default]
    Restore,
    /// Commit the working copy anyway, matching the earlier review screen
    /// where structural edits survived a cancel.
    KeepWorkingCopy,
}

/// Errors from editing session operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Mutation or commit attempted while viewing.
    NotEditing,
    /// `begin_edit` called while another section is being edited.
    AlreadyEditing { section_key: String },
    /// Tree operation failed on the working copy.
    Outline(OutlineError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotEditing => write!(f, "no section is being edited"),
            Self::AlreadyEditing { section_key } => {
                write!(f, "section already being edited: {section_key}")
            }
            Self::Outline(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Outline(err) => Some(err),
            _ => None,
        }
    }
}

impl From<OutlineError> for SessionError {
    fn from(value: OutlineError) -> Self {
        Self::Outline(value)
    }
}

/// Result type used by editing session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Single-writer editing session over one outline document.
#[derive(Debug, Clone)]
pub struct EditingSession {
    document: OutlineDocumentSet,
    working: Option<OutlineDocumentSet>,
    state: SessionState,
    cancel_policy: CancelPolicy,
}

impl EditingSession {
    /// Creates a viewing session with the default `CancelPolicy::Restore`.
    pub fn new(document: OutlineDocumentSet) -> Self {
        Self::with_cancel_policy(document, CancelPolicy::default())
    }

    pub fn with_cancel_policy(document: OutlineDocumentSet, cancel_policy: CancelPolicy) -> Self {
        Self {
            document,
            working: None,
            state: SessionState::Viewing,
            cancel_policy,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn cancel_policy(&self) -> CancelPolicy {
        self.cancel_policy
    }

    /// Canonical (last committed) document.
    pub fn document(&self) -> &OutlineDocumentSet {
        &self.document
    }

    /// Working copy while editing, `None` while viewing.
    pub fn working_copy(&self) -> Option<&OutlineDocumentSet> {
        self.working.as_ref()
    }

    /// Returns whether the working copy differs from the canonical document.
    pub fn is_dirty(&self) -> bool {
        self.working
            .as_ref()
            .is_some_and(|working| *working != self.document)
    }

    /// Snapshots the canonical document and enters `Editing(section_key)`.
    pub fn begin_edit(&mut self, section_key: impl Into<String>) -> SessionResult<()> {
        if let SessionState::Editing { section_key } = &self.state {
            return Err(SessionError::AlreadyEditing {
                section_key: section_key.clone(),
            });
        }
        let section_key = section_key.into();
        debug!(
            "event=session_begin_edit module=session status=ok section={}",
            section_key
        );
        self.working = Some(self.document.clone());
        self.state = SessionState::Editing { section_key };
        Ok(())
    }

    /// Commits the working copy and returns to `Viewing`.
    pub fn save(&mut self) -> SessionResult<&OutlineDocumentSet> {
        let working = self.take_working()?;
        self.document = working;
        info!(
            "event=session_save module=session status=ok file_count={} node_count={}",
            self.document.files.len(),
            self.document.node_count()
        );
        Ok(&self.document)
    }

    /// Leaves `Editing` according to the session's `CancelPolicy`.
    pub fn cancel(&mut self) -> SessionResult<&OutlineDocumentSet> {
        let working = self.take_working()?;
        if self.cancel_policy == CancelPolicy::KeepWorkingCopy {
            self.document = working;
        }
        info!(
            "event=session_cancel module=session status=ok policy={:?}",
            self.cancel_policy
        );
        Ok(&self.document)
    }

    /// Updates one text field on the working copy.
    pub fn set_field(
        &mut self,
        file_index: usize,
        path: &OutlinePath,
        field: OutlineField,
        value: impl Into<String>,
    ) -> SessionResult<&OutlineDocumentSet> {
        let working = self.working()?;
        let next = tree::set_field(working, file_index, path, field, value)?;
        Ok(self.replace_working(next))
    }

    /// Appends a child section on the working copy.
    pub fn add_child(
        &mut self,
        file_index: usize,
        path: &OutlinePath,
        new_node: Option<OutlineNode>,
    ) -> SessionResult<OutlinePath> {
        let working = self.working()?;
        let (next, child_path) = tree::add_child(working, file_index, path, new_node)?;
        self.replace_working(next);
        Ok(child_path)
    }

    /// Appends a root chapter on the working copy.
    pub fn add_root_node(
        &mut self,
        file_index: usize,
        new_node: Option<OutlineNode>,
    ) -> SessionResult<OutlinePath> {
        let working = self.working()?;
        let (next, root_path) = tree::add_root_node(working, file_index, new_node)?;
        self.replace_working(next);
        Ok(root_path)
    }

    /// Removes a node from the working copy.
    pub fn remove_node(
        &mut self,
        file_index: usize,
        path: &OutlinePath,
    ) -> SessionResult<&OutlineDocumentSet> {
        let working = self.working()?;
        let next = tree::remove_node(working, file_index, path)?;
        Ok(self.replace_working(next))
    }

    /// Appends a file to the working copy.
    pub fn add_file(
        &mut self,
        name: impl Into<String>,
        initial_node: OutlineNode,
    ) -> SessionResult<&OutlineDocumentSet> {
        let working = self.working()?;
        let next = tree::add_file(working, name, initial_node);
        Ok(self.replace_working(next))
    }

    /// Removes a file from the working copy.
    ///
    /// Returns `false` when the removal was refused because only one file is
    /// left.
    pub fn remove_file(&mut self, file_index: usize) -> SessionResult<bool> {
        let working = self.working()?;
        let outcome = tree::remove_file(working, file_index)?;
        let removed = outcome.is_removed();
        if let RemoveFileOutcome::Removed(next) = outcome {
            self.replace_working(next);
        }
        Ok(removed)
    }

    /// Renames a file on the working copy.
    pub fn rename_file(
        &mut self,
        file_index: usize,
        name: impl Into<String>,
    ) -> SessionResult<&OutlineDocumentSet> {
        let working = self.working()?;
        let next = tree::rename_file(working, file_index, name)?;
        Ok(self.replace_working(next))
    }

    /// Replaces the summary on the working copy.
    pub fn set_summary(&mut self, summary: impl Into<String>) -> SessionResult<&OutlineDocumentSet> {
        let working = self.working()?;
        let next = tree::set_summary(working, summary);
        Ok(self.replace_working(next))
    }

    fn working(&self) -> SessionResult<&OutlineDocumentSet> {
        self.working.as_ref().ok_or(SessionError::NotEditing)
    }

    fn replace_working(&mut self, next: OutlineDocumentSet) -> &OutlineDocumentSet {
        self.working.insert(next)
    }

    fn take_working(&mut self) -> SessionResult<OutlineDocumentSet> {
        let working = self.working.take().ok_or(SessionError::NotEditing)?;
        self.state = SessionState::Viewing;
        Ok(working)
    }
}

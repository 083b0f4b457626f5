//! Outline storage contracts and implementations.
//!
//! # Responsibility
//! - Load raw outline payloads per project without interpreting their shape.
//! - Persist canonical documents after an editing session commits.
//!
//! # Invariants
//! - `load` returns stored JSON untouched; shape repair belongs to
//!   normalization.
//! - A payload that is not valid JSON is reported as missing, never as an
//!   error, so the review screen always has something to render.
//! - `save` fully replaces the previous payload of the project.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::outline::{OutlineDocumentSet, ProjectId};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by outline store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from outline store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Document could not be encoded as JSON.
    Encode(serde_json::Error),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode outline: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "outline store requires schema version {expected_version}, got {actual_version}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Storage collaborator for per-project outline payloads.
pub trait OutlineStore {
    /// Loads the raw `documentDirectory` payload, if any.
    fn load(&self, project_id: ProjectId) -> StoreResult<Option<Value>>;
    /// Replaces the stored payload with a canonical document.
    fn save(&self, project_id: ProjectId, doc: &OutlineDocumentSet) -> StoreResult<()>;
    /// Stores a raw payload as produced by the parse step or older releases.
    fn save_raw(&self, project_id: ProjectId, payload: &Value) -> StoreResult<()>;
    /// Deletes the payload together with the owning project.
    fn delete(&self, project_id: ProjectId) -> StoreResult<()>;
}

impl<S: OutlineStore + ?Sized> OutlineStore for &S {
    fn load(&self, project_id: ProjectId) -> StoreResult<Option<Value>> {
        (**self).load(project_id)
    }

    fn save(&self, project_id: ProjectId, doc: &OutlineDocumentSet) -> StoreResult<()> {
        (**self).save(project_id, doc)
    }

    fn save_raw(&self, project_id: ProjectId, payload: &Value) -> StoreResult<()> {
        (**self).save_raw(project_id, payload)
    }

    fn delete(&self, project_id: ProjectId) -> StoreResult<()> {
        (**self).delete(project_id)
    }
}

/// In-process store for tests and one-shot tools.
#[derive(Debug, Default)]
pub struct MemoryOutlineStore {
    payloads: RefCell<BTreeMap<ProjectId, Value>>,
}

impl MemoryOutlineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.payloads.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.borrow().is_empty()
    }
}

impl OutlineStore for MemoryOutlineStore {
    fn load(&self, project_id: ProjectId) -> StoreResult<Option<Value>> {
        Ok(self.payloads.borrow().get(&project_id).cloned())
    }

    fn save(&self, project_id: ProjectId, doc: &OutlineDocumentSet) -> StoreResult<()> {
        let payload = serde_json::to_value(doc)?;
        self.payloads.borrow_mut().insert(project_id, payload);
        Ok(())
    }

    fn save_raw(&self, project_id: ProjectId, payload: &Value) -> StoreResult<()> {
        self.payloads
            .borrow_mut()
            .insert(project_id, payload.clone());
        Ok(())
    }

    fn delete(&self, project_id: ProjectId) -> StoreResult<()> {
        self.payloads.borrow_mut().remove(&project_id);
        Ok(())
    }
}

/// SQLite-backed outline store.
pub struct SqliteOutlineStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOutlineStore<'conn> {
    /// Creates store from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }

    fn upsert_payload(&self, project_id: ProjectId, payload: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO project_outlines (project_id, payload)
             VALUES (?1, ?2)
             ON CONFLICT(project_id) DO UPDATE
             SET payload = excluded.payload,
                 updated_at = (strftime('%s', 'now') * 1000);",
            params![project_id.to_string(), payload],
        )?;
        Ok(())
    }
}

impl OutlineStore for SqliteOutlineStore<'_> {
    fn load(&self, project_id: ProjectId) -> StoreResult<Option<Value>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload
                 FROM project_outlines
                 WHERE project_id = ?1;",
                [project_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            return Ok(None);
        };
        match serde_json::from_str(&payload) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(
                    "event=outline_load module=repo status=degraded project_id={} error_code=invalid_payload error={}",
                    project_id, err
                );
                Ok(None)
            }
        }
    }

    fn save(&self, project_id: ProjectId, doc: &OutlineDocumentSet) -> StoreResult<()> {
        let payload = serde_json::to_string(doc)?;
        self.upsert_payload(project_id, &payload)
    }

    fn save_raw(&self, project_id: ProjectId, payload: &Value) -> StoreResult<()> {
        let payload = serde_json::to_string(payload)?;
        self.upsert_payload(project_id, &payload)
    }

    fn delete(&self, project_id: ProjectId) -> StoreResult<()> {
        self.conn.execute(
            "DELETE FROM project_outlines WHERE project_id = ?1;",
            [project_id.to_string()],
        )?;
        Ok(())
    }
}

//! SQLite storage bootstrap for persisted outlines.
//!
//! # Responsibility
//! - Open connections for the `project_outlines` table.
//! - Bring the table to the schema version this binary understands.
//!
//! # Invariants
//! - One row per project; `payload` holds the `documentDirectory` JSON of
//!   whatever shape was last written (legacy flat text or canonical tree).
//! - SQL never inspects `payload`; shape repair happens on load through
//!   normalization.
//! - A database written by a newer binary is refused instead of downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Errors from opening or migrating the outline database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// `user_version` is ahead of the newest outline migration.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

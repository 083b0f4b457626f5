//! Outline schema migrations.
//!
//! Version 1 creates `project_outlines(project_id, payload, created_at,
//! updated_at)` keyed by the project UUID text.
//!
//! # Invariants
//! - Migrations only add tables or columns; stored payloads are never
//!   rewritten here, since old shapes must stay loadable.
//! - Pending migrations run in one transaction and each bumps
//!   `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_project_outlines.sql"),
}];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }
    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS
        .iter()
        .filter(|migration| migration.version > current_version)
    {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        current_version, latest
    );
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version};
    use rusqlite::Connection;

    #[test]
    fn reapplying_migrations_keeps_stored_payloads() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO project_outlines (project_id, payload) VALUES (?1, ?2);",
            ["p-1", r#"{"commercial":"投标函"}"#],
        )
        .unwrap();

        apply_migrations(&mut conn).unwrap();

        let payload: String = conn
            .query_row(
                "SELECT payload FROM project_outlines WHERE project_id = 'p-1';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(payload, r#"{"commercial":"投标函"}"#);
        let version: u32 = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, latest_version());
    }
}

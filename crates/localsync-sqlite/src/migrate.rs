//! Schema migrations
//!
//! SQL files under `migrations/` are compiled in and applied in version
//! order. Each applied version is recorded in `schema_migrations`, so opening
//! an existing database only runs what it is missing.

use std::collections::BTreeSet;

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Result, SqliteError};

/// One embedded migration
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: &'static str,
    pub sql: &'static str,
}

/// Every migration, oldest first
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "000",
        sql: include_str!("../migrations/000_create_schema_migrations.sql"),
    },
    Migration {
        version: "001",
        sql: include_str!("../migrations/001_create_entries_table.sql"),
    },
];

/// Bring the database up to the latest schema.
///
/// Returns how many migrations were applied by this call.
pub fn migrate(conn: &Connection) -> Result<usize> {
    let applied = applied_versions(conn)?;
    let mut count = 0;

    for migration in MIGRATIONS {
        if applied.contains(migration.version) {
            continue;
        }
        apply(conn, migration)?;
        count += 1;
    }

    Ok(count)
}

/// Versions already recorded, empty for a fresh database.
pub fn applied_versions(conn: &Connection) -> Result<BTreeSet<String>> {
    let has_table = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations'",
            [],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if !has_table {
        return Ok(BTreeSet::new());
    }

    let mut stmt = conn.prepare("SELECT version FROM schema_migrations")?;
    let versions = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<BTreeSet<String>>>()?;
    Ok(versions)
}

fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(migration.sql)
        .map_err(|e| SqliteError::Migration(format!("{}: {}", migration.version, e)))?;
    tx.execute(
        "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, CURRENT_TIMESTAMP)",
        [migration.version],
    )?;
    tx.commit()?;

    debug!(version = migration.version, "applied migration");
    Ok(())
}

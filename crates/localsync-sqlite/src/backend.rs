//! SQLite key/value backend implementing the `Backend` trait

use std::path::Path;

use localsync_core::{Backend, StoreError, StoreResult};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, trace};

use crate::error::SqliteError;

/// SQLite-backed key/value substrate
///
/// Every store sharing a database shares one `entries` table, the same way
/// stores share one browser storage area. The connection is held behind a
/// mutex so the backend can be shared across threads.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
    max_bytes: Option<usize>,
}

impl SqliteBackend {
    /// Create a backend from a connection, applying migrations.
    pub fn new(conn: Connection) -> crate::error::Result<Self> {
        crate::migrate::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            max_bytes: None,
        })
    }

    /// Create a new in-memory SQLite backend (for testing)
    pub fn in_memory() -> crate::error::Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    /// Open (or create) a file-backed SQLite backend
    pub fn open(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened sqlite backend");
        Self::new(conn)
    }

    /// Refuse writes that would take the table past `max_bytes`
    /// (key plus value bytes across all entries).
    pub fn with_quota(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// Bytes currently used by all entries.
    pub fn used_bytes(&self) -> StoreResult<usize> {
        let conn = self.conn.lock();
        used_bytes_excluding(&conn, None)
    }
}

/// Sum of key and value byte lengths, optionally ignoring one key.
fn used_bytes_excluding(conn: &Connection, key: Option<&str>) -> StoreResult<usize> {
    let used: i64 = conn
        .query_row(
            "SELECT COALESCE(SUM(length(CAST(key AS BLOB)) + length(CAST(value AS BLOB))), 0)
             FROM entries
             WHERE ?1 IS NULL OR key <> ?1",
            [key],
            |row| row.get(0),
        )
        .map_err(db_err)?;
    Ok(used as usize)
}

fn db_err(err: rusqlite::Error) -> StoreError {
    SqliteError::Database(err).into()
}

impl Backend for SqliteBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        trace!(key, "sqlite get");
        self.conn
            .lock()
            .query_row("SELECT value FROM entries WHERE key = ?", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .map_err(db_err)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let conn = self.conn.lock();

        if let Some(limit) = self.max_bytes {
            let requested = used_bytes_excluding(&conn, Some(key))? + key.len() + value.len();
            if requested > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    requested,
                    limit,
                });
            }
        }

        conn.execute(
            "INSERT INTO entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )
        .map_err(db_err)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn
            .lock()
            .execute("DELETE FROM entries WHERE key = ?", [key])
            .map_err(db_err)?;
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT key FROM entries ORDER BY key")
            .map_err(db_err)?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(db_err)?
            .collect::<Result<Vec<String>, rusqlite::Error>>()
            .map_err(db_err)?;
        Ok(keys)
    }

    fn len(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .lock()
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            .map_err(db_err)?;
        Ok(count as usize)
    }

    fn check_available(&self) -> StoreResult<()> {
        self.conn
            .lock()
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|e| StoreError::EnvironmentUnavailable(e.to_string()))?;
        Ok(())
    }
}

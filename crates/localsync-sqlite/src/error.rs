//! Error types for SQLite backend

use localsync_core::StoreError;
use rusqlite::ErrorCode;
use thiserror::Error;

/// Result type for SQLite backend operations
pub type Result<T> = std::result::Result<T, SqliteError>;

/// Errors that can occur during SQLite backend operations
#[derive(Debug, Error)]
pub enum SqliteError {
    /// Database connection or query error
    #[error("SQLite error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SqliteError {
    /// Whether SQLite reported the database or disk as full.
    pub fn is_disk_full(&self) -> bool {
        matches!(
            self,
            SqliteError::Database(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::DiskFull
        )
    }
}

/// Convert SqliteError to StoreError for the backend trait
impl From<SqliteError> for StoreError {
    fn from(err: SqliteError) -> Self {
        if err.is_disk_full() {
            return StoreError::QuotaExceeded {
                key: String::new(),
                requested: 0,
                limit: 0,
            };
        }
        match err {
            SqliteError::Database(e) => StoreError::Backend(format!("SQLite: {}", e)),
            SqliteError::Migration(msg) => StoreError::Backend(format!("Migration: {}", msg)),
            SqliteError::Io(e) => StoreError::Backend(format!("IO: {}", e)),
        }
    }
}

//! SQLite backend for localsync stores
//!
//! This crate provides a persistent implementation of the `Backend` trait
//! from `localsync-core`, so stores can live on disk instead of in memory.
//!
//! # Features
//!
//! - One `entries(key, value)` table holds every store's index and records
//! - Schema versioned through embedded migrations
//! - Supports in-memory databases for testing
//! - Optional byte quota, reported as `StoreError::QuotaExceeded`
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use localsync_core::{Model, Store};
//! use localsync_sqlite::SqliteBackend;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(SqliteBackend::open("todos.db")?);
//! let mut store = Store::new("todos", backend)?;
//!
//! let mut todo = Model::new(json!({"title": "persist me"}));
//! store.create(&mut todo)?;
//! assert_eq!(store.find_all()?.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod error;
pub mod migrate;

// Re-export main types
pub use backend::SqliteBackend;
pub use error::{Result, SqliteError};

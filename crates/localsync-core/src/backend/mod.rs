//! Backing substrate abstraction
//!
//! A store persists into a flat, string-keyed, string-valued substrate.
//! The substrate is reached only through the [`Backend`] capability trait so
//! it can be swapped without touching store logic. Implementations exist for:
//!
//! - **Memory**: `BTreeMap` behind a lock, with optional byte quota (`MemoryBackend`)
//! - **SQLite**: file-backed key/value table (separate crate, `localsync-sqlite`)
//!
//! # Example
//!
//! ```rust
//! use localsync_core::backend::{Backend, MemoryBackend};
//!
//! let backend = MemoryBackend::new();
//! backend.set("todos", "a,b").unwrap();
//! assert_eq!(backend.get("todos").unwrap().as_deref(), Some("a,b"));
//! assert_eq!(backend.len().unwrap(), 1);
//! ```

mod memory;
mod traits;

pub use memory::MemoryBackend;
pub use traits::{Backend, SharedBackend};

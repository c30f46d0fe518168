//! localsync core
//!
//! Redirects a model/collection sync protocol to a local key/value substrate
//! instead of a remote API, keeping the callback/promise contract callers
//! already rely on.
//!
//! - [`backend`]: the flat string key/value substrate (`Backend` trait, `MemoryBackend`)
//! - [`Store`]: one named index of record ids plus one entry per record
//! - [`sync`]: verb dispatch, result delivery and local/remote strategy selection
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use localsync_core::backend::{Backend, MemoryBackend};
//! use localsync_core::{Model, Store};
//! use serde_json::json;
//!
//! let backend = Arc::new(MemoryBackend::new());
//! let mut store = Store::new("todos", backend.clone()).unwrap();
//!
//! let mut todo = Model::new(json!({"title": "a"}));
//! let saved = store.create(&mut todo).unwrap().unwrap();
//!
//! let id = saved["id"].as_str().unwrap();
//! assert_eq!(backend.get("todos").unwrap().as_deref(), Some(id));
//! assert_eq!(store.find_all().unwrap(), vec![saved.clone()]);
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod id;
pub mod record;
pub mod serializer;
pub mod store;
pub mod sync;

// Re-export main types at crate root
pub use backend::{Backend, MemoryBackend, SharedBackend};
pub use config::{CallbackStyle, SyncConfig};
pub use error::{StoreError, StoreResult};
pub use id::guid;
pub use record::{Collection, Model, Record, RecordId, Syncable};
pub use serializer::{JsonSerializer, Serializer};
pub use store::{SharedStore, Store};
pub use sync::{
    LocalSync, Method, Promise, SyncError, SyncOptions, SyncOutcome, SyncRouter, SyncStrategy,
};

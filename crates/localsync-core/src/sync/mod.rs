//! Sync dispatch: routing CRUD verbs to a local store or a remote strategy
//!
//! Callers hand a verb, a model and [`SyncOptions`] to a [`SyncRouter`].
//! The router asks [`select_strategy`] whether the model resolves to a local
//! store; if so [`LocalSync`] performs the store operation, otherwise the
//! remote strategy supplied by the host runs.
//!
//! Local results are computed once as a [`SyncOutcome`] and then delivered
//! to the `success`/`error`/`complete` callbacks and, when enabled, to a
//! [`Promise`]. Store faults never escape `sync`; they become failure
//! deliveries.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use localsync_core::backend::MemoryBackend;
//! use localsync_core::sync::{remote_fn, Method, SyncOptions, SyncRouter};
//! use localsync_core::{Model, Store, SyncConfig};
//! use serde_json::json;
//!
//! let store = Store::new("todos", Arc::new(MemoryBackend::new()))
//!     .unwrap()
//!     .into_shared();
//! let router = SyncRouter::new(
//!     SyncConfig::default(),
//!     remote_fn(|_, _, _| None),
//! );
//!
//! let mut todo = Model::new(json!({"title": "write docs"})).with_store(store);
//! let promise = router.sync(Method::Create, &mut todo, SyncOptions::new());
//! let saved = promise.unwrap().try_take().unwrap().unwrap();
//! assert_eq!(saved["title"], "write docs");
//! ```

mod deferred;
mod dispatcher;
mod error;
mod method;
mod options;
mod strategy;

pub use deferred::{Deferred, Promise};
pub use dispatcher::{
    dispatch, LocalSync, SyncOutcome, PRIVATE_BROWSING_MESSAGE, RECORD_NOT_FOUND_MESSAGE,
};
pub use error::SyncError;
pub use method::Method;
pub use options::{Invocation, SyncFlags, SyncOptions};
pub use strategy::{remote_fn, select_strategy, FnStrategy, Strategy, SyncRouter, SyncStrategy};

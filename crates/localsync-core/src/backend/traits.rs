//! Backend trait definitions

use std::sync::Arc;

use crate::error::StoreResult;

/// Flat string key/value substrate consumed by [`crate::Store`].
///
/// Methods take `&self`: a substrate is shared state that several stores
/// (and other processes) may write concurrently. Implementations provide
/// their own interior mutability. There is no cross-call atomicity; the last
/// write to a key wins.
pub trait Backend: Send + Sync {
    /// Read the value under `key`, or `None` if absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// Fails with `StoreError::QuotaExceeded` when the substrate is full.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Enumerate every key in the substrate, across all namespaces.
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Total number of entries in the substrate.
    fn len(&self) -> StoreResult<usize>;

    /// Whether the substrate holds no entries at all.
    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Probe that the substrate can be used.
    ///
    /// Called once when a store is constructed.
    fn check_available(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Reference-counted handle to a substrate shared between stores.
pub type SharedBackend = Arc<dyn Backend>;

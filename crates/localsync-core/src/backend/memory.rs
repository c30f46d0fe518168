//! In-memory backend
//!
//! A `BTreeMap`-based substrate for tests, development and short-lived
//! processes. Entries vanish with the process.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::backend::traits::Backend;
use crate::error::{StoreError, StoreResult};

/// In-memory key/value substrate.
///
/// Optionally bounded by a byte quota (key plus value lengths across all
/// entries), mimicking the capacity limit of browser storage. A quota of zero
/// refuses every write, which is how private-browsing modes behave.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<BTreeMap<String, String>>,
    max_bytes: Option<usize>,
    unavailable: bool,
}

impl MemoryBackend {
    /// Create a new empty, unbounded backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty backend that refuses writes beyond `max_bytes`.
    pub fn with_quota(max_bytes: usize) -> Self {
        Self {
            max_bytes: Some(max_bytes),
            ..Self::default()
        }
    }

    /// Create a backend seeded with entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(map),
            ..Self::default()
        }
    }

    /// A backend whose availability probe fails (storage disabled or blocked).
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Bytes currently used by all entries.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }

    /// Snapshot of all entries (for testing).
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.read().clone()
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.write();

        if let Some(limit) = self.max_bytes {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let requested = used + key.len() + value.len();
            if requested > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    requested,
                    limit,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.entries.read().len())
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable {
            return Err(StoreError::EnvironmentUnavailable(
                "memory backend disabled".to_string(),
            ));
        }
        Ok(())
    }
}

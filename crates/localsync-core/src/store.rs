//! Named record store over a key/value backend
//!
//! A [`Store`] owns one namespace of the substrate:
//!
//! - `"<name>"` holds the index: record ids joined by `,`, in insertion order
//! - `"<name>-<id>"` holds each serialized record
//!
//! The index is read once at construction and re-written after every
//! membership change. Store operations never catch backend faults; they
//! propagate to the caller (normally the sync dispatcher).

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, trace};

use crate::backend::SharedBackend;
use crate::error::{StoreError, StoreResult};
use crate::id::guid;
use crate::record::{Record, RecordId};
use crate::serializer::{JsonSerializer, Serializer};

/// Separator between ids in the persisted index.
pub const INDEX_SEPARATOR: char = ',';

/// A store shared between models, collections and the dispatcher.
pub type SharedStore = Arc<Mutex<Store>>;

/// Record store bound to one name within a backend.
pub struct Store {
    name: String,
    serializer: Box<dyn Serializer>,
    records: Vec<String>,
    backend: SharedBackend,
}

impl Store {
    /// Open the store `name` with the default JSON serializer.
    ///
    /// Fails with `StoreError::EnvironmentUnavailable` if the backend's
    /// availability probe fails.
    pub fn new(name: impl Into<String>, backend: SharedBackend) -> StoreResult<Self> {
        Self::with_serializer(name, backend, Box::new(JsonSerializer))
    }

    /// Open the store `name` with a custom serializer.
    pub fn with_serializer(
        name: impl Into<String>,
        backend: SharedBackend,
        serializer: Box<dyn Serializer>,
    ) -> StoreResult<Self> {
        backend.check_available()?;

        let name = name.into();
        let records = read_index(backend.as_ref(), &name)?;
        debug!(store = %name, records = records.len(), "opened store");

        Ok(Self {
            name,
            serializer,
            records,
            backend,
        })
    }

    /// Wrap the store for sharing with models and collections.
    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The in-memory index, in insertion order.
    pub fn ids(&self) -> &[String] {
        &self.records
    }

    /// Number of ids in this store's index.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Backend key holding the record `id`.
    pub fn item_key(&self, id: &str) -> String {
        format!("{}-{}", self.name, id)
    }

    /// Persist the in-memory index.
    fn save(&self) -> StoreResult<()> {
        let joined = self.records.join(&INDEX_SEPARATOR.to_string());
        self.backend.set(&self.name, &joined)
    }

    /// Re-read the index from the backend, discarding the in-memory copy.
    pub fn reload(&mut self) -> StoreResult<()> {
        self.records = read_index(self.backend.as_ref(), &self.name)?;
        Ok(())
    }

    /// Add a record, giving it a generated id if it has none.
    ///
    /// Returns the record as re-read from the backend.
    pub fn create<R: Record + ?Sized>(&mut self, record: &mut R) -> StoreResult<Option<Value>> {
        let id = match record.id() {
            Some(id) => id,
            None => {
                let id = RecordId::new(guid());
                record.set_id(id.clone());
                id
            }
        };
        check_id(&id)?;

        let key = self.item_key(id.as_str());
        let data = self.serializer.serialize(&record.to_json())?;
        self.backend.set(&key, &data)?;
        self.records.push(id.to_string());
        self.save()?;
        debug!(store = %self.name, %id, "created record");

        self.find_by_id(&id)
    }

    /// Replace a record's stored copy, adding it to the index if missing.
    ///
    /// Returns the record as re-read from the backend.
    pub fn update<R: Record + ?Sized>(&mut self, record: &R) -> StoreResult<Option<Value>> {
        let id = require_id(record)?;
        check_id(&id)?;

        let key = self.item_key(id.as_str());
        let data = self.serializer.serialize(&record.to_json())?;
        self.backend.set(&key, &data)?;

        if !self.records.iter().any(|r| r == id.as_str()) {
            self.records.push(id.to_string());
            self.save()?;
        }
        debug!(store = %self.name, %id, "updated record");

        self.find_by_id(&id)
    }

    /// Look up a record by the id it carries.
    pub fn find<R: Record + ?Sized>(&self, record: &R) -> StoreResult<Option<Value>> {
        match record.id() {
            Some(id) => self.find_by_id(&id),
            None => Ok(None),
        }
    }

    /// Look up a record by id.
    pub fn find_by_id(&self, id: &RecordId) -> StoreResult<Option<Value>> {
        let key = self.item_key(id.as_str());
        trace!(store = %self.name, %key, "reading record");
        let data = self.backend.get(&key)?;
        self.serializer.deserialize(data.as_deref())
    }

    /// Every record in index order.
    ///
    /// Ids whose entry is missing (or decodes to `null`) are skipped.
    pub fn find_all(&self) -> StoreResult<Vec<Value>> {
        let mut out = Vec::with_capacity(self.records.len());
        for id in &self.records {
            let data = self.backend.get(&self.item_key(id))?;
            match self.serializer.deserialize(data.as_deref())? {
                Some(Value::Null) | None => {
                    trace!(store = %self.name, %id, "skipping missing record");
                }
                Some(value) => out.push(value),
            }
        }
        Ok(out)
    }

    /// Remove a record and every index occurrence of its id.
    ///
    /// Returns the record as passed in, not re-read.
    pub fn destroy<R: Record + ?Sized>(&mut self, record: &R) -> StoreResult<Value> {
        let id = require_id(record)?;

        self.backend.remove(&self.item_key(id.as_str()))?;
        self.records.retain(|r| r != id.as_str());
        self.save()?;
        debug!(store = %self.name, %id, "destroyed record");

        Ok(record.to_json())
    }

    /// Remove the index entry and every `"<name>-"` entry from the backend.
    ///
    /// The emptied index is not written back: its key has just been removed,
    /// and an absent index reads as empty.
    pub fn clear(&mut self) -> StoreResult<()> {
        let prefix = format!("{}-", self.name);

        self.backend.remove(&self.name)?;
        let mut removed = 0usize;
        for key in self.backend.keys()? {
            if key.starts_with(&prefix) {
                self.backend.remove(&key)?;
                removed += 1;
            }
        }
        self.records.clear();
        debug!(store = %self.name, removed, "cleared store");

        Ok(())
    }

    /// Total entry count of the whole backend, not just this store.
    pub fn size(&self) -> StoreResult<usize> {
        self.backend.len()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.name)
            .field("records", &self.records)
            .finish()
    }
}

fn read_index(backend: &dyn crate::backend::Backend, name: &str) -> StoreResult<Vec<String>> {
    let index = backend.get(name)?;
    Ok(index
        .as_deref()
        .unwrap_or_default()
        .split(INDEX_SEPARATOR)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect())
}

fn require_id<R: Record + ?Sized>(record: &R) -> StoreResult<RecordId> {
    record.id().ok_or_else(|| StoreError::MissingId {
        id_attribute: record.id_attribute().to_string(),
    })
}

fn check_id(id: &RecordId) -> StoreResult<()> {
    if id.as_str().contains(INDEX_SEPARATOR) {
        return Err(StoreError::InvalidId(id.to_string()));
    }
    Ok(())
}

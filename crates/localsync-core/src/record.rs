//! Record and model capabilities consumed by the store and the dispatcher.
//!
//! The store never owns domain objects. It reads an id, writes a generated
//! id back, and asks for a JSON view to serialize. [`Record`] is that
//! capability; [`Syncable`] adds store resolution for the dispatcher.
//! [`Model`] and [`Collection`] are ready-made implementations over a JSON
//! attribute map.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::store::SharedStore;

/// Default name of the attribute holding a record's id.
pub const DEFAULT_ID_ATTRIBUTE: &str = "id";

/// A record identifier, always held in its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Interpret a JSON attribute value as an id.
    ///
    /// `null`, `false`, the empty string, objects and arrays carry no id.
    /// Numbers are stringified, so `0` is a valid id.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            Value::Bool(true) => Some(Self("true".to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl PartialEq<&str> for RecordId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Identity and serialization capability a store needs from a record.
pub trait Record {
    /// Name of the attribute holding the id.
    fn id_attribute(&self) -> &str {
        DEFAULT_ID_ATTRIBUTE
    }

    /// The record's id, or `None` if it has not been assigned one.
    fn id(&self) -> Option<RecordId>;

    /// Assign an id, writing it onto the id attribute.
    fn set_id(&mut self, id: RecordId);

    /// JSON view handed to the serializer.
    fn to_json(&self) -> Value;
}

/// A record the dispatcher can sync: it can name the store it persists to.
pub trait Syncable: Record {
    /// Store attached directly to this model.
    fn store(&self) -> Option<SharedStore> {
        None
    }

    /// Store of the collection that owns this model.
    fn collection_store(&self) -> Option<SharedStore> {
        None
    }

    /// The model's own store, falling back to its collection's.
    fn resolve_store(&self) -> Option<SharedStore> {
        self.store().or_else(|| self.collection_store())
    }
}

/// A single record held as a JSON attribute map.
#[derive(Clone, Default)]
pub struct Model {
    attributes: Map<String, Value>,
    id_attribute: Option<String>,
    store: Option<SharedStore>,
    collection_store: Option<SharedStore>,
}

impl Model {
    /// Create a model from attributes. Non-object values yield an empty model.
    pub fn new(attributes: Value) -> Self {
        let attributes = match attributes {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            attributes,
            ..Self::default()
        }
    }

    /// Use a different attribute as the id (e.g. `"_id"`).
    pub fn with_id_attribute(mut self, name: impl Into<String>) -> Self {
        self.id_attribute = Some(name.into());
        self
    }

    /// Persist this model to its own store.
    pub fn with_store(mut self, store: SharedStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Mark this model as owned by a collection persisted to `store`.
    pub fn in_collection(mut self, store: SharedStore) -> Self {
        self.collection_store = Some(store);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }

    /// Merge a server/store response into the attributes.
    pub fn merge(&mut self, response: &Value) {
        if let Value::Object(map) = response {
            for (k, v) in map {
                self.attributes.insert(k.clone(), v.clone());
            }
        }
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("attributes", &self.attributes)
            .field("id_attribute", &self.id_attribute())
            .field("has_store", &self.store.is_some())
            .field("in_collection", &self.collection_store.is_some())
            .finish()
    }
}

impl Record for Model {
    fn id_attribute(&self) -> &str {
        self.id_attribute.as_deref().unwrap_or(DEFAULT_ID_ATTRIBUTE)
    }

    fn id(&self) -> Option<RecordId> {
        self.attributes
            .get(self.id_attribute())
            .and_then(RecordId::from_value)
    }

    fn set_id(&mut self, id: RecordId) {
        let key = self.id_attribute().to_string();
        self.attributes.insert(key, Value::String(id.into_string()));
    }

    fn to_json(&self) -> Value {
        Value::Object(self.attributes.clone())
    }
}

impl Syncable for Model {
    fn store(&self) -> Option<SharedStore> {
        self.store.clone()
    }

    fn collection_store(&self) -> Option<SharedStore> {
        self.collection_store.clone()
    }
}

/// An ordered set of models sharing one store.
///
/// Reading a collection loads every record of its store.
#[derive(Clone, Default)]
pub struct Collection {
    store: Option<SharedStore>,
    models: Vec<Value>,
}

impl Collection {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store: Some(store),
            models: Vec::new(),
        }
    }

    /// A collection with no store of its own (synced remotely).
    pub fn detached() -> Self {
        Self::default()
    }

    /// Build a model owned by this collection.
    pub fn model(&self, attributes: Value) -> Model {
        let model = Model::new(attributes);
        match &self.store {
            Some(store) => model.in_collection(store.clone()),
            None => model,
        }
    }

    /// Replace the loaded models, typically with a read response.
    pub fn reset(&mut self, response: &Value) {
        self.models = match response {
            Value::Array(items) => items.clone(),
            Value::Null => Vec::new(),
            other => vec![other.clone()],
        };
    }

    pub fn models(&self) -> &[Value] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("models", &self.models)
            .field("has_store", &self.store.is_some())
            .finish()
    }
}

impl Record for Collection {
    fn id(&self) -> Option<RecordId> {
        None
    }

    fn set_id(&mut self, _id: RecordId) {}

    fn to_json(&self) -> Value {
        Value::Array(self.models.clone())
    }
}

impl Syncable for Collection {
    fn store(&self) -> Option<SharedStore> {
        self.store.clone()
    }
}

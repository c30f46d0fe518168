//! Record encoding between JSON values and stored strings.
//!
//! The substrate only holds strings, so every record passes through a
//! [`Serializer`] on its way in and out. [`JsonSerializer`] is the default;
//! any type honouring the same contract can be supplied to a store instead.

use serde_json::Value;

use crate::error::StoreResult;

/// Encode/decode contract for stored records.
///
/// `deserialize` must accept a missing entry (`None`) or an empty string and
/// return `Ok(None)` rather than fail: backends report absent keys that way.
pub trait Serializer: Send + Sync {
    fn serialize(&self, value: &Value) -> StoreResult<String>;

    fn deserialize(&self, data: Option<&str>) -> StoreResult<Option<Value>>;
}

/// JSON codec with passthrough for primitives.
///
/// Objects and arrays are encoded as JSON text. Strings are stored as-is,
/// other scalars as their literal text. On the way back, text that does not
/// parse as JSON is returned as a string.
///
/// Because strings are stored unquoted, a string that is itself valid JSON
/// does not survive a round trip: `"42"` comes back as `42`, `"true"` as
/// `true`, `"null"` as `null`, and `""` as no value at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, value: &Value) -> StoreResult<String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Object(_) | Value::Array(_) => Ok(serde_json::to_string(value)?),
            other => Ok(other.to_string()),
        }
    }

    fn deserialize(&self, data: Option<&str>) -> StoreResult<Option<Value>> {
        match data {
            None | Some("") => Ok(None),
            Some(text) => match serde_json::from_str(text) {
                Ok(value) => Ok(Some(value)),
                Err(_) => Ok(Some(Value::String(text.to_string()))),
            },
        }
    }
}

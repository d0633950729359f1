//! How a JSON scalar is laid out in a leaf's bytes.

use base64::Engine;
use bytes::Bytes;
use serde_json::Value as JsonValue;

use crate::{Result, SerdeError};

/// The byte layout of leaf values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LeafEncoding {
    /// Leaves are plain text.
    ///
    /// Reading yields strings; a leaf that is not UTF-8 is base64 encoded.
    /// Writing stores strings as is, numbers and booleans as their text,
    /// and `null` as the empty value. Empty objects and arrays are stored
    /// empty too, so they read back as `""`.
    #[default]
    Text,
    /// Each leaf is a JSON document holding one scalar or an empty object or
    /// array. The empty value reads as `null`. Use this to round trip typed
    /// values.
    Json,
}

impl LeafEncoding {
    pub fn decode(self, path: &str, data: &Bytes) -> Result<JsonValue> {
        match self {
            LeafEncoding::Text => Ok(match std::str::from_utf8(data) {
                Ok(s) => JsonValue::String(s.to_string()),
                Err(_) => JsonValue::String(
                    base64::engine::general_purpose::STANDARD.encode(data),
                ),
            }),
            LeafEncoding::Json => {
                if data.is_empty() {
                    return Ok(JsonValue::Null);
                }
                serde_json::from_slice(data).map_err(|e| SerdeError::decode(path, e))
            }
        }
    }

    /// Encode a scalar or an empty container. Non-empty objects and arrays
    /// are not leaves and are refused.
    pub fn encode(self, path: &str, value: &JsonValue) -> Result<Bytes> {
        if !is_leaf_value(value) {
            return Err(SerdeError::encode(path, "only scalars can be stored in a leaf"));
        }
        match self {
            LeafEncoding::Text => Ok(match value {
                JsonValue::Null | JsonValue::Object(_) | JsonValue::Array(_) => Bytes::new(),
                JsonValue::String(s) => Bytes::from(s.clone()),
                other => Bytes::from(other.to_string()),
            }),
            LeafEncoding::Json => serde_json::to_vec(value)
                .map(Bytes::from)
                .map_err(|e| SerdeError::encode(path, e)),
        }
    }
}

fn is_leaf_value(value: &JsonValue) -> bool {
    match value {
        JsonValue::Object(map) => map.is_empty(),
        JsonValue::Array(items) => items.is_empty(),
        _ => true,
    }
}

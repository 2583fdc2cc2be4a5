//! Typed key/value pairs attached to records.

use serde::Serialize;
use serde_json::{Map, Value};

/// Ordered map of field values. Keys keep their first insertion position.
pub type Fields = Map<String, Value>;

/// A single key/value pair passed to an emission call.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    /// Field from anything convertible into a JSON value
    /// (strings, integers, floats, bools, maps, vectors).
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Field from any serializable value. Values that fail to serialize
    /// are recorded as their error text.
    pub fn any<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Self {
        let value = serde_json::to_value(value)
            .unwrap_or_else(|e| Value::String(format!("<unserializable: {e}>")));
        Self {
            key: key.into(),
            value,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for Field {
    fn from((key, value): (K, V)) -> Self {
        Field::new(key, value)
    }
}

/// Insert `fields` into `target`, later keys overwriting earlier ones.
pub(crate) fn merge_into<'a>(target: &mut Fields, fields: impl IntoIterator<Item = &'a Field>) {
    for field in fields {
        target.insert(field.key.clone(), field.value.clone());
    }
}

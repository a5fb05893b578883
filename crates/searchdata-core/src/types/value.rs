//! Runtime value types
//!
//! The `Value` enum represents the arguments handed to a repository method
//! and the parameters passed to search templates. It is JSON-shaped with an
//! extra timestamp variant so dates keep their type until they are rendered.

use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Runtime value type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Number value (f64 handles both int and float)
    Number(f64),
    /// String value
    String(String),
    /// Point in time
    Timestamp(DateTime<Utc>),
    /// Array of values
    Array(Vec<Value>),
    /// Object (key-value map)
    Object(HashMap<String, Value>),
}

impl Value {
    /// Short name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Timestamp(_) => "timestamp",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Read a field of an object value
    pub fn field(&self, name: &str) -> Result<&Value> {
        match self {
            Value::Object(map) => map
                .get(name)
                .ok_or_else(|| CoreError::FieldNotFound(name.to_string())),
            other => Err(CoreError::TypeError(format!(
                "cannot read field '{}' of a {}",
                name,
                other.type_name()
            ))),
        }
    }

    /// Read an element of an array value
    pub fn element(&self, index: usize) -> Result<&Value> {
        match self {
            Value::Array(items) => items.get(index).ok_or(CoreError::IndexOutOfBounds {
                index,
                len: items.len(),
            }),
            other => Err(CoreError::TypeError(format!(
                "cannot index into a {}",
                other.type_name()
            ))),
        }
    }

    /// Walk a dotted field path (`address.city`) starting at this value
    pub fn lookup_path<'a, I>(&self, path: I) -> Result<&Value>
    where
        I: IntoIterator<Item = &'a str>,
    {
        path.into_iter()
            .try_fold(self, |current, segment| current.field(segment))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Value::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Value {
        let mut city = HashMap::new();
        city.insert("name".to_string(), Value::from("Berlin"));
        let mut address = HashMap::new();
        address.insert("city".to_string(), Value::Object(city));
        address.insert("zip".to_string(), Value::from("10115"));
        Value::Object(address)
    }

    #[test]
    fn test_value_from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i64), Value::Number(42.0));
        assert_eq!(Value::from("hello"), Value::String("hello".to_string()));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(
            Value::from(vec![1, 2]),
            Value::Array(vec![Value::Number(1.0), Value::Number(2.0)])
        );
    }

    #[test]
    fn test_lookup_path() {
        let value = address();
        assert_eq!(
            value.lookup_path(["city", "name"]).unwrap(),
            &Value::from("Berlin")
        );
        assert_eq!(
            value.lookup_path(["street"]),
            Err(CoreError::FieldNotFound("street".to_string()))
        );
    }

    #[test]
    fn test_field_on_non_object_is_type_error() {
        let err = Value::from(3).field("x").unwrap_err();
        assert!(matches!(err, CoreError::TypeError(_)));
    }

    #[test]
    fn test_element_out_of_bounds() {
        let value = Value::from(vec!["a"]);
        assert_eq!(value.element(0).unwrap(), &Value::from("a"));
        assert_eq!(
            value.element(3),
            Err(CoreError::IndexOutOfBounds { index: 3, len: 1 })
        );
    }

    #[test]
    fn test_value_serde_json() {
        let val = address();
        let json = serde_json::to_string(&val).unwrap();
        assert!(json.contains("Berlin"));

        let deserialized: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(val, deserialized);
    }

    #[test]
    fn test_timestamp_serializes_as_string() {
        let ts = DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let json = serde_json::to_string(&Value::Timestamp(ts)).unwrap();
        assert_eq!(json, "\"2024-03-01T10:00:00Z\"");
    }
}

//! Runtime values seen by host scripts
//!
//! Values can be numbers, text, booleans, unit values, objects, lists,
//! null, or errors. Errors propagate through computations.

use gauge_core::{GaugeError, Number};
use gauge_units::UnitValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Runtime value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Number(Number),
    Text(String),
    Bool(bool),
    Unit(UnitValue),
    Object(HashMap<String, Value>),
    List(Vec<Value>),
    Null,
    Error(GaugeError),
}

impl Value {
    // ========== Safe Accessors (never panic) ==========

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_unit(&self) -> Option<&UnitValue> {
        match self {
            Value::Unit(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&GaugeError> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    // ========== Object Field Access ==========

    /// Get field from object. Returns Error value if not found or not an object.
    pub fn get(&self, key: &str) -> Value {
        match self {
            Value::Object(map) => {
                map.get(key).cloned().unwrap_or_else(|| {
                    Value::Error(GaugeError::undefined_field(key))
                })
            }
            Value::Error(e) => Value::Error(e.clone()),
            _ => Value::Error(GaugeError::type_error("Object", self.type_name())),
        }
    }

    /// Type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Text(_) => "Text",
            Value::Bool(_) => "Bool",
            Value::Unit(_) => "Unit",
            Value::Object(_) => "Object",
            Value::List(_) => "List",
            Value::Null => "Null",
            Value::Error(_) => "Error",
        }
    }

    /// Build an object value from string keys
    pub fn object<const N: usize>(entries: [(&str, Value); N]) -> Value {
        Value::Object(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Unit(u) => write!(f, "{}", u),
            Value::Object(obj) => {
                let mut keys: Vec<&String> = obj.keys().collect();
                keys.sort();
                let fields: Vec<String> = keys.iter()
                    .map(|k| format!("{}: {}", k, obj[*k]))
                    .collect();
                write!(f, "{{{}}}", fields.join(", "))
            }
            Value::List(items) => {
                let contents: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", contents.join(", "))
            }
            Value::Null => write!(f, "null"),
            Value::Error(e) => write!(f, "#ERROR: {}", e.code),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

// From implementations for convenience
impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::from_i64(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<UnitValue> for Value {
    fn from(u: UnitValue) -> Self {
        Value::Unit(u)
    }
}

impl From<GaugeError> for Value {
    fn from(e: GaugeError) -> Self {
        Value::Error(e)
    }
}

impl<T: Into<Value>> From<Result<T, gauge_units::UnitError>> for Value {
    fn from(result: Result<T, gauge_units::UnitError>) -> Self {
        match result {
            Ok(v) => v.into(),
            Err(e) => Value::Error(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        let unit = UnitValue::parse("#1m").unwrap();
        assert_eq!(Value::from(unit).type_name(), "Unit");
        assert_eq!(Value::from(3).type_name(), "Number");
        assert_eq!(Value::Null.type_name(), "Null");
    }

    #[test]
    fn test_display_unit_uses_format() {
        let v = Value::Unit(UnitValue::parse("#2.5lb").unwrap());
        assert_eq!(v.to_string(), "2+1/2lb");
    }

    #[test]
    fn test_object_get() {
        let obj = Value::object([("unit", Value::from("m"))]);
        assert_eq!(obj.get("unit"), Value::from("m"));
        assert!(obj.get("missing").is_error());
        assert!(Value::from(1).get("unit").is_error());
    }

    #[test]
    fn test_from_unit_result() {
        let ok: Value = UnitValue::parse("#1in").into();
        assert!(ok.as_unit().is_some());

        let err: Value = UnitValue::parse("#1/11in").into();
        assert_eq!(err.as_error().unwrap().code, gauge_core::codes::NON_EXACT_FRACTION);
    }

    #[test]
    fn test_serde_unit_variant() {
        let v = Value::Unit(UnitValue::parse("#3/8in").unwrap());
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Unit", "value": "#3/8in"}));
        let back: Value = serde_json::from_value(json).unwrap();
        assert_eq!(back, v);
    }
}

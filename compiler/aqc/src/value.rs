//! Values of the reference host.

use std::fmt;

/// A dynamically typed script value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum AqValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),
}

impl AqValue {
    /// Truthiness: non-zero numbers, `true`, and non-blank strings.
    pub fn is_truthy(&self) -> bool {
        match self {
            AqValue::Null => false,
            AqValue::Bool(b) => *b,
            AqValue::Int(n) => *n != 0,
            AqValue::Double(d) => *d != 0.0,
            AqValue::Str(s) => !s.trim().is_empty(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AqValue::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            AqValue::Null => "null",
            AqValue::Bool(_) => "bool",
            AqValue::Int(_) => "int",
            AqValue::Double(_) => "double",
            AqValue::Str(_) => "string",
        }
    }

    /// Display form used when concatenating; null is empty.
    pub fn text(&self) -> String {
        match self {
            AqValue::Null => String::new(),
            AqValue::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for AqValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AqValue::Null => f.write_str("null"),
            AqValue::Bool(b) => write!(f, "{b}"),
            AqValue::Int(n) => write!(f, "{n}"),
            AqValue::Double(d) => write!(f, "{d}"),
            AqValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for AqValue {
    fn from(value: bool) -> Self {
        AqValue::Bool(value)
    }
}

impl From<i64> for AqValue {
    fn from(value: i64) -> Self {
        AqValue::Int(value)
    }
}

impl From<f64> for AqValue {
    fn from(value: f64) -> Self {
        AqValue::Double(value)
    }
}

impl From<&str> for AqValue {
    fn from(value: &str) -> Self {
        AqValue::Str(value.to_string())
    }
}

impl From<String> for AqValue {
    fn from(value: String) -> Self {
        AqValue::Str(value)
    }
}

/// JSON scalars map directly; arrays and objects are kept as their JSON text.
impl From<serde_json::Value> for AqValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => AqValue::Null,
            serde_json::Value::Bool(b) => AqValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => AqValue::Int(i),
                None => AqValue::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => AqValue::Str(s),
            other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                AqValue::Str(other.to_string())
            }
        }
    }
}

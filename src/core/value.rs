// src/core/value.rs

//! The dynamically-typed value tree returned by remote endpoints.
//!
//! Values are heterogeneous: scalars, records with named fields, string-keyed
//! mappings, ordered sequences, and opaque platform objects that are only reachable
//! through the `MemberAccess` capability supplied by the provider that produced them.

use indexmap::IndexMap;
use serde_json::{Map as JsonMap, Number, Value as JsonValue};
use std::fmt;
use std::sync::Arc;

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// Named-member access over an object the gateway cannot inspect structurally.
///
/// Implemented by adapters that a `RemoteProvider` hands out inside `Value::Opaque`.
/// The resolver tries the getter-style accessor first (`getUsed` for the field `used`)
/// and falls back to a direct member read.
pub trait MemberAccess: fmt::Debug + Send + Sync {
    /// The name reported in resolution errors.
    fn type_name(&self) -> &str;

    /// Invokes a zero-argument accessor, e.g. `getUsed`. `None` if no such accessor exists.
    fn call_accessor(&self, accessor: &str) -> Option<Value>;

    /// Reads a directly exposed member. `None` if no such member exists.
    fn read_member(&self, member: &str) -> Option<Value>;

    /// The text written back to clients for this object.
    fn render(&self) -> String;
}

/// A node of a value tree.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Scalar(Scalar),
    /// A structured record with named fields (composite data).
    Record(IndexMap<String, Value>),
    /// A key/value mapping addressed with bracket selectors.
    Mapping(IndexMap<String, Value>),
    /// Keyed data whose shape the wire format does not record, such as a JSON object.
    /// Its entries answer both field access and bracket selectors.
    Object(IndexMap<String, Value>),
    Sequence(Vec<Value>),
    Opaque(Arc<dyn MemberAccess>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// A short name of the variant, used in resolution errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Scalar(_) => "scalar",
            Value::Record(_) => "record",
            Value::Mapping(_) => "mapping",
            Value::Object(_) => "object",
            Value::Sequence(_) => "sequence",
            Value::Opaque(_) => "opaque",
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Scalar(Scalar::Text(s.into()))
    }

    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn sequence<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Sequence(items.into_iter().collect())
    }

    /// Renders the value as the text written back to clients. Composite values are
    /// written as compact JSON.
    pub fn render(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Scalar(s) => s.to_string(),
            Value::Opaque(o) => o.render(),
            composite => composite.to_json().to_string(),
        }
    }

    /// Converts the tree to JSON. Opaque objects become their rendered string.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Scalar(Scalar::Bool(b)) => JsonValue::Bool(*b),
            Value::Scalar(Scalar::Int(i)) => JsonValue::Number((*i).into()),
            Value::Scalar(Scalar::Float(x)) => Number::from_f64(*x)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(x.to_string())),
            Value::Scalar(Scalar::Text(s)) => JsonValue::String(s.clone()),
            Value::Record(fields) | Value::Mapping(fields) | Value::Object(fields) => {
                JsonValue::Object(
                    fields
                        .iter()
                        .map(|(k, v)| (k.clone(), v.to_json()))
                        .collect::<JsonMap<_, _>>(),
                )
            }
            Value::Sequence(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Opaque(o) => JsonValue::String(o.render()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Mapping(a), Value::Mapping(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<JsonValue> for Value {
    /// JSON encodes composite data (memory usage) and maps (system properties) alike,
    /// so objects become `Value::Object` and stay reachable both ways.
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Scalar(Scalar::Int(i))
                } else if n.is_u64() {
                    Value::text(n.to_string())
                } else {
                    Value::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            JsonValue::String(s) => Value::text(s),
            JsonValue::Array(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Int(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(Scalar::Float(x))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::text(s)
    }
}

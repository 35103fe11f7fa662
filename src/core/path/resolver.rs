// src/core/path/resolver.rs

//! Walks a value tree along the segments of an attribute path.

use super::parser::PathSegment;
use crate::core::GatewayError;
use crate::core::value::Value;

/// Resolves `segments` against `root`, left to right.
///
/// A `Null` reached at any step ends the walk with `Null`. Bracket selectors dispatch on
/// the runtime type of the value they are applied to: a key lookup on mappings and
/// objects, an index on sequences.
pub fn resolve(root: &Value, segments: &[PathSegment]) -> Result<Value, GatewayError> {
    let mut current = root.clone();
    for segment in segments {
        if current.is_null() {
            return Ok(Value::Null);
        }
        current = match segment {
            PathSegment::Selector(key) => select(&current, key)?,
            PathSegment::Field(name) => field(&current, name)?,
        };
    }
    Ok(current)
}

fn select(value: &Value, key: &str) -> Result<Value, GatewayError> {
    match value {
        Value::Mapping(entries) | Value::Object(entries) => {
            Ok(entries.get(key).cloned().unwrap_or(Value::Null))
        }
        Value::Sequence(items) => {
            let index: usize = key
                .parse()
                .map_err(|_| GatewayError::InvalidIndex(key.to_string()))?;
            items
                .get(index)
                .cloned()
                .ok_or(GatewayError::IndexOutOfRange {
                    index,
                    len: items.len(),
                })
        }
        other => Err(GatewayError::InvalidSelector {
            segment: PathSegment::Selector(key.to_string()).to_string(),
            kind: other.kind(),
        }),
    }
}

fn field(value: &Value, name: &str) -> Result<Value, GatewayError> {
    match value {
        Value::Record(fields) | Value::Object(fields) => {
            fields
                .get(name)
                .cloned()
                .ok_or_else(|| GatewayError::NoSuchMember {
                    member: name.to_string(),
                    type_name: value.kind().to_string(),
                })
        }
        Value::Opaque(object) => object
            .call_accessor(&getter_name(name))
            .or_else(|| object.read_member(name))
            .ok_or_else(|| GatewayError::NoSuchMember {
                member: name.to_string(),
                type_name: object.type_name().to_string(),
            }),
        // Scalars have no members to read.
        Value::Scalar(_) => Err(GatewayError::NoSuchMember {
            member: name.to_string(),
            type_name: value.kind().to_string(),
        }),
        other => Err(GatewayError::InvalidSelector {
            segment: name.to_string(),
            kind: other.kind(),
        }),
    }
}

/// The getter-style accessor name for a field: `used` -> `getUsed`.
pub fn getter_name(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => format!("get{}{}", first.to_uppercase(), chars.as_str()),
        None => "get".to_string(),
    }
}

// src/core/path/parser.rs

//! Parses attribute paths into an ordered list of `PathSegment`s.
//!
//! Grammar:
//! - tokens are separated by `.`;
//! - a token starting with `[` is a selector and extends to the next unescaped `]`;
//!   it may be followed directly by another `[`, by a `.`, or by the end of the path;
//! - any other token is a field and extends to the next unescaped `.` or `[`;
//! - `\` makes the following character literal, in selectors and in fields;
//! - an unterminated selector takes the rest of the path verbatim as its key.

use crate::core::GatewayError;
use std::fmt;
use std::iter::Peekable;
use std::str::{CharIndices, FromStr};

/// One step of an attribute path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A dotted identifier, resolved as an accessor or member.
    Field(String),
    /// A bracketed token, used as a mapping key or a sequence index.
    Selector(String),
}

/// A parsed attribute path. The first segment is always a field: the name of the
/// attribute read from the bean. The remaining segments are walked by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpression {
    segments: Vec<PathSegment>,
}

impl PathExpression {
    pub fn parse(path: &str) -> Result<Self, GatewayError> {
        path.parse()
    }

    /// Builds a path from segments, checking that it starts with a non-empty field.
    pub fn from_segments(segments: Vec<PathSegment>) -> Result<Self, GatewayError> {
        match segments.first() {
            Some(PathSegment::Field(name)) if !name.is_empty() => Ok(Self { segments }),
            _ => Err(GatewayError::InvalidPath(
                segments
                    .iter()
                    .map(|s| format!("{s:?}"))
                    .collect::<Vec<_>>()
                    .join(","),
            )),
        }
    }

    /// The attribute name requested from the endpoint.
    pub fn attribute(&self) -> &str {
        match self.segments.first() {
            Some(PathSegment::Field(name)) => name,
            // Construction guarantees a leading field.
            _ => "",
        }
    }

    /// The segments applied to the attribute value.
    pub fn rest(&self) -> &[PathSegment] {
        &self.segments[1..]
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl FromStr for PathExpression {
    type Err = GatewayError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let invalid = || GatewayError::InvalidPath(path.to_string());
        let mut segments = Vec::new();
        let mut chars = path.char_indices().peekable();

        while let Some(&(start, c)) = chars.peek() {
            if c == '[' {
                chars.next();
                segments.push(PathSegment::Selector(scan_selector(
                    path,
                    start + 1,
                    &mut chars,
                )));
                if let Some(&(_, '.')) = chars.peek() {
                    chars.next();
                }
            } else {
                let name = scan_field(&mut chars);
                if name.is_empty() {
                    return Err(invalid());
                }
                segments.push(PathSegment::Field(name));
            }
        }

        match segments.first() {
            Some(PathSegment::Field(_)) => Ok(Self { segments }),
            _ => Err(invalid()),
        }
    }
}

fn scan_selector(path: &str, body_start: usize, chars: &mut Peekable<CharIndices<'_>>) -> String {
    let mut key = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            ']' => return key,
            '\\' => {
                if let Some((_, escaped)) = chars.next() {
                    key.push(escaped);
                }
            }
            other => key.push(other),
        }
    }
    // Unterminated selector.
    path[body_start..].to_string()
}

fn scan_field(chars: &mut Peekable<CharIndices<'_>>) -> String {
    let mut name = String::new();
    while let Some(&(_, c)) = chars.peek() {
        match c {
            '.' => {
                chars.next();
                break;
            }
            '[' => break,
            '\\' => {
                chars.next();
                if let Some((_, escaped)) = chars.next() {
                    name.push(escaped);
                }
            }
            other => {
                chars.next();
                name.push(other);
            }
        }
    }
    name
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str, special: &[char]) -> fmt::Result {
    for c in text.chars() {
        if c == '\\' || special.contains(&c) {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    Ok(())
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write_escaped(f, name, &['.', '[']),
            PathSegment::Selector(key) => {
                f.write_str("[")?;
                write_escaped(f, key, &[']'])?;
                f.write_str("]")
            }
        }
    }
}

/// Serializes the path back to its textual form; parsing the output yields the same
/// segments.
impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && matches!(segment, PathSegment::Field(_)) {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

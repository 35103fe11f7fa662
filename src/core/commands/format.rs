// src/core/commands/format.rs

//! The output template of a `GET` request.
//!
//! `%s` stands for the rendered value and `%d` for the value as an integer; `%%` is a
//! literal percent sign. A template without placeholders leaves values untouched.

use super::helpers::strip_quotes;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Text,
    Integer,
}

/// A parsed output template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueFormat {
    raw: String,
    pieces: Vec<Piece>,
}

impl ValueFormat {
    /// Parses the format token of a request. One pair of surrounding quotes is dropped.
    pub fn parse(token: &str) -> Self {
        let template = strip_quotes(token);
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            match chars.peek() {
                Some(&(conversion @ ('s' | 'd'))) => {
                    chars.next();
                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    pieces.push(if conversion == 'd' {
                        Piece::Integer
                    } else {
                        Piece::Text
                    });
                }
                Some('%') => {
                    chars.next();
                    literal.push('%');
                }
                _ => literal.push('%'),
            }
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Self {
            raw: template.to_string(),
            pieces,
        }
    }

    pub fn has_placeholders(&self) -> bool {
        self.pieces
            .iter()
            .any(|piece| !matches!(piece, Piece::Literal(_)))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Applies the template to one rendered value. Returns `None` when a `%d`
    /// placeholder meets a value that is not an integer.
    pub fn apply(&self, value: &str) -> Option<String> {
        if !self.has_placeholders() {
            return Some(value.to_string());
        }
        let mut out = String::with_capacity(self.raw.len() + value.len());
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Text => out.push_str(value),
                Piece::Integer => {
                    let n: i64 = value.parse().ok()?;
                    out.push_str(&n.to_string());
                }
            }
        }
        Some(out)
    }
}

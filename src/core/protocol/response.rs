// src/core/protocol/response.rs

//! The response side of the line protocol: a status line, an optional error code and
//! detail, and the payload lines of a successful `GET`.

use crate::core::GatewayError;
use strum_macros::Display;

/// The sentinel emitted for an attribute that could not be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

const RESP_OK: &str = "OK";
const RESP_ERR: &str = "ERR";

/// Machine-readable error codes sent on the second line of an `ERR` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NoCmd,
    UnknownCmd,
    InvalidArgumentLength,
    ConnectionFailed,
    IoError,
}

/// A complete reply to one request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `OK` followed by one line per value (empty for `CLOSE`).
    Ok(Vec<String>),
    /// `ERR`, the error code, and a single-line detail message.
    Err { code: ErrorCode, detail: String },
}

impl Response {
    pub fn ok() -> Self {
        Response::Ok(Vec::new())
    }

    pub fn error(code: ErrorCode, detail: impl Into<String>) -> Self {
        Response::Err {
            code,
            detail: detail.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok(_))
    }

    /// Returns the response as the lines written on the wire, without terminators.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Response::Ok(values) => {
                let mut lines = Vec::with_capacity(values.len() + 1);
                lines.push(RESP_OK.to_string());
                lines.extend(values.iter().map(|v| single_line(v)));
                lines
            }
            Response::Err { code, detail } => vec![
                RESP_ERR.to_string(),
                code.to_string(),
                single_line(detail),
            ],
        }
    }
}

impl From<GatewayError> for Response {
    fn from(e: GatewayError) -> Self {
        Response::error(e.code(), e.detail())
    }
}

/// Flattens text so that it can never break the line framing of a response.
pub fn single_line(text: &str) -> String {
    if text.contains(['\n', '\r', '\t']) {
        text.replace(['\n', '\r', '\t'], " ")
    } else {
        text.to_string()
    }
}

// src/core/errors.rs

//! Defines the primary error type for the entire application.

use crate::core::protocol::ErrorCode;
use crate::core::provider::ProviderError;
use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the gateway.
///
/// Variants fall into the four families the protocol distinguishes: protocol errors,
/// connection errors, attribute-level errors (reported as `N/A`, never as `ERR`), and
/// channel-level I/O errors.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    /// I/O failure on the client-facing socket.
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Request line exceeds the maximum length of {0} bytes")]
    LineTooLong(usize),

    // --- Protocol errors ---
    #[error("No command was given")]
    NoCommand,

    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("{0}")]
    WrongArgumentCount(String),

    // --- Endpoint errors ---
    #[error("{0}")]
    ConnectionFailed(String),

    /// A channel-level failure while talking to a connected endpoint.
    #[error("{0}")]
    RemoteIo(String),

    #[error("Connection holder for '{0}' has been closed")]
    HolderClosed(String),

    // --- Attribute-level errors ---
    #[error("{0}")]
    Attribute(String),

    #[error("Invalid attribute path '{0}'")]
    InvalidPath(String),

    #[error("Incorrect array index '{0}'")]
    InvalidIndex(String),

    #[error("Index {index} is out of range for a sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Path segment '{segment}' cannot be applied to a {kind} value")]
    InvalidSelector { segment: String, kind: &'static str },

    #[error("No accessor or member '{member}' on {type_name}")]
    NoSuchMember { member: String, type_name: String },

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// The protocol error code reported on the second line of an `ERR` response.
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::NoCommand => ErrorCode::NoCmd,
            GatewayError::UnknownCommand(_) => ErrorCode::UnknownCmd,
            GatewayError::WrongArgumentCount(_) => ErrorCode::InvalidArgumentLength,
            GatewayError::ConnectionFailed(_) | GatewayError::HolderClosed(_) => {
                ErrorCode::ConnectionFailed
            }
            _ => ErrorCode::IoError,
        }
    }

    /// The free-text detail reported on the third line of an `ERR` response.
    pub fn detail(&self) -> String {
        match self {
            GatewayError::UnknownCommand(token) => token.clone(),
            other => other.to_string(),
        }
    }

    /// True for failures that only affect a single requested attribute. These are
    /// reported as the `N/A` sentinel and never abort a batch.
    pub fn is_item_level(&self) -> bool {
        matches!(
            self,
            GatewayError::Attribute(_)
                | GatewayError::InvalidPath(_)
                | GatewayError::InvalidIndex(_)
                | GatewayError::IndexOutOfRange { .. }
                | GatewayError::InvalidSelector { .. }
                | GatewayError::NoSuchMember { .. }
        )
    }
}

impl PartialEq for GatewayError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (GatewayError::Io(e1), GatewayError::Io(e2)) => e1.to_string() == e2.to_string(),
            (GatewayError::LineTooLong(a), GatewayError::LineTooLong(b)) => a == b,
            (GatewayError::UnknownCommand(s1), GatewayError::UnknownCommand(s2)) => s1 == s2,
            (GatewayError::WrongArgumentCount(s1), GatewayError::WrongArgumentCount(s2)) => {
                s1 == s2
            }
            (GatewayError::ConnectionFailed(s1), GatewayError::ConnectionFailed(s2)) => s1 == s2,
            (GatewayError::RemoteIo(s1), GatewayError::RemoteIo(s2)) => s1 == s2,
            (GatewayError::HolderClosed(s1), GatewayError::HolderClosed(s2)) => s1 == s2,
            (GatewayError::Attribute(s1), GatewayError::Attribute(s2)) => s1 == s2,
            (GatewayError::InvalidPath(s1), GatewayError::InvalidPath(s2)) => s1 == s2,
            (GatewayError::InvalidIndex(s1), GatewayError::InvalidIndex(s2)) => s1 == s2,
            (
                GatewayError::IndexOutOfRange { index: i1, len: l1 },
                GatewayError::IndexOutOfRange { index: i2, len: l2 },
            ) => i1 == i2 && l1 == l2,
            (
                GatewayError::InvalidSelector {
                    segment: s1,
                    kind: k1,
                },
                GatewayError::InvalidSelector {
                    segment: s2,
                    kind: k2,
                },
            ) => s1 == s2 && k1 == k2,
            (
                GatewayError::NoSuchMember {
                    member: m1,
                    type_name: t1,
                },
                GatewayError::NoSuchMember {
                    member: m2,
                    type_name: t2,
                },
            ) => m1 == m2 && t1 == t2,
            (GatewayError::Internal(s1), GatewayError::Internal(s2)) => s1 == s2,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for GatewayError {
    fn from(e: std::io::Error) -> Self {
        GatewayError::Io(Arc::new(e))
    }
}

impl From<ProviderError> for GatewayError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Connect(msg) => GatewayError::ConnectionFailed(msg),
            ProviderError::Attribute(msg) => GatewayError::Attribute(msg),
            ProviderError::Io(msg) => GatewayError::RemoteIo(msg),
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Internal(format!("JSON serialization error: {e}"))
    }
}

// src/core/commands/mod.rs

//! This module defines the supported commands and the central `Command` enum that
//! encapsulates their parsed state.

use crate::core::GatewayError;
use command_trait::{CommandSpec, ParseCommand};
use std::str::FromStr;

pub mod close;
pub mod command_trait;
pub mod format;
pub mod get;
pub mod helpers;

pub use close::Close;
pub use format::ValueFormat;
pub use get::{AttributeQuery, Get};

/// A parsed request line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Get(Get),
    Close(Close),
}

impl Command {
    /// Parses a raw request line. Command names are case-sensitive.
    pub fn parse(line: &str) -> Result<Self, GatewayError> {
        let tokens = helpers::tokenize(line);
        let Some((name, args)) = tokens.split_first() else {
            return Err(GatewayError::NoCommand);
        };
        match *name {
            "GET" => Ok(Command::Get(Get::parse(args)?)),
            "CLOSE" => Ok(Command::Close(Close::parse(args)?)),
            other => Err(GatewayError::UnknownCommand(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Get(cmd) => cmd.name(),
            Command::Close(cmd) => cmd.name(),
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            Command::Get(cmd) => cmd.endpoint(),
            Command::Close(cmd) => cmd.endpoint(),
        }
    }
}

impl FromStr for Command {
    type Err = GatewayError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        Command::parse(line)
    }
}

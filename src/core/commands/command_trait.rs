// src/core/commands/command_trait.rs

//! Defines the core traits shared by all commands.

use crate::core::GatewayError;

/// Parses a command from the tokens that follow its name on the request line.
pub trait ParseCommand: Sized {
    fn parse(args: &[&str]) -> Result<Self, GatewayError>;
}

/// Static metadata about a command.
pub trait CommandSpec {
    /// The command name as written by clients.
    fn name(&self) -> &'static str;

    /// The endpoint URL the command targets.
    fn endpoint(&self) -> &str;
}

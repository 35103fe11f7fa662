// src/core/commands/close.rs

use super::command_trait::{CommandSpec, ParseCommand};
use super::helpers::validate_arg_count;
use crate::core::GatewayError;

/// `CLOSE <endpointURL>`: drops the cached connection to an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Close {
    pub endpoint: String,
}

impl ParseCommand for Close {
    fn parse(args: &[&str]) -> Result<Self, GatewayError> {
        validate_arg_count(args, 1)?;
        Ok(Close {
            endpoint: args[0].to_string(),
        })
    }
}

impl CommandSpec for Close {
    fn name(&self) -> &'static str {
        "CLOSE"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

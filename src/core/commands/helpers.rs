// src/core/commands/helpers.rs

//! Provides helper functions for splitting and validating request lines.

use crate::core::GatewayError;

/// Splits a request line into whitespace-separated tokens.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Validates that a command received exactly `expected` arguments (the command
/// name itself not included).
pub fn validate_arg_count(args: &[&str], expected: usize) -> Result<(), GatewayError> {
    if args.len() != expected {
        Err(GatewayError::WrongArgumentCount(format!(
            "Expecting {} argument{} but there was {}",
            expected,
            if expected == 1 { "" } else { "s" },
            args.len()
        )))
    } else {
        Ok(())
    }
}

/// Removes one pair of matching surrounding quotes, if present.
pub fn strip_quotes(token: &str) -> &str {
    for quote in ['\'', '"'] {
        if token.len() >= 2
            && let Some(inner) = token
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    token
}

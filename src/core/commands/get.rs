// src/core/commands/get.rs

use super::command_trait::{CommandSpec, ParseCommand};
use super::format::ValueFormat;
use crate::core::GatewayError;
use crate::core::path::PathExpression;

/// One `<beanName> <attributePath>` pair of a `GET` request.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeQuery {
    pub bean: String,
    pub raw_path: String,
    /// The parsed path. A path that fails to parse only fails its own item.
    pub path: Result<PathExpression, GatewayError>,
}

impl AttributeQuery {
    pub fn new(bean: &str, raw_path: &str) -> Self {
        Self {
            bean: bean.to_string(),
            raw_path: raw_path.to_string(),
            path: PathExpression::parse(raw_path),
        }
    }
}

/// `GET <endpointURL> <formatString> (<beanName> <attributePath>)+`
#[derive(Debug, Clone, PartialEq)]
pub struct Get {
    pub endpoint: String,
    pub format: ValueFormat,
    pub queries: Vec<AttributeQuery>,
}

impl ParseCommand for Get {
    fn parse(args: &[&str]) -> Result<Self, GatewayError> {
        // Endpoint and format, then one or more bean/path pairs.
        if args.len() < 4 || args.len() % 2 != 0 {
            return Err(GatewayError::WrongArgumentCount(format!(
                "Expecting an even number of arguments and at least 4 but there was {}",
                args.len()
            )));
        }
        let queries = args[2..]
            .chunks_exact(2)
            .map(|pair| AttributeQuery::new(pair[0], pair[1]))
            .collect();
        Ok(Get {
            endpoint: args[0].to_string(),
            format: ValueFormat::parse(args[1]),
            queries,
        })
    }
}

impl CommandSpec for Get {
    fn name(&self) -> &'static str {
        "GET"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// src/main.rs

//! The main entry point for the beangate server application.

use anyhow::{Context, Result, anyhow};
use beangate::config::Config;
use beangate::server;
use std::env;
use std::path::Path;
use tracing::error;
use tracing_subscriber::filter::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_CONFIG_PATH: &str = "beangate.toml";

const USAGE: &str = "\
Usage: beangate [--config <path>] [--listen <host>] [--port <port>] [--workers <n>]
       beangate --version | --help

Options:
  --config <path>   TOML configuration file (default: beangate.toml, used if present)
  --listen <host>   Address to listen on (overrides `host`)
  --port <port>     Port to listen on (overrides `port`)
  --workers <n>     Maximum number of requests executing at once (overrides `workers`)
  --version         Print the version and exit
  --help            Print this help and exit

Protocol (one request per line, words separated by whitespace):
  GET <endpointURL> <formatString> <beanName> <attributePath> [<beanName> <attributePath>]...
      Reads each attribute from the endpoint. Replies `OK` followed by one line per
      attribute, in request order. An attribute that cannot be read yields `N/A`.
      Attribute paths descend into values: `HeapMemoryUsage.used`, `Map[key]`, `List[0]`.
      The format string is applied to each value, e.g. 'used:%d'; `%%` is a literal `%`.
  CLOSE <endpointURL>
      Closes the cached connection to the endpoint. Replies `OK`.

Errors are reported as three lines: `ERR`, an error code, and a message.
Error codes: NO_CMD, UNKNOWN_CMD, INVALID_ARGUMENT_LENGTH, CONNECTION_FAILED, IO_ERROR.
";

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|arg| arg == "--version") {
        println!("beangate version {VERSION}");
        return Ok(());
    }
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print!("{USAGE}");
        return Ok(());
    }

    let config = match load_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e:#}");
            eprintln!("Run with --help for usage.");
            std::process::exit(1);
        }
    };

    // RUST_LOG takes precedence over the configured level.
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .compact()
        .with_ansi(true)
        .init();

    if let Err(e) = server::run(config).await {
        error!("Server runtime error: {:#}", e);
        return Err(e);
    }
    Ok(())
}

/// Builds the configuration from the optional config file and command-line overrides.
fn load_config(args: &[String]) -> Result<Config> {
    let mut config = match flag_value(args, "--config")? {
        Some(path) => Config::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::from_file(DEFAULT_CONFIG_PATH)?,
        None => Config::default(),
    };

    if let Some(host) = flag_value(args, "--listen")? {
        config.host = host.to_string();
    }
    if let Some(port) = flag_value(args, "--port")? {
        config.port = port
            .parse()
            .with_context(|| format!("Invalid port number: {port}"))?;
    }
    if let Some(workers) = flag_value(args, "--workers")? {
        config.workers = workers
            .parse()
            .with_context(|| format!("Invalid worker count: {workers}"))?;
    }

    config.validate()?;
    Ok(config)
}

/// Returns the value following `flag`, if the flag is present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    match args.iter().position(|arg| arg == flag) {
        Some(i) => args
            .get(i + 1)
            .map(|value| Some(value.as_str()))
            .ok_or_else(|| anyhow!("{flag} flag requires a value")),
        None => Ok(None),
    }
}

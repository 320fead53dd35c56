//! Tracing setup for the evently CLI
//!
//! Usage:
//!   evently --debug ...              # Debug logging
//!   RUST_LOG=evently_store=debug ... # Fine-grained log control
//!
//! Logs go to stderr so command output on stdout stays valid JSON.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Use `debug` when RUST_LOG is not set
    pub debug: bool,
}

pub fn init(config: &TracingConfig) -> Result<()> {
    let default_level = if config.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

// src/logging.rs
// =============================================================================
// Diagnostic logging with `tracing`.
//
// - Everything goes to stderr, so stdout only ever holds the status lines
//   (or the JSON array) and can be piped safely
// - The level comes from --log-level, but RUST_LOG wins when it is set,
//   e.g. RUST_LOG=sitechecker=debug shows every attempt
// - Setting up twice is harmless (the second call is ignored)
// =============================================================================

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default filter directive when RUST_LOG is not set
    pub level: String,
    /// Colors on stderr
    pub ansi: bool,
}

// Builds the filter: RUST_LOG if present, otherwise the configured level
fn build_filter(config: &LogConfig) -> Result<EnvFilter> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {} value", EnvFilter::DEFAULT_ENV)),
        _ => level_filter(&config.level),
    }
}

// Filter for a --log-level value alone, ignoring RUST_LOG
fn level_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level).with_context(|| format!("invalid log level '{}'", level))
}

pub fn setup_logging(config: &LogConfig) -> Result<()> {
    let filter = build_filter(config)?;

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .with_target(false)
        .try_init();

    // Err here only means a subscriber is already installed
    if result.is_ok() {
        tracing::debug!(?config, "logging initialised");
    }

    Ok(())
}

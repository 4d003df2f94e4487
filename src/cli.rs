// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Usage examples:
//   sitechecker -u https://www.rust-lang.org crates.io
//   sitechecker -f urls.txt -a
//   sitechecker -u example.com --timeout 0.5 --json
//
// Every flag can also come from an environment variable (SITECHECKER_*),
// which is handy in CI where editing the command line is awkward.
// SITECHECKER_URLS is whitespace-separated; commas are legal inside URLs.
//
// If the program is started with no arguments at all from a terminal, it
// asks for them interactively instead of failing straight away.
// =============================================================================

use crate::checker::{CheckMode, DEFAULT_TIMEOUT_SECS};
use crate::report::OutputFormat;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

// Shown when we fall back to asking for arguments
const PROMPT: &str = "Enter Argument(-u, -f, -a), site: ";

// Used when -u is not given
const URLS_ENV: &str = "SITECHECKER_URLS";

// This struct represents our entire CLI application
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sitechecker",
    version,
    about = "Check the availability of websites",
    long_about = "sitechecker sends a HEAD request to each website over http and then https, \
                  and reports whether it is Online or Offline. Use -a to check all websites \
                  at the same time."
)]
pub struct Cli {
    /// Enter one or more website URLs
    ///
    /// Example: -u https://www.rust-lang.org crates.io
    ///
    /// Falls back to SITECHECKER_URLS (separated by whitespace)
    #[arg(short = 'u', long = "urls", value_name = "URLs", num_args = 1..)]
    pub urls: Vec<String>,

    /// Read URLs from a file (one per line)
    #[arg(
        short = 'f',
        long = "input-file",
        visible_alias = "input_file",
        value_name = "FILE",
        env = "SITECHECKER_INPUT_FILE"
    )]
    pub input_file: Option<PathBuf>,

    /// Run the connectivity check asynchronously (all sites at once)
    #[arg(short = 'a', long, env = "SITECHECKER_ASYNC")]
    pub asynchronous: bool,

    /// Timeout for each connection attempt, in seconds (fractions allowed)
    #[arg(
        short = 't',
        long,
        value_name = "SECONDS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = parse_timeout_secs,
        env = "SITECHECKER_TIMEOUT"
    )]
    pub timeout: f64,

    /// Output results in JSON format instead of status lines
    #[arg(long)]
    pub json: bool,

    /// Log level for diagnostics on stderr (error, warn, info, debug, trace)
    ///
    /// RUST_LOG takes priority when it is set
    #[arg(long, value_name = "LEVEL", default_value = "warn", env = "SITECHECKER_LOG")]
    pub log_level: String,
}

// Settings for one run, resolved from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub mode: CheckMode,
    pub timeout: Duration,
    pub format: OutputFormat,
}

impl Cli {
    // Parses the real command line, or prompts for one if it is empty
    pub fn parse_or_prompt() -> Result<Self> {
        let has_args = std::env::args_os().len() > 1;
        let has_env_urls = std::env::var_os(URLS_ENV).is_some();

        if has_args || has_env_urls || !std::io::stdin().is_terminal() {
            return Ok(Cli::parse());
        }

        let line = prompt_for_arguments()?;
        Ok(Cli::parse_from(prompt_args(&line)))
    }

    // URLs from -u, or from SITECHECKER_URLS when -u is absent
    pub fn target_urls(&self) -> Vec<String> {
        urls_or_env(&self.urls, std::env::var(URLS_ENV).ok())
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            mode: CheckMode::from_async_flag(self.asynchronous),
            timeout: Duration::from_secs_f64(self.timeout),
            format: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
        }
    }
}

fn prompt_for_arguments() -> Result<String> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", PROMPT)?;
    stdout.flush()?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read arguments from stdin")?;
    Ok(line)
}

fn urls_or_env(urls: &[String], env_value: Option<String>) -> Vec<String> {
    if !urls.is_empty() {
        return urls.to_vec();
    }

    env_value
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

// Splits a typed line into argv, with the program name in front
fn prompt_args(line: &str) -> Vec<String> {
    std::iter::once("sitechecker")
        .chain(line.split_whitespace())
        .map(str::to_string)
        .collect()
}

// Accepts any finite number of seconds greater than zero
fn parse_timeout_secs(value: &str) -> Result<f64, String> {
    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", value))?;

    if secs.is_nan() || secs <= 0.0 || Duration::try_from_secs_f64(secs).is_err() {
        return Err(format!("timeout must be a positive number of seconds, got {}", value));
    }

    Ok(secs)
}

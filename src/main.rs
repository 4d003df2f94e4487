// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap (or prompt for them)
// 2. Set up logging on stderr
// 3. Build the list of websites from -u and -f
// 4. Probe every website, sequentially or concurrently
// 5. Print one status entry per website
// 6. Exit with proper code (0 = checks ran, 1 = no URLs, 2 = other error)
//
// An offline website is NOT an error for the program: it is just a result.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker; // src/checker/ - host extraction, probing, batch running
mod cli; // src/cli.rs - command-line parsing
mod error; // src/error.rs - error types
mod logging; // src/logging.rs - tracing setup
mod report; // src/report.rs - status lines and JSON
mod targets; // src/targets/ - URLs from arguments and files

use anyhow::Result;
use checker::{BatchRunner, HttpTransport};
use cli::{Cli, RunConfig};
use error::CheckerError;
use logging::LogConfig;
use report::OutputFormat;
use std::io::{IsTerminal, Write};
use std::sync::Arc;

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for(&e)
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
async fn run() -> Result<()> {
    let cli = Cli::parse_or_prompt()?;

    logging::setup_logging(&LogConfig {
        level: cli.log_level.clone(),
        ansi: std::io::stderr().is_terminal(),
    })?;

    let config = cli.run_config();
    tracing::debug!(?config, "resolved run configuration");

    // Fails with EmptyTargetList before any network activity
    let targets = targets::collect_targets(cli.target_urls(), cli.input_file.as_deref()).await?;

    let transport = HttpTransport::new()?;
    let runner = BatchRunner::new(Arc::new(transport), config.timeout);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    check_sites(&runner, targets, &config, &mut out).await
}

// Runs the batch and writes the results to `out`
//
// Text output is written as each website finishes; JSON output is written
// once at the end.
async fn check_sites<W: Write>(
    runner: &BatchRunner,
    targets: Vec<String>,
    config: &RunConfig,
    out: &mut W,
) -> Result<()> {
    match config.format {
        OutputFormat::Text => {
            let mut write_error = None;
            runner
                .run(targets, config.mode, |outcome| {
                    if write_error.is_none() {
                        write_error = report::write_outcome(&mut *out, outcome).err();
                    }
                })
                .await;

            match write_error {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
        OutputFormat::Json => {
            let outcomes = runner.run(targets, config.mode, |_| {}).await;
            report::write_json(out, &outcomes)
        }
    }
}

// Our own fatal errors know their exit code; anything else is an internal error
fn exit_code_for(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<CheckerError>()
        .map(CheckerError::exit_code)
        .unwrap_or(2)
}

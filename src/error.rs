// src/error.rs
// =============================================================================
// Error types for the site checker.
//
// There are two families of errors:
// - ProbeError: something went wrong while trying to reach ONE website.
//   These never stop the program. They become the "Error: ..." line that is
//   printed under an offline site.
// - CheckerError: something went wrong with the WHOLE run (no URLs at all,
//   or the HTTP client could not be built). These end the program with a
//   non-zero exit code.
//
// Rust concepts:
// - thiserror: Derives std::error::Error and Display from attributes
// - Enums with fields: Each variant can carry its own data
// =============================================================================

use thiserror::Error;

// Why a single attempt (one scheme for one host) failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The attempt did not finish before the timeout
    #[error("timed out")]
    Timeout,

    /// Connection refused, reset or otherwise unreachable
    #[error("connection to {url} failed: {detail}")]
    Connection { url: String, detail: String },

    /// The host name could not be resolved
    #[error("could not resolve host '{host}': {detail}")]
    Resolution { host: String, detail: String },

    /// We could not even build a URL to try (e.g. empty host)
    #[error("invalid URL '{url}': {detail}")]
    InvalidUrl { url: String, detail: String },

    /// Any other transport or protocol error
    #[error("request to {url} failed: {detail}")]
    Request { url: String, detail: String },
}

// Errors that end the whole run
#[derive(Debug, Error)]
pub enum CheckerError {
    /// Neither -u nor -f produced a single URL
    #[error("no URLs to check")]
    EmptyTargetList,

    /// The HTTP stack is not usable in this environment
    #[error("could not initialise the HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl CheckerError {
    // Process exit code for this error
    //   1 = nothing to check
    //   2 = environment / internal failure
    pub fn exit_code(&self) -> i32 {
        match self {
            CheckerError::EmptyTargetList => 1,
            CheckerError::Client(_) => 2,
        }
    }
}

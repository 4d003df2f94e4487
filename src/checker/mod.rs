// src/checker/mod.rs
// =============================================================================
// This module contains all availability checking logic.
//
// Submodules:
// - host: Extracts the host from a user-supplied URL
// - probe: Decides whether a single website is reachable
// - batch: Runs probes for a whole list, sequentially or concurrently
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod batch;
mod host;
mod probe;

// Only compiled for `cargo test`
#[cfg(test)]
pub(crate) mod fake;

// Re-export public items from submodules
// This lets users write `checker::BatchRunner` instead of
// `checker::batch::BatchRunner`
pub use batch::{BatchRunner, CheckMode};
pub use probe::{HttpTransport, ProbeOutcome, DEFAULT_TIMEOUT_SECS};

// src/targets/mod.rs
// =============================================================================
// This module builds the list of websites to check.
//
// URLs can come from two places:
// - Directly on the command line (-u / --urls)
// - A text file with one URL per line (-f / --input-file)
//
// Both sources are merged, command-line URLs first. If the final list is
// empty the whole run stops with "no URLs to check".
// =============================================================================

mod file;

use file::read_urls_from_file;

use crate::error::CheckerError;
use std::path::Path;
use tracing::debug;

// Merges command-line URLs with the URLs from an optional file
//
// Returns: the targets in order, or EmptyTargetList if there are none
pub async fn collect_targets(
    urls: Vec<String>,
    input_file: Option<&Path>,
) -> Result<Vec<String>, CheckerError> {
    let mut targets = clean(urls);

    if let Some(path) = input_file {
        let from_file = read_urls_from_file(path).await;
        debug!(path = %path.display(), count = from_file.len(), "read URLs from file");
        targets.extend(from_file);
    }

    if targets.is_empty() {
        return Err(CheckerError::EmptyTargetList);
    }

    Ok(targets)
}

// Trims each entry and drops the blank ones
pub(crate) fn clean<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

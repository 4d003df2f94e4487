// src/targets/file.rs
// =============================================================================
// Reads a list of URLs from a text file.
//
// Format:
//   https://www.rust-lang.org
//   crates.io
//
//   docs.rs          <- surrounding whitespace is stripped
//
// Blank lines are skipped. A missing or empty file is not fatal on its own:
// we log a warning and contribute no URLs. The caller decides whether the
// overall list is empty.
// =============================================================================

use super::clean;
use std::io::ErrorKind;
use std::path::Path;
use tracing::warn;

pub async fn read_urls_from_file(path: &Path) -> Vec<String> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "input file not found");
            return Vec::new();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read input file");
            return Vec::new();
        }
    };

    let urls = clean(content.lines());
    if urls.is_empty() {
        warn!(path = %path.display(), "empty input file");
    }

    urls
}

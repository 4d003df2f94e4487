// src/report.rs
// =============================================================================
// Turns probe outcomes into what the user sees.
//
// Text output (one entry per website):
//   The status of "https://www.rust-lang.org" is: Online!
//   The status of "http://down.example" is: "Offline?"
//    Error: "connection to https://down.example/ failed: Connection refused"
//
// JSON output (--json): a pretty-printed array of all outcomes, printed
// once the whole batch is finished.
// =============================================================================

use crate::checker::ProbeOutcome;
use anyhow::Result;
use std::io::Write;

// Output format chosen on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

// Renders one outcome as the status line(s), without a trailing newline
pub fn render_outcome(outcome: &ProbeOutcome) -> String {
    let prefix = format!("The status of \"{}\" is: ", outcome.target);

    if outcome.reachable {
        return format!("{}Online!", prefix);
    }

    let reason = outcome.failure_reason.as_deref().unwrap_or_default();
    format!("{}\"Offline?\"\n Error: \"{}\"", prefix, reason)
}

// Writes one outcome in text form
pub fn write_outcome<W: Write>(out: &mut W, outcome: &ProbeOutcome) -> Result<()> {
    writeln!(out, "{}", render_outcome(outcome))?;
    out.flush()?;
    Ok(())
}

// Writes every outcome as one JSON array
pub fn write_json<W: Write>(out: &mut W, outcomes: &[ProbeOutcome]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(outcomes)?;
    writeln!(out, "{}", json_output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_online_line() {
        let outcome = ProbeOutcome::online("https://www.rust-lang.org");
        assert_eq!(
            render_outcome(&outcome),
            "The status of \"https://www.rust-lang.org\" is: Online!"
        );
    }

    #[test]
    fn test_offline_lines() {
        let outcome = ProbeOutcome::offline("slow.example", "timed out");
        assert_eq!(
            render_outcome(&outcome),
            "The status of \"slow.example\" is: \"Offline?\"\n Error: \"timed out\""
        );
    }

    #[test]
    fn test_write_outcome_adds_newline() {
        let mut buffer = Vec::new();
        write_outcome(&mut buffer, &ProbeOutcome::online("a.com")).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "The status of \"a.com\" is: Online!\n"
        );
    }

    #[test]
    fn test_write_json() {
        let outcomes = vec![
            ProbeOutcome::online("a.com"),
            ProbeOutcome::offline("b.com", "timed out"),
        ];
        let mut buffer = Vec::new();
        write_json(&mut buffer, &outcomes).unwrap();

        let parsed: Vec<ProbeOutcome> = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed, outcomes);
    }
}

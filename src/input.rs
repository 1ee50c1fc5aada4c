//! Candidate input from files or stdin.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

use tracing::debug;

/// Read from stdin if piped (not a terminal).
///
/// Returns None when stdin is a terminal.
pub fn read_stdin() -> Option<Result<String, String>> {
    if io::stdin().is_terminal() {
        return None;
    }
    let mut buffer = String::new();
    Some(
        io::stdin()
            .read_to_string(&mut buffer)
            .map(|_| buffer)
            .map_err(|e| format!("failed to read stdin: {}", e)),
    )
}

/// Read candidate labels from `file`, or from piped stdin when `file` is
/// absent or "-".
pub fn read_candidates(file: Option<&Path>) -> Result<Vec<String>, String> {
    let content = match file {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?,
        _ => read_stdin().ok_or_else(|| {
            "no candidates: pass a FILE or pipe candidates on stdin".to_string()
        })??,
    };

    let candidates = parse_candidates(&content);
    debug!(count = candidates.len(), "read candidates");
    Ok(candidates)
}

/// One candidate per non-blank line, with the line terminator stripped.
pub fn parse_candidates(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

//! Best-effort transferred-file count from free-text tool output
//!
//! The external tool has no machine-readable summary, so the count is
//! scraped from its output. Format drift in the tool degrades the count but
//! never the success/failure classification, which comes from the exit
//! status alone.

use once_cell::sync::Lazy;
use regex::Regex;

/// Summary phrases, in priority order. The first pattern whose first match
/// carries a positive count wins.
static SUMMARY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(\d+) files? uploaded",
        r"uploaded (\d+) files?",
        r"(\d+) files? transferred",
        r"transferred (\d+) files?",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// A per-file log line such as `upload photos/cat.jpg`.
static UPLOAD_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^upload\s+\S+").unwrap());

/// Estimates how many files a sync run transferred.
///
/// Tries the summary phrases first; if none yields a positive number, counts
/// lines that start with `upload <path>` after trimming. Returns 0 when
/// neither heuristic matches. The result is approximate and must not be
/// treated as an audit of what was transferred.
pub fn parse_files_count(output: &str) -> u64 {
    for pattern in SUMMARY_PATTERNS.iter() {
        let count = pattern
            .captures(output)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .filter(|&count| count > 0);
        if let Some(count) = count {
            return count;
        }
    }

    output
        .lines()
        .filter(|line| UPLOAD_LINE.is_match(line.trim()))
        .count() as u64
}

//! Suggestion extraction from generated insight text
//!
//! Picks bullet and enumerated lines out of free text. Only `•`, `-` and the
//! explicit enumerators `1.`, `2.`, `3.` are recognized.

/// Maximum number of suggestions kept per insight
pub const MAX_SUGGESTIONS: usize = 5;

/// Cleaned lines must be longer than this many characters
const MIN_SUGGESTION_CHARS: usize = 10;

const ENUMERATORS: [&str; 3] = ["1.", "2.", "3."];

/// Extract up to five suggestion lines from insight text
pub fn extract_suggestions(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| is_candidate(line))
        .map(clean_line)
        .filter(|line| line.chars().count() > MIN_SUGGESTION_CHARS)
        .take(MAX_SUGGESTIONS)
        .collect()
}

fn is_candidate(line: &str) -> bool {
    let trimmed = line.trim_start();
    line.contains('•') || line.contains('-') || ENUMERATORS.iter().any(|e| trimmed.starts_with(e))
}

fn clean_line(line: &str) -> String {
    let trimmed = line.trim_start();
    let stripped = ENUMERATORS
        .iter()
        .find_map(|e| trimmed.strip_prefix(e))
        .or_else(|| trimmed.strip_prefix('•'))
        .or_else(|| trimmed.strip_prefix('-'))
        .unwrap_or(trimmed);
    stripped.trim().to_string()
}

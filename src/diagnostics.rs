//! Editor diagnostics derived from parse errors.
//!
//! The parse boundary emits error strings shaped as `Line <n>:<c> <message>`;
//! this module converts them back into structured diagnostics for editor
//! surfaces. The extraction core never depends on the string shape, but the
//! surrounding system matches it with this exact pattern.

use std::sync::OnceLock;

use regex::Regex;

use crate::syntax::parse_text;

/// A line/column-tagged message suitable for editor squiggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-indexed line
    pub line: u32,
    /// 0-indexed column
    pub column: u32,
    pub message: String,
}

fn error_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Line (\d+):(\d+) (.*)").unwrap())
}

/// Parse a single `Line <n>:<c> <message>` string into a diagnostic.
///
/// Strings that do not match the pattern produce a diagnostic pinned to the
/// start of the file, so malformed messages are still surfaced.
pub fn parse_error_string(error: &str) -> Diagnostic {
    match error_pattern().captures(error) {
        Some(captures) => Diagnostic {
            line: captures[1].parse().unwrap_or(1),
            column: captures[2].parse().unwrap_or(0),
            message: captures[3].to_string(),
        },
        None => Diagnostic {
            line: 1,
            column: 0,
            message: error.to_string(),
        },
    }
}

/// Produce diagnostics for a document's content.
pub fn diagnostics_for(content: &str) -> Vec<Diagnostic> {
    parse_text(content)
        .error_strings()
        .iter()
        .map(|e| parse_error_string(e))
        .collect()
}

//! The parse boundary consumed by editors and the extraction engine.
//!
//! Error strings are shaped as `Line <n>:<c> <message>` (1-indexed line,
//! 0-indexed column). Downstream diagnostics tooling matches this exact shape
//! with a fixed regular expression, so the format is part of the contract.

use crate::base::LineIndex;

use super::file::SyntaxFile;

/// A parse error with line/column position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl ParseError {
    pub fn syntax_error(message: &str, line: u32, column: u32) -> Self {
        Self {
            message: message.to_string(),
            line,
            column,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}:{} {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Result of parsing a source text: success flag, the tree when available,
/// and formatted error messages.
#[derive(Debug)]
pub struct ParseReport {
    pub success: bool,
    pub file: Option<SyntaxFile>,
    pub errors: Vec<ParseError>,
}

impl ParseReport {
    /// Error messages in the `Line <n>:<c> <message>` wire format
    pub fn error_strings(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

/// Parse Craft source text into a report.
///
/// The tree is present even for failed parses (error recovery keeps going),
/// but `success` is only set when no errors were recorded.
pub fn parse_text(content: &str) -> ParseReport {
    let file = SyntaxFile::new(content);
    let line_index = LineIndex::new(content);

    let errors: Vec<ParseError> = file
        .errors()
        .iter()
        .map(|e| {
            let line_col = line_index.line_col(e.range.start());
            ParseError::syntax_error(&e.message, line_col.line + 1, line_col.col)
        })
        .collect();

    ParseReport {
        success: errors.is_empty(),
        file: Some(file),
        errors,
    }
}

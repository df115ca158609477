//! Syntax file wrapper for parsed Craft files.

use crate::base::LineIndex;
use crate::parser::{AstNode, Parse, SourceFile, SyntaxError, parse};

/// A parsed syntax file that wraps a rowan parse result.
#[derive(Debug, Clone)]
pub struct SyntaxFile {
    /// The underlying rowan parse result
    parse: Parse,
}

impl SyntaxFile {
    /// Parse source code into a syntax file
    pub fn new(source: &str) -> Self {
        Self {
            parse: parse(source),
        }
    }

    /// Get the underlying parse result
    pub fn parse(&self) -> &Parse {
        &self.parse
    }

    /// Get the root source file AST node
    pub fn source_file(&self) -> Option<SourceFile> {
        SourceFile::cast(self.parse.syntax())
    }

    /// Check if parsing had errors
    pub fn has_errors(&self) -> bool {
        !self.parse.errors.is_empty()
    }

    /// Get parse errors
    pub fn errors(&self) -> &[SyntaxError] {
        &self.parse.errors
    }

    /// Get the source text of the file
    pub fn source_text(&self) -> String {
        self.parse.syntax().text().to_string()
    }

    /// Create a LineIndex for converting byte offsets to line/column positions
    pub fn line_index(&self) -> LineIndex {
        LineIndex::new(&self.source_text())
    }
}

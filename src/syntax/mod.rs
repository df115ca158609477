//! Syntax-level parsing interface.
//!
//! This module wraps the rowan parser behind the boundary the rest of the
//! system consumes: given source text, it returns success/failure plus a
//! syntax file or a list of line/column-tagged error messages.

mod file;
mod report;

pub use file::SyntaxFile;
pub use report::{ParseError, ParseReport, parse_text};

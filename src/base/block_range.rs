//! Source-line spans used to locate and re-extract blocks of DSL text.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use text_size::TextRange;

use super::LineIndex;

/// A contiguous, 1-indexed, inclusive span of source lines in a specific file.
///
/// Produced once at extraction time from parser token positions and never
/// mutated afterwards. Block ranges both locate extracted entities and drive
/// partial re-serialization of source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRange {
    pub start_line: u32,
    pub end_line: u32,
    #[serde(rename = "fileUri")]
    pub file: SmolStr,
}

impl BlockRange {
    pub fn new(start_line: u32, end_line: u32, file: impl Into<SmolStr>) -> Self {
        Self {
            start_line,
            end_line,
            file: file.into(),
        }
    }

    /// Derive a block range from a byte range via a line index.
    ///
    /// The end offset of a rowan range is exclusive, so the last covered line
    /// is taken from the final byte actually inside the range.
    pub fn from_text_range(range: TextRange, index: &LineIndex, file: impl Into<SmolStr>) -> Self {
        let start = index.line_col(range.start()).line + 1;
        let end_offset = if range.is_empty() {
            range.start()
        } else {
            range.end() - text_size::TextSize::new(1)
        };
        let end = index.line_col(end_offset).line + 1;
        Self::new(start, end.max(start), file)
    }

    /// Whether `line` (1-indexed) falls within this range.
    pub fn contains_line(&self, line: u32) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    /// Whether the span `start..=end` (1-indexed) is fully inside this range.
    pub fn contains_span(&self, start: u32, end: u32) -> bool {
        self.start_line <= start && end <= self.end_line
    }
}

//! Source text access and offset-to-position conversion.

use estree_types::{OffsetRange, Position};

use crate::SyntaxTree;

/// Source text with a line index for position conversions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceText {
    text: String,
    /// Byte offset of the start of each line
    line_starts: Vec<usize>,
}

impl SourceText {
    /// Create a source text, indexing line starts.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        for (i, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self { text, line_starts }
    }

    /// The full source text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the source in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if the source is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The text covered by a byte range. Out-of-bounds ranges clamp to the
    /// end of the source; inverted or mid-character ranges read as empty.
    #[must_use]
    pub fn slice(&self, range: OffsetRange) -> &str {
        let end = range.end().min(self.text.len());
        let start = range.start().min(end);
        self.text.get(start..end).unwrap_or("")
    }

    /// Convert a byte offset to a position (1-indexed line, 0-indexed column).
    #[must_use]
    pub fn position_at(&self, offset: usize) -> Position {
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i.saturating_sub(1));
        let column = offset - self.line_starts[line];
        Position::new(line as u32 + 1, column as u32)
    }

    /// Get the byte offset of the start of a line (1-indexed).
    #[must_use]
    pub fn line_start(&self, line: u32) -> Option<usize> {
        self.line_starts.get(line.checked_sub(1)? as usize).copied()
    }

    /// Number of lines in the source.
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// A file ready for analysis: source text plus its parsed tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceFile {
    /// The source text
    pub source: SourceText,
    /// The parsed tree and token stream
    pub tree: SyntaxTree,
}

impl SourceFile {
    /// Create a source file from its text and parsed tree.
    #[must_use]
    pub fn new(source: SourceText, tree: SyntaxTree) -> Self {
        Self { source, tree }
    }
}

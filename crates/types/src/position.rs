//! Position and range types for source locations.

use serde::{Deserialize, Serialize};

/// Byte offset range in a source file.
///
/// This is the `range` span attached to tree nodes and fixes. Serialized as
/// the two-element array `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OffsetRange(pub usize, pub usize);

impl OffsetRange {
    /// Create a new offset range.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self(start, end)
    }

    /// Create a zero-width range at a specific offset.
    #[must_use]
    pub const fn at(offset: usize) -> Self {
        Self(offset, offset)
    }

    /// Start byte offset (inclusive).
    #[must_use]
    pub const fn start(self) -> usize {
        self.0
    }

    /// End byte offset (exclusive).
    #[must_use]
    pub const fn end(self) -> usize {
        self.1
    }

    /// Returns the length of this range in bytes.
    #[must_use]
    pub const fn len(self) -> usize {
        self.1 - self.0
    }

    /// Returns `true` if this is a zero-width range.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == self.1
    }
}

impl std::fmt::Display for OffsetRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.0, self.1)
    }
}

/// Position in a source file, in the tree's `loc` convention:
/// `line` is 1-indexed and `column` is 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: u32,
    /// Column within the line (0-indexed)
    pub column: u32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 0 }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.line.cmp(&other.line) {
            std::cmp::Ordering::Equal => self.column.cmp(&other.column),
            ord => ord,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Line/column range in a source file, from `start` (inclusive) to `end`
/// (exclusive). Matches the `loc` object shape of tree nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Range {
    /// Create a new range.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Create a zero-width range at a specific position.
    #[must_use]
    pub const fn at(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_range_creation() {
        let range = OffsetRange::new(10, 20);
        assert_eq!(range.start(), 10);
        assert_eq!(range.end(), 20);
        assert_eq!(range.len(), 10);
        assert!(!range.is_empty());
    }

    #[test]
    fn test_offset_range_at() {
        let range = OffsetRange::at(15);
        assert!(range.is_empty());
        assert_eq!(format!("{range}"), "15..15");
    }

    #[test]
    fn test_offset_range_serializes_as_pair() {
        let range = OffsetRange::new(4, 9);
        assert_eq!(serde_json::to_string(&range).unwrap(), "[4,9]");
        let back: OffsetRange = serde_json::from_str("[4,9]").unwrap();
        assert_eq!(back, range);
    }

    #[test]
    fn test_position_ordering() {
        let p1 = Position::new(1, 5);
        let p2 = Position::new(1, 10);
        let p3 = Position::new(2, 0);

        assert!(p1 < p2);
        assert!(p2 < p3);
        assert_eq!(p1.cmp(&p1), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_position_default_is_start_of_file() {
        assert_eq!(Position::default(), Position::new(1, 0));
    }

    #[test]
    fn test_range_loc_shape() {
        let range = Range::new(Position::new(1, 0), Position::new(1, 9));
        let json = serde_json::to_value(range).unwrap();
        assert_eq!(json["start"]["line"], 1);
        assert_eq!(json["start"]["column"], 0);
        assert_eq!(json["end"]["column"], 9);
    }
}

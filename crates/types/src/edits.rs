//! Fix descriptors attached to reported problems.

use crate::OffsetRange;
use serde::{Deserialize, Serialize};

/// A requested source edit: replace one contiguous byte range with new text.
///
/// The engine only carries fix descriptors; applying them to source text is
/// the caller's concern. Serialized as `{"range": [start, end], "text": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// Byte offset range to replace
    pub range: OffsetRange,
    /// Replacement text (empty string means removal)
    pub text: String,
}

impl Fix {
    /// Create a fix that replaces `range` with `text`.
    #[must_use]
    pub fn new(range: OffsetRange, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Create a fix that replaces the bytes from `start` to `end`.
    #[must_use]
    pub fn replace(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self::new(OffsetRange::new(start, end), text)
    }

    /// Create a fix that inserts `text` at `offset` without removing anything.
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(OffsetRange::at(offset), text)
    }

    /// Create a fix that removes the bytes from `start` to `end`.
    #[must_use]
    pub fn remove(start: usize, end: usize) -> Self {
        Self::new(OffsetRange::new(start, end), String::new())
    }

    /// Returns `true` if this fix only inserts text (zero-width range).
    #[must_use]
    pub fn is_insertion(&self) -> bool {
        self.range.is_empty() && !self.text.is_empty()
    }

    /// Returns `true` if this fix only removes text (empty replacement).
    #[must_use]
    pub fn is_removal(&self) -> bool {
        self.text.is_empty() && !self.range.is_empty()
    }
}

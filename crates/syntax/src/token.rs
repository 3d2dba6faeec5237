//! Token types for the lexical stream.

use estree_types::{OffsetRange, Range};

/// Token kinds comments are reported under.
const COMMENT_KINDS: [&str; 2] = ["Line", "Block"];

/// A single token of the source file.
///
/// The token stream comes from the external parser alongside the tree and
/// includes comment tokens (`"Line"` and `"Block"` kinds).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token type name, e.g. `"Punctuator"`, `"Identifier"`, `"Line"`
    pub kind: String,
    /// Raw token text (for comments: the text without delimiters)
    pub value: String,
    /// Byte span in the source text
    pub range: OffsetRange,
    /// Line/column span in the source text
    pub loc: Range,
}

impl Token {
    /// Create a new token.
    #[must_use]
    pub fn new(
        kind: impl Into<String>,
        value: impl Into<String>,
        range: OffsetRange,
        loc: Range,
    ) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            range,
            loc,
        }
    }

    /// Returns `true` if this is a comment token.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        COMMENT_KINDS.contains(&self.kind.as_str())
    }
}

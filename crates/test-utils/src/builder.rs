//! Terse construction of source files, nodes, and tokens for tests.
//!
//! Line/column spans are derived from the source string, so test trees only
//! spell out byte offsets.

use estree_syntax::{SourceFile, SourceText, SyntaxNode, SyntaxTree, Token};
use estree_types::{OffsetRange, Range};

/// Builds nodes and tokens with locations derived from one source string.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    text: SourceText,
}

impl TreeBuilder {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            text: SourceText::new(source),
        }
    }

    /// A node of `kind` spanning the bytes `start..end`.
    #[must_use]
    pub fn node(&self, kind: &str, start: usize, end: usize) -> SyntaxNode {
        SyntaxNode::new(kind, OffsetRange::new(start, end), self.loc(start, end))
    }

    /// A token of `kind` spanning the bytes `start..end`.
    #[must_use]
    pub fn token(&self, kind: &str, value: &str, start: usize, end: usize) -> Token {
        Token::new(kind, value, OffsetRange::new(start, end), self.loc(start, end))
    }

    /// A `//` comment token; `value` is the text after the delimiter.
    #[must_use]
    pub fn line_comment(&self, value: &str, start: usize, end: usize) -> Token {
        self.token("Line", value, start, end)
    }

    /// A `/* */` comment token; `value` is the text between the delimiters.
    #[must_use]
    pub fn block_comment(&self, value: &str, start: usize, end: usize) -> Token {
        self.token("Block", value, start, end)
    }

    /// Assembles the file from a root node and its token stream.
    #[must_use]
    pub fn file(&self, root: SyntaxNode, tokens: Vec<Token>) -> SourceFile {
        SourceFile::new(self.text.clone(), SyntaxTree::new(root, tokens))
    }

    fn loc(&self, start: usize, end: usize) -> Range {
        Range::new(self.text.position_at(start), self.text.position_at(end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estree_types::Position;

    #[test]
    fn test_locations_follow_line_breaks() {
        let builder = TreeBuilder::new("foo;\nbar;");
        let node = builder.node("ExpressionStatement", 5, 9);
        assert_eq!(node.loc.start, Position::new(2, 0));
        assert_eq!(node.loc.end, Position::new(2, 4));
    }

    #[test]
    fn test_file_keeps_source_and_tokens() {
        let builder = TreeBuilder::new("x; // later");
        let root = builder.node("Program", 0, 11);
        let comment = builder.line_comment(" later", 3, 11);
        let file = builder.file(root, vec![comment]);
        assert_eq!(file.source.text(), "x; // later");
        assert!(file.tree.tokens[0].is_comment());
    }
}

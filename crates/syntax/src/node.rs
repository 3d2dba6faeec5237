//! Tree node and tree types.

use estree_types::{OffsetRange, Range};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::Token;

/// A single node of the syntax tree.
///
/// Nodes carry a type name (`kind`, e.g. `"BinaryExpression"`), byte and
/// line/column spans, scalar attributes (`operator`, `name`, ...), and child
/// nodes in source order. The analyzer never interprets kinds itself; rules
/// subscribe to the kinds they care about.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    /// Node type name, e.g. `"ExpressionStatement"`
    pub kind: String,
    /// Byte span in the source text
    pub range: OffsetRange,
    /// Line/column span in the source text
    pub loc: Range,
    /// Scalar properties of the node (operator, name, value, ...)
    pub attrs: BTreeMap<String, Value>,
    /// Child nodes, in source order
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Create a node with no attributes or children.
    #[must_use]
    pub fn new(kind: impl Into<String>, range: OffsetRange, loc: Range) -> Self {
        Self {
            kind: kind.into(),
            range,
            loc,
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Attach a scalar attribute, builder-style.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Append a child node, builder-style.
    #[must_use]
    pub fn with_child(mut self, child: SyntaxNode) -> Self {
        self.children.push(child);
        self
    }

    /// Look up a scalar attribute.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    /// Look up a string attribute.
    #[must_use]
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(Value::as_str)
    }

    /// Look up a boolean attribute.
    #[must_use]
    pub fn attr_bool(&self, name: &str) -> Option<bool> {
        self.attrs.get(name).and_then(Value::as_bool)
    }

    /// Returns `true` if the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl Default for SyntaxNode {
    fn default() -> Self {
        Self::new("Program", OffsetRange::default(), Range::default())
    }
}

/// A parsed file: the root node plus the token stream.
///
/// The parser that produces this is external; the analyzer consumes the tree
/// as a black box. `tokens` includes comment tokens and is ordered by source
/// position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyntaxTree {
    /// Root node (conventionally a `"Program"` node)
    pub root: SyntaxNode,
    /// All tokens of the file, comments included, in source order
    pub tokens: Vec<Token>,
}

impl SyntaxTree {
    /// Create a tree from a root node and its token stream.
    #[must_use]
    pub fn new(root: SyntaxNode, tokens: Vec<Token>) -> Self {
        Self { root, tokens }
    }

    /// Total number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        fn count(node: &SyntaxNode) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        count(&self.root)
    }
}

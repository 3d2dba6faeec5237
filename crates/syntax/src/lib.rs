//! # Syntax tree model
//!
//! This crate provides the tree, token, and source-text model the analyzer
//! runs against. Parsing itself is external: a parser produces ESTree-style
//! JSON (or constructs [`SyntaxNode`]s directly), and the analyzer treats the
//! result as opaque data. Node kinds are plain strings that rules subscribe
//! to by name.
//!
//! ```rust
//! use estree_syntax::{file_from_estree};
//! use serde_json::json;
//!
//! let program = json!({
//!     "type": "Program",
//!     "range": [0, 9],
//!     "body": [{ "type": "DebuggerStatement", "range": [0, 9] }]
//! });
//! let file = file_from_estree("debugger;", &program).unwrap();
//! assert_eq!(file.tree.root.children[0].kind, "DebuggerStatement");
//! ```

mod error;
mod estree;
mod node;
mod source;
mod token;

pub use error::{Result, SyntaxError};
pub use estree::{file_from_estree, node_from_value};
pub use node::{SyntaxNode, SyntaxTree};
pub use source::{SourceFile, SourceText};
pub use token::Token;

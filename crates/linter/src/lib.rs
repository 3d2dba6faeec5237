//! Configuration-driven static analysis over ESTree-shaped syntax trees.
//!
//! The crate has two halves. The configuration half validates raw config
//! values against the documented shape (severities, rule options, known
//! environments) and normalizes them: merging `extends` chains, applying
//! `overrides` by file path, resolving environments into globals and parser
//! options. The execution half activates the enabled rules and drives them
//! through one traversal of a file's tree, collecting [`Problem`]s.
//!
//! ```
//! use estree_linter::{
//!     Linter, OffsetRange, Position, Range, SourceFile, SourceText, SyntaxNode, SyntaxTree,
//! };
//! use serde_json::json;
//!
//! let span = Range::new(Position::new(1, 0), Position::new(1, 9));
//! let root = SyntaxNode::new("Program", OffsetRange::new(0, 9), span)
//!     .with_child(SyntaxNode::new("DebuggerStatement", OffsetRange::new(0, 9), span));
//! let file = SourceFile::new(SourceText::new("debugger;"), SyntaxTree::new(root, Vec::new()));
//!
//! let linter = Linter::new();
//! let problems = linter.verify(file, &json!({ "rules": { "no-debugger": "error" } }), None)?;
//! assert_eq!(problems[0].message, "Unexpected 'debugger' statement.");
//! # Ok::<(), estree_linter::ConfigError>(())
//! ```

mod config;
mod config_ops;
mod config_validator;
mod context;
mod diagnostics;
mod environments;
mod error;
mod linter;
mod registry;
mod rule;
mod rules;
pub mod schema;

pub use config::{
    parse_json, parse_yaml, Config, GlobalValue, OverrideConfig, RuleEntry, StringOrList,
};
pub use config_ops::{applies_to, apply_overrides, merge, resolve_environments};
pub use config_validator::{validate, validate_rule_options};
pub use context::RuleContext;
pub use diagnostics::Problem;
pub use environments::{builtin_environments, Environment, EnvironmentRegistry};
pub use error::{ConfigError, ConfigErrorKind, Result, RuleError, RuleResult};
pub use linter::Linter;
pub use registry::RuleRegistry;
pub use rule::{
    Fixable, Phase, RuleDefinition, RuleDocs, RuleFactory, RuleMeta, RuleSchema, RuleVisitor,
    Selector,
};

// The syntax model the analyzer traverses and the shared primitive types.
pub use estree_syntax::{SourceFile, SourceText, SyntaxNode, SyntaxTree, Token};
pub use estree_types::{Fix, OffsetRange, Position, Range, Severity};

/// Prelude module for convenient imports.
///
/// Re-exports the types most code touching the analyzer needs. Import with:
///
/// ```rust,ignore
/// use estree_linter::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Config, ConfigError, Linter, Problem, RuleContext, RuleDefinition, RuleVisitor, Severity,
        SourceFile, SourceText, SyntaxNode, SyntaxTree,
    };
}

//! The problem type produced by rule execution.

use estree_syntax::SyntaxNode;
use estree_types::{Fix, Severity};
use serde::Serialize;

/// A single finding reported against a file.
///
/// Positions are one-based for both line and column, matching what editors
/// and report formatters expect. `severity` serializes as its numeric code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// Id of the reporting rule
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub line: u32,
    pub column: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
    /// Kind of the offending node; `null` for faults with no node attached
    pub node_type: Option<String>,
    /// Suggested text edit resolving the problem
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Problem {
    /// A problem at an explicit position with no node attached.
    #[must_use]
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            line,
            column,
            end_line: None,
            end_column: None,
            node_type: None,
            fix: None,
        }
    }

    /// A problem spanning `node`, positioned at its start.
    #[must_use]
    pub fn for_node(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        node: &SyntaxNode,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            line: node.loc.start.line,
            column: node.loc.start.column + 1,
            end_line: Some(node.loc.end.line),
            end_column: Some(node.loc.end.column + 1),
            node_type: Some(node.kind.clone()),
            fix: None,
        }
    }

    /// A fault raised while instantiating a rule. Reported at the top of the
    /// file since no node was reached yet.
    #[must_use]
    pub fn rule_load_fault(rule_id: &str, message: &str) -> Self {
        Self::new(
            rule_id,
            Severity::Error,
            format!("Error while loading rule '{rule_id}': {message}"),
            1,
            1,
        )
    }

    /// A fault raised by a listener mid-traversal, attributed to the node
    /// being visited.
    #[must_use]
    pub fn rule_run_fault(rule_id: &str, message: &str, node: &SyntaxNode) -> Self {
        Self::for_node(
            rule_id,
            Severity::Error,
            format!("Error while running rule '{rule_id}': {message}"),
            node,
        )
    }

    /// A configured rule id that no definition matches.
    #[must_use]
    pub fn missing_rule(rule_id: &str) -> Self {
        Self::new(
            rule_id,
            Severity::Error,
            format!("Definition for rule '{rule_id}' was not found."),
            1,
            1,
        )
    }

    /// Attach a suggested fix.
    #[must_use]
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    #[must_use]
    pub const fn has_fix(&self) -> bool {
        self.fix.is_some()
    }

    /// Position sort key: problems order by line, then column.
    #[must_use]
    pub const fn position(&self) -> (u32, u32) {
        (self.line, self.column)
    }
}

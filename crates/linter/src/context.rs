//! Per-rule run context: configuration handed to the rule and the sink its
//! reports land in.

use crate::diagnostics::Problem;
use estree_syntax::{SourceFile, SourceText, SyntaxNode, Token};
use estree_types::{Fix, Position, Severity};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// Everything a rule sees while it runs: its id and configured severity, the
/// options that followed the severity slot, shared settings, parser options,
/// and the file under analysis.
///
/// Reports accumulate in an interior sink; the engine drains it once the
/// traversal is done. Contexts are per-rule and per-run, so one faulting rule
/// cannot see or disturb another rule's reports.
pub struct RuleContext {
    rule_id: String,
    severity: Severity,
    options: Vec<Value>,
    settings: Map<String, Value>,
    parser_options: Map<String, Value>,
    file: Rc<SourceFile>,
    problems: RefCell<Vec<Problem>>,
}

impl RuleContext {
    pub(crate) fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        options: Vec<Value>,
        settings: Map<String, Value>,
        parser_options: Map<String, Value>,
        file: Rc<SourceFile>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            options,
            settings,
            parser_options,
            file,
            problems: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// The rule's options, with the severity slot already stripped.
    #[must_use]
    pub fn options(&self) -> &[Value] {
        &self.options
    }

    /// A single positional option.
    #[must_use]
    pub fn option(&self, index: usize) -> Option<&Value> {
        self.options.get(index)
    }

    #[must_use]
    pub const fn settings(&self) -> &Map<String, Value> {
        &self.settings
    }

    #[must_use]
    pub const fn parser_options(&self) -> &Map<String, Value> {
        &self.parser_options
    }

    #[must_use]
    pub fn source(&self) -> &SourceText {
        &self.file.source
    }

    /// All tokens of the file, comments included.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.file.tree.tokens
    }

    /// Comment tokens only.
    pub fn comments(&self) -> impl Iterator<Item = &Token> {
        self.tokens().iter().filter(|token| token.is_comment())
    }

    /// Report a problem spanning `node`.
    pub fn report(&self, node: &SyntaxNode, message: impl Into<String>) {
        self.push(Problem::for_node(
            &self.rule_id,
            self.severity,
            message,
            node,
        ));
    }

    /// Report with `{{name}}` placeholders filled from `data`.
    pub fn report_with_data(&self, node: &SyntaxNode, message: &str, data: &[(&str, &str)]) {
        self.report(node, interpolate(message, data));
    }

    /// Report with a suggested fix attached.
    pub fn report_with_fix(&self, node: &SyntaxNode, message: impl Into<String>, fix: Fix) {
        self.push(Problem::for_node(&self.rule_id, self.severity, message, node).with_fix(fix));
    }

    /// Report at an explicit position inside `node` rather than its start.
    /// The problem keeps the node's kind but carries no end position.
    pub fn report_at(&self, node: &SyntaxNode, position: Position, message: impl Into<String>) {
        self.push(self.problem_at(node, position, message));
    }

    /// [`report_at`](Self::report_at) with a suggested fix attached.
    pub fn report_at_with_fix(
        &self,
        node: &SyntaxNode,
        position: Position,
        message: impl Into<String>,
        fix: Fix,
    ) {
        self.push(self.problem_at(node, position, message).with_fix(fix));
    }

    /// Report a problem spanning a token (used for comment findings).
    pub fn report_token(&self, token: &Token, message: impl Into<String>) {
        let mut problem = Problem::new(
            &self.rule_id,
            self.severity,
            message,
            token.loc.start.line,
            token.loc.start.column + 1,
        );
        problem.end_line = Some(token.loc.end.line);
        problem.end_column = Some(token.loc.end.column + 1);
        problem.node_type = Some(token.kind.clone());
        self.push(problem);
    }

    /// [`report_token`](Self::report_token) with `{{name}}` placeholders.
    pub fn report_token_with_data(&self, token: &Token, message: &str, data: &[(&str, &str)]) {
        self.report_token(token, interpolate(message, data));
    }

    /// Drains everything reported so far, in report order.
    pub(crate) fn take_problems(&self) -> Vec<Problem> {
        self.problems.take()
    }

    /// Engine-side entry for synthetic problems (rule faults), so they land
    /// in the same sink, ordered with the rule's own reports.
    pub(crate) fn record(&self, problem: Problem) {
        self.push(problem);
    }

    fn problem_at(
        &self,
        node: &SyntaxNode,
        position: Position,
        message: impl Into<String>,
    ) -> Problem {
        let mut problem = Problem::new(
            &self.rule_id,
            self.severity,
            message,
            position.line,
            position.column + 1,
        );
        problem.node_type = Some(node.kind.clone());
        problem
    }

    fn push(&self, problem: Problem) {
        self.problems.borrow_mut().push(problem);
    }
}

impl std::fmt::Debug for RuleContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleContext")
            .field("rule_id", &self.rule_id)
            .field("severity", &self.severity)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Fills `{{name}}` placeholders in a message template.
fn interpolate(message: &str, data: &[(&str, &str)]) -> String {
    let mut filled = message.to_string();
    for (name, value) in data {
        filled = filled.replace(&format!("{{{{{name}}}}}"), value);
    }
    filled
}

//! A rule test harness in the spirit of the original's `RuleTester`.
//!
//! Cases share one linter with only the rule under test defined. Options go
//! through schema validation first, so a test with options the rule would
//! reject fails loudly instead of silently running with defaults. Invalid
//! cases can also assert the `output` after applying the suggested fixes.

use crate::assertions::format_problems;
use estree_linter::{validate_rule_options, Linter, Problem, RuleDefinition};
use estree_syntax::SourceFile;
use serde_json::{json, Map, Value};

/// Runs valid/invalid cases against one rule.
pub struct RuleTester {
    rule_id: String,
    linter: Linter,
}

impl RuleTester {
    /// A tester for a custom rule definition.
    #[must_use]
    pub fn new(rule_id: impl Into<String>, rule: RuleDefinition) -> Self {
        let rule_id = rule_id.into();
        let mut linter = Linter::empty();
        linter.define_rule(rule_id.clone(), rule);
        Self { rule_id, linter }
    }

    /// A tester for one of the builtin rules.
    #[must_use]
    pub fn builtin(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            linter: Linter::new(),
        }
    }

    /// Runs every case, panicking with a formatted report on the first
    /// mismatch.
    pub fn run(&self, valid: Vec<ValidCase>, invalid: Vec<InvalidCase>) {
        for (index, case) in valid.iter().enumerate() {
            let problems = self.verify(&case.file, &case.options);
            assert!(
                problems.is_empty(),
                "valid case {index} of '{}' produced problems:\n{}",
                self.rule_id,
                format_problems(&problems)
            );
        }
        for (index, case) in invalid.iter().enumerate() {
            let problems = self.verify(&case.file, &case.options);
            assert_eq!(
                problems.len(),
                case.expected.len(),
                "invalid case {index} of '{}' produced:\n{}",
                self.rule_id,
                format_problems(&problems)
            );
            for (expected, problem) in case.expected.iter().zip(&problems) {
                expected.assert_matches(&self.rule_id, index, problem);
            }
            if let Some(expected_output) = &case.output {
                let fixed = apply_fixes(case.file.source.text(), &problems);
                assert_eq!(
                    &fixed, expected_output,
                    "invalid case {index} of '{}': fixes produced the wrong output",
                    self.rule_id
                );
            }
        }
    }

    fn verify(&self, file: &SourceFile, options: &[Value]) -> Vec<Problem> {
        let mut entry = vec![json!(1)];
        entry.extend(options.iter().cloned());
        let entry = Value::Array(entry);

        let rule = self
            .linter
            .rules()
            .get(&self.rule_id)
            .expect("rule under test is defined");
        validate_rule_options(Some(&rule), &self.rule_id, &entry, None)
            .expect("case options must satisfy the rule's schema");

        let mut rules = Map::new();
        rules.insert(self.rule_id.clone(), entry);
        let config = json!({ "rules": rules });
        self.linter
            .verify(file.clone(), &config, None)
            .expect("rule tester configs are always valid")
    }
}

/// A case the rule must accept without reporting.
#[derive(Debug, Clone)]
pub struct ValidCase {
    file: SourceFile,
    options: Vec<Value>,
}

impl ValidCase {
    #[must_use]
    pub fn new(file: SourceFile) -> Self {
        Self {
            file,
            options: Vec::new(),
        }
    }

    /// Options after the severity slot; a JSON array spreads into slots.
    #[must_use]
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = spread_options(options);
        self
    }
}

/// A case the rule must report, with the expected problems in order.
#[derive(Debug, Clone)]
pub struct InvalidCase {
    file: SourceFile,
    options: Vec<Value>,
    expected: Vec<ExpectedProblem>,
    output: Option<String>,
}

impl InvalidCase {
    #[must_use]
    pub fn new(file: SourceFile) -> Self {
        Self {
            file,
            options: Vec::new(),
            expected: Vec::new(),
            output: None,
        }
    }

    /// Options after the severity slot; a JSON array spreads into slots.
    #[must_use]
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = spread_options(options);
        self
    }

    /// Appends one expected problem; call once per expected report.
    #[must_use]
    pub fn expecting(mut self, expected: ExpectedProblem) -> Self {
        self.expected.push(expected);
        self
    }

    /// The source after applying the reported fixes.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }
}

/// Field-wise expectations for one problem; unset fields are not checked.
#[derive(Debug, Clone, Default)]
pub struct ExpectedProblem {
    message: Option<String>,
    line: Option<u32>,
    column: Option<u32>,
    node_type: Option<String>,
}

impl ExpectedProblem {
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    #[must_use]
    pub fn node_type(mut self, kind: impl Into<String>) -> Self {
        self.node_type = Some(kind.into());
        self
    }

    fn assert_matches(&self, rule_id: &str, case: usize, problem: &Problem) {
        if let Some(message) = &self.message {
            assert_eq!(
                &problem.message, message,
                "invalid case {case} of '{rule_id}': message mismatch"
            );
        }
        if let Some(line) = self.line {
            assert_eq!(
                problem.line, line,
                "invalid case {case} of '{rule_id}': line mismatch"
            );
        }
        if let Some(column) = self.column {
            assert_eq!(
                problem.column, column,
                "invalid case {case} of '{rule_id}': column mismatch"
            );
        }
        if let Some(node_type) = &self.node_type {
            assert_eq!(
                problem.node_type.as_deref(),
                Some(node_type.as_str()),
                "invalid case {case} of '{rule_id}': node type mismatch"
            );
        }
    }
}

fn spread_options(options: Value) -> Vec<Value> {
    match options {
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Applies the problems' fixes to `source` as a simple ordered splice.
/// Overlap resolution is out of scope here; cases are built not to overlap.
fn apply_fixes(source: &str, problems: &[Problem]) -> String {
    let mut fixes: Vec<_> = problems
        .iter()
        .filter_map(|problem| problem.fix.as_ref())
        .collect();
    fixes.sort_by_key(|fix| (fix.range.start(), fix.range.end()));

    let mut result = source.to_string();
    for fix in fixes.iter().rev() {
        let start = fix.range.start().min(result.len());
        let end = fix.range.end().min(result.len());
        result.replace_range(start..end, &fix.text);
    }
    result
}

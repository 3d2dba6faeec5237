//! The analyzer: config validation, rule activation, one tree traversal,
//! and problem finalization.

use crate::config::Config;
use crate::config_ops;
use crate::config_validator;
use crate::context::RuleContext;
use crate::diagnostics::Problem;
use crate::environments::{Environment, EnvironmentRegistry};
use crate::error::Result;
use crate::registry::RuleRegistry;
use crate::rule::{Phase, RuleDefinition, RuleVisitor, Selector};
use estree_syntax::{SourceFile, SyntaxNode};
use serde_json::Value;
use std::collections::HashSet;
use std::rc::Rc;

/// The top-level analyzer: owns the rule and environment registries and
/// drives verification of one file at a time.
///
/// No state is retained between [`verify`](Self::verify) calls; the
/// registries are the only process-wide state, written during startup and
/// read thereafter.
#[derive(Debug, Clone)]
pub struct Linter {
    rules: RuleRegistry,
    environments: EnvironmentRegistry,
}

impl Linter {
    /// A linter preloaded with the builtin rules and environments.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: RuleRegistry::with_builtin_rules(),
            environments: EnvironmentRegistry::with_builtin_environments(),
        }
    }

    /// A linter with empty registries, for callers that wire up everything
    /// themselves.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: RuleRegistry::empty(),
            environments: EnvironmentRegistry::empty(),
        }
    }

    #[must_use]
    pub const fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    #[must_use]
    pub const fn environments(&self) -> &EnvironmentRegistry {
        &self.environments
    }

    pub fn define_rule(&mut self, id: impl Into<String>, rule: RuleDefinition) {
        self.rules.define(id, rule);
    }

    pub fn define_environment(&mut self, name: impl Into<String>, environment: Environment) {
        self.environments.define(name, environment);
    }

    /// Validates `config`, activates its enabled rules, and runs them over
    /// `file`. Problems come back sorted by position (line, then column),
    /// ties kept in rule activation order, duplicates removed.
    ///
    /// Configuration errors abort before any traversal; rule faults do not,
    /// they surface as synthetic problems in the result.
    #[tracing::instrument(skip(self, file, config))]
    pub fn verify(
        &self,
        file: SourceFile,
        config: &Value,
        source: Option<&str>,
    ) -> Result<Vec<Problem>> {
        self.verify_inner(file, config, None, source)
    }

    /// [`verify`](Self::verify) with a file path, so `overrides` entries
    /// matching the path apply before rules activate.
    #[tracing::instrument(skip(self, file, config))]
    pub fn verify_file(
        &self,
        file: SourceFile,
        config: &Value,
        filename: &str,
        source: Option<&str>,
    ) -> Result<Vec<Problem>> {
        self.verify_inner(file, config, Some(filename), source)
    }

    fn verify_inner(
        &self,
        file: SourceFile,
        config: &Value,
        filename: Option<&str>,
        source: Option<&str>,
    ) -> Result<Vec<Problem>> {
        config_validator::validate(config, source, |id| self.rules.get(id), &self.environments)?;

        let mut config = Config::from_value(config)?;
        if let Some(filename) = filename {
            config = config_ops::apply_overrides(&config, filename);
        }
        let config = config_ops::resolve_environments(&config, &self.environments);

        let mut run = FileRun::new(Rc::new(file));
        run.activate(&self.rules, &config);
        run.traverse();
        Ok(run.finalize())
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::new()
    }
}

/// Traversal lifecycle of a single file run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunPhase {
    NotStarted,
    Traversing,
    Finalizing,
    Done,
}

/// One rule wired into a run: its context (and sink), and its visitor.
/// `visitor` is `None` when the rule never started (missing definition or
/// factory fault) or was dropped after a listener fault.
struct ActiveRule {
    rule_id: String,
    context: Rc<RuleContext>,
    visitor: Option<RuleVisitor>,
}

/// All state of one file's analysis, advanced through [`RunPhase`].
struct FileRun {
    phase: RunPhase,
    file: Rc<SourceFile>,
    active: Vec<ActiveRule>,
}

impl FileRun {
    fn new(file: Rc<SourceFile>) -> Self {
        Self {
            phase: RunPhase::NotStarted,
            file,
            active: Vec::new(),
        }
    }

    /// Instantiates every enabled rule, in config declaration order. A
    /// factory failure or unresolvable rule id becomes a synthetic problem
    /// in that rule's sink and the run continues without its visitor.
    fn activate(&mut self, rules: &RuleRegistry, config: &Config) {
        debug_assert_eq!(self.phase, RunPhase::NotStarted);
        for (rule_id, entry) in &config.rules {
            if !entry.is_enabled() {
                continue;
            }
            let context = Rc::new(RuleContext::new(
                rule_id,
                entry.severity,
                entry.options.clone(),
                config.settings.clone(),
                config.parser_options.clone(),
                Rc::clone(&self.file),
            ));
            let visitor = match rules.get(rule_id) {
                None => {
                    context.record(Problem::missing_rule(rule_id));
                    None
                }
                Some(rule) => match rule.create(Rc::clone(&context)) {
                    Ok(visitor) => Some(visitor),
                    Err(err) => {
                        tracing::debug!(rule_id, error = %err, "rule factory failed");
                        context.record(Problem::rule_load_fault(rule_id, err.message()));
                        None
                    }
                },
            };
            self.active.push(ActiveRule {
                rule_id: rule_id.clone(),
                context,
                visitor,
            });
        }
        tracing::debug!(rules = self.active.len(), "activated rules");
        self.phase = RunPhase::Traversing;
    }

    /// Exactly one depth-first walk: enter listeners pre-order, exit
    /// listeners post-order. Every listener for a node kind fires, in rule
    /// activation order; a faulting listener is contained to its rule.
    fn traverse(&mut self) {
        debug_assert_eq!(self.phase, RunPhase::Traversing);
        // Walk through a second handle on the file; dispatch needs `&mut self`.
        let file = Rc::clone(&self.file);
        self.walk(&file.tree.root);
        self.phase = RunPhase::Finalizing;
    }

    fn walk(&mut self, node: &SyntaxNode) {
        self.dispatch(node, Phase::Enter);
        for child in &node.children {
            self.walk(child);
        }
        self.dispatch(node, Phase::Exit);
    }

    fn dispatch(&mut self, node: &SyntaxNode, phase: Phase) {
        let selector = match phase {
            Phase::Enter => Selector::enter(&node.kind),
            Phase::Exit => Selector::exit(&node.kind),
        };
        for rule in &mut self.active {
            let Some(visitor) = rule.visitor.as_mut() else {
                continue;
            };
            if let Err(err) = visitor.notify(&selector, node) {
                tracing::debug!(rule_id = %rule.rule_id, error = %err, "rule listener failed");
                rule.context
                    .record(Problem::rule_run_fault(&rule.rule_id, err.message(), node));
                // The rule is out of this run; everyone else keeps going.
                rule.visitor = None;
            }
        }
    }

    /// Concatenates every sink in activation order, position-sorts, and
    /// drops duplicate (rule, position, message) findings.
    fn finalize(mut self) -> Vec<Problem> {
        debug_assert_eq!(self.phase, RunPhase::Finalizing);
        let mut problems: Vec<Problem> = self
            .active
            .iter()
            .flat_map(|rule| rule.context.take_problems())
            .collect();
        problems.sort_by_key(Problem::position);

        let mut seen = HashSet::new();
        problems.retain(|problem| {
            seen.insert((
                problem.rule_id.clone(),
                problem.line,
                problem.column,
                problem.message.clone(),
            ))
        });

        tracing::debug!(problems = problems.len(), "run finished");
        self.phase = RunPhase::Done;
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use estree_syntax::{SourceText, SyntaxTree};
    use estree_types::{OffsetRange, Position, Range, Severity};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn node(kind: &str, start: usize, end: usize, line: u32, column: u32) -> SyntaxNode {
        SyntaxNode::new(
            kind,
            OffsetRange::new(start, end),
            Range::new(
                Position::new(line, column),
                Position::new(line, column + (end - start) as u32),
            ),
        )
    }

    fn expression_file() -> SourceFile {
        let root = node("Program", 0, 4, 1, 0).with_child(node("ExpressionStatement", 0, 4, 1, 0));
        SourceFile::new(SourceText::new("foo;"), SyntaxTree::new(root, Vec::new()))
    }

    fn reporting_rule(message: &'static str) -> RuleDefinition {
        RuleDefinition::new(move |context| {
            let reporter = Rc::clone(&context);
            Ok(RuleVisitor::new().on("ExpressionStatement", move |node| {
                reporter.report(node, message);
                Ok(())
            }))
        })
    }

    fn linter_with(rules: Vec<(&str, RuleDefinition)>) -> Linter {
        let mut linter = Linter::empty();
        for (id, rule) in rules {
            linter.define_rule(id, rule);
        }
        linter
    }

    #[test]
    fn test_two_rules_fire_in_activation_order_at_same_position() {
        let linter = linter_with(vec![
            ("a-rule", reporting_rule("first")),
            ("b-rule", reporting_rule("second")),
        ]);
        let problems = linter
            .verify(
                expression_file(),
                &json!({ "rules": { "b-rule": 2, "a-rule": 2 } }),
                None,
            )
            .unwrap();
        assert_eq!(problems.len(), 2);
        // Activation order is declaration order; object configs declare in
        // lexical key order.
        assert_eq!(problems[0].rule_id, "a-rule");
        assert_eq!(problems[1].rule_id, "b-rule");
        assert_eq!(problems[0].position(), problems[1].position());
    }

    #[test]
    fn test_factory_fault_is_contained_to_its_rule() {
        let linter = linter_with(vec![
            ("broken", RuleDefinition::new(|_| Err(RuleError::new("bad setup")))),
            ("healthy", reporting_rule("found")),
        ]);
        let problems = linter
            .verify(
                expression_file(),
                &json!({ "rules": { "broken": 2, "healthy": 2 } }),
                None,
            )
            .unwrap();
        assert_eq!(problems.len(), 2);
        assert_eq!(
            problems[0].message,
            "Error while loading rule 'broken': bad setup"
        );
        assert_eq!(problems[0].severity, Severity::Error);
        assert_eq!(problems[1].rule_id, "healthy");
    }

    #[test]
    fn test_listener_fault_is_contained_and_rule_dropped() {
        let faulty = RuleDefinition::new(|_| {
            Ok(RuleVisitor::new()
                .on("ExpressionStatement", |_| Err(RuleError::new("boom"))))
        });
        let linter = linter_with(vec![("faulty", faulty), ("healthy", reporting_rule("found"))]);

        let root = node("Program", 0, 9, 1, 0)
            .with_child(node("ExpressionStatement", 0, 4, 1, 0))
            .with_child(node("ExpressionStatement", 5, 9, 1, 5));
        let file = SourceFile::new(
            SourceText::new("foo; bar;"),
            SyntaxTree::new(root, Vec::new()),
        );

        let problems = linter
            .verify(file, &json!({ "rules": { "faulty": 2, "healthy": 1 } }), None)
            .unwrap();

        let faulty_problems: Vec<_> = problems
            .iter()
            .filter(|problem| problem.rule_id == "faulty")
            .collect();
        assert_eq!(faulty_problems.len(), 1);
        assert_eq!(
            faulty_problems[0].message,
            "Error while running rule 'faulty': boom"
        );
        assert_eq!(
            problems
                .iter()
                .filter(|problem| problem.rule_id == "healthy")
                .count(),
            2
        );
    }

    #[test]
    fn test_missing_rule_becomes_problem() {
        let linter = linter_with(vec![("healthy", reporting_rule("found"))]);
        let problems = linter
            .verify(
                expression_file(),
                &json!({ "rules": { "healthy": 2, "vanished": 2 } }),
                None,
            )
            .unwrap();
        assert_eq!(problems.len(), 2);
        assert!(problems
            .iter()
            .any(|problem| problem.message == "Definition for rule 'vanished' was not found."));
    }

    #[test]
    fn test_off_rules_never_instantiate() {
        let linter = linter_with(vec![(
            "eager",
            RuleDefinition::new(|_| Err(RuleError::new("should not be called"))),
        )]);
        let problems = linter
            .verify(expression_file(), &json!({ "rules": { "eager": "off" } }), None)
            .unwrap();
        assert!(problems.is_empty());
    }

    #[test]
    fn test_problems_sort_by_position() {
        let late = RuleDefinition::new(|context| {
            let reporter = Rc::clone(&context);
            Ok(RuleVisitor::new().on("Program:exit", move |node| {
                reporter.report(node, "root last");
                Ok(())
            }))
        });
        let linter = linter_with(vec![("late", late), ("inner", reporting_rule("inner"))]);

        let root = node("Program", 0, 9, 1, 0).with_child(node("ExpressionStatement", 5, 9, 2, 2));
        let file = SourceFile::new(
            SourceText::new("foo;\nbar;"),
            SyntaxTree::new(root, Vec::new()),
        );
        let problems = linter
            .verify(file, &json!({ "rules": { "inner": 2, "late": 2 } }), None)
            .unwrap();
        assert_eq!(problems[0].rule_id, "late");
        assert_eq!(problems[0].position(), (1, 1));
        assert_eq!(problems[1].rule_id, "inner");
        assert_eq!(problems[1].position(), (2, 3));
    }

    #[test]
    fn test_duplicate_reports_are_removed() {
        let noisy = RuleDefinition::new(|context| {
            let reporter = Rc::clone(&context);
            Ok(RuleVisitor::new().on("ExpressionStatement", move |node| {
                reporter.report(node, "same finding");
                reporter.report(node, "same finding");
                Ok(())
            }))
        });
        let linter = linter_with(vec![("noisy", noisy)]);
        let problems = linter
            .verify(expression_file(), &json!({ "rules": { "noisy": 2 } }), None)
            .unwrap();
        assert_eq!(problems.len(), 1);
    }

    #[test]
    fn test_same_message_from_different_rules_is_kept() {
        let linter = linter_with(vec![
            ("one", reporting_rule("duplicate text")),
            ("two", reporting_rule("duplicate text")),
        ]);
        let problems = linter
            .verify(
                expression_file(),
                &json!({ "rules": { "one": 2, "two": 2 } }),
                None,
            )
            .unwrap();
        assert_eq!(problems.len(), 2);
    }

    #[test]
    fn test_configured_severity_reaches_problems() {
        let linter = linter_with(vec![("quiet", reporting_rule("warned"))]);
        let problems = linter
            .verify(expression_file(), &json!({ "rules": { "quiet": "warn" } }), None)
            .unwrap();
        assert_eq!(problems[0].severity, Severity::Warn);
    }

    #[test]
    fn test_environment_parser_options_reach_contexts() {
        let inspector = RuleDefinition::new(|context| {
            let reporter = Rc::clone(&context);
            Ok(RuleVisitor::new().on("Program", move |node| {
                if reporter.parser_options().contains_key("ecmaVersion") {
                    reporter.report(node, "modern syntax enabled");
                }
                Ok(())
            }))
        });
        let mut linter = Linter::new();
        linter.define_rule("inspector", inspector);
        let problems = linter
            .verify(
                expression_file(),
                &json!({ "env": { "es6": true }, "rules": { "inspector": 2 } }),
                None,
            )
            .unwrap();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].message, "modern syntax enabled");
    }

    #[test]
    fn test_invalid_config_aborts_before_traversal() {
        let linter = linter_with(vec![(
            "eager",
            RuleDefinition::new(|_| Err(RuleError::new("should not be called"))),
        )]);
        let err = linter
            .verify(
                expression_file(),
                &json!({ "frobnicate": true, "rules": { "eager": 2 } }),
                Some("tests"),
            )
            .unwrap_err();
        assert_eq!(
            err.message,
            "ESLint configuration in tests is invalid:\n\t- Unexpected top-level property \"frobnicate\".\n"
        );
    }

    #[test]
    fn test_overrides_apply_by_filename() {
        let linter = linter_with(vec![("finder", reporting_rule("found"))]);
        let config = json!({
            "rules": { "finder": "off" },
            "overrides": [
                { "files": "*.test.js", "rules": { "finder": 2 } }
            ]
        });

        let on = linter
            .verify_file(expression_file(), &config, "src/app.test.js", None)
            .unwrap();
        assert_eq!(on.len(), 1);

        let off = linter
            .verify_file(expression_file(), &config, "src/app.js", None)
            .unwrap();
        assert!(off.is_empty());
    }

    #[test]
    fn test_exit_listeners_fire_post_order() {
        // The factory is shared through the registry, so its log must be
        // thread-safe even though listeners run single-threaded.
        let order = Arc::new(Mutex::new(Vec::new()));
        let trace = Arc::clone(&order);
        let tracker = RuleDefinition::new(move |_| {
            let enter_log = Arc::clone(&trace);
            let exit_log = Arc::clone(&trace);
            Ok(RuleVisitor::new()
                .on("Program", move |_| {
                    enter_log.lock().unwrap().push("enter Program");
                    Ok(())
                })
                .on("Program:exit", move |_| {
                    exit_log.lock().unwrap().push("exit Program");
                    Ok(())
                }))
        });
        let linter = linter_with(vec![("tracker", tracker)]);
        linter
            .verify(expression_file(), &json!({ "rules": { "tracker": 2 } }), None)
            .unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["enter Program", "exit Program"]);
    }

    #[test]
    fn test_traversal_is_depth_first_with_phases() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let trace = Arc::clone(&order);
        let tracker = RuleDefinition::new(move |_| {
            let mut visitor = RuleVisitor::new();
            for selector in [
                "Program",
                "Program:exit",
                "FunctionDeclaration",
                "FunctionDeclaration:exit",
                "BlockStatement",
                "BlockStatement:exit",
            ] {
                let log = Arc::clone(&trace);
                visitor = visitor.on(selector, move |_| {
                    log.lock().unwrap().push(selector);
                    Ok(())
                });
            }
            Ok(visitor)
        });
        let linter = linter_with(vec![("tracker", tracker)]);

        let root = node("Program", 0, 14, 1, 0).with_child(
            node("FunctionDeclaration", 0, 14, 1, 0)
                .with_child(node("BlockStatement", 12, 14, 1, 12)),
        );
        let file = SourceFile::new(
            SourceText::new("function f(){}"),
            SyntaxTree::new(root, Vec::new()),
        );
        linter
            .verify(file, &json!({ "rules": { "tracker": 2 } }), None)
            .unwrap();
        assert_eq!(
            *order.lock().unwrap(),
            vec![
                "Program",
                "FunctionDeclaration",
                "BlockStatement",
                "BlockStatement:exit",
                "FunctionDeclaration:exit",
                "Program:exit",
            ]
        );
    }
}

//! The rule model: metadata, option schemas, and the visitor a rule factory
//! builds for each run.

use crate::context::RuleContext;
use crate::error::RuleResult;
use serde_json::{json, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// What a fixable rule is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixable {
    Code,
    Whitespace,
}

/// Human-facing rule documentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleDocs {
    pub description: String,
    pub category: String,
    pub recommended: bool,
}

/// Schema for a rule's options (everything after the severity slot).
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSchema {
    /// One schema per positional option slot. Validated by wrapping into an
    /// array schema capped at the slot count, so surplus options are
    /// rejected as over-length rather than silently ignored.
    Positional(Vec<Value>),
    /// A complete schema applied to the options array unmodified.
    Object(Value),
}

/// Metadata attached to a rule definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleMeta {
    pub docs: Option<RuleDocs>,
    pub fixable: Option<Fixable>,
    pub schema: Option<RuleSchema>,
}

/// Builds a rule's visitor for one run. Receives the per-run context and
/// returns the listeners to wire into the traversal, or fails if the rule
/// cannot start (the engine reports the failure against the rule).
pub type RuleFactory =
    dyn Fn(Rc<RuleContext>) -> RuleResult<RuleVisitor> + Send + Sync;

/// A registered rule: metadata plus the factory that instantiates it.
pub struct RuleDefinition {
    pub meta: RuleMeta,
    create: Box<RuleFactory>,
}

impl RuleDefinition {
    /// A bare rule with no metadata, the legacy shape.
    pub fn new<F>(create: F) -> Self
    where
        F: Fn(Rc<RuleContext>) -> RuleResult<RuleVisitor> + Send + Sync + 'static,
    {
        Self {
            meta: RuleMeta::default(),
            create: Box::new(create),
        }
    }

    pub fn with_meta<F>(meta: RuleMeta, create: F) -> Self
    where
        F: Fn(Rc<RuleContext>) -> RuleResult<RuleVisitor> + Send + Sync + 'static,
    {
        Self {
            meta,
            create: Box::new(create),
        }
    }

    /// Instantiates the rule for a run.
    pub fn create(&self, context: Rc<RuleContext>) -> RuleResult<RuleVisitor> {
        (self.create)(context)
    }

    /// The schema applied to this rule's options.
    ///
    /// `None` means the rule accepts no options at all: a missing schema and
    /// an empty positional list are equivalent. Object schemas come back
    /// unmodified; positional lists are wrapped into an array schema capped
    /// at the slot count.
    #[must_use]
    pub fn options_schema(&self) -> Option<Cow<'_, Value>> {
        match &self.meta.schema {
            None => None,
            Some(RuleSchema::Positional(slots)) if slots.is_empty() => None,
            Some(RuleSchema::Positional(slots)) => Some(Cow::Owned(json!({
                "type": "array",
                "items": slots,
                "minItems": 0,
                "maxItems": slots.len(),
            }))),
            Some(RuleSchema::Object(schema)) => Some(Cow::Borrowed(schema)),
        }
    }
}

impl fmt::Debug for RuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDefinition")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// Whether a listener fires when a node is entered or after its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Enter,
    Exit,
}

/// A listener key: a node kind plus the traversal phase, written
/// `"Kind"` or `"Kind:exit"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Selector {
    pub kind: String,
    pub phase: Phase,
}

impl Selector {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.strip_suffix(":exit") {
            Some(kind) => Self::exit(kind),
            None => Self::enter(raw),
        }
    }

    #[must_use]
    pub fn enter(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            phase: Phase::Enter,
        }
    }

    #[must_use]
    pub fn exit(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            phase: Phase::Exit,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            Phase::Enter => write!(f, "{}", self.kind),
            Phase::Exit => write!(f, "{}:exit", self.kind),
        }
    }
}

type Listener = Box<dyn FnMut(&crate::SyntaxNode) -> RuleResult<()>>;

/// The listeners one rule wires into a traversal. At most one listener per
/// selector; registering a selector twice keeps the later listener.
#[derive(Default)]
pub struct RuleVisitor {
    listeners: BTreeMap<Selector, Listener>,
}

impl RuleVisitor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for `selector` (`"Kind"` or `"Kind:exit"`).
    #[must_use]
    pub fn on<F>(mut self, selector: &str, listener: F) -> Self
    where
        F: FnMut(&crate::SyntaxNode) -> RuleResult<()> + 'static,
    {
        self.listeners
            .insert(Selector::parse(selector), Box::new(listener));
        self
    }

    /// Invokes the listener for `selector`, if any.
    pub(crate) fn notify(
        &mut self,
        selector: &Selector,
        node: &crate::SyntaxNode,
    ) -> RuleResult<()> {
        match self.listeners.get_mut(selector) {
            Some(listener) => listener(node),
            None => Ok(()),
        }
    }

    /// The selectors this visitor listens on, in sorted order.
    #[must_use]
    pub fn selectors(&self) -> Vec<String> {
        self.listeners.keys().map(ToString::to_string).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for RuleVisitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleVisitor")
            .field("selectors", &self.selectors())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estree_syntax::SyntaxNode;
    use estree_types::{OffsetRange, Range};
    use std::cell::Cell;

    fn node(kind: &str) -> SyntaxNode {
        SyntaxNode::new(kind, OffsetRange::default(), Range::default())
    }

    #[test]
    fn test_selector_parse_enter() {
        let selector = Selector::parse("EmptyStatement");
        assert_eq!(selector.kind, "EmptyStatement");
        assert_eq!(selector.phase, Phase::Enter);
        assert_eq!(selector.to_string(), "EmptyStatement");
    }

    #[test]
    fn test_selector_parse_exit() {
        let selector = Selector::parse("BlockStatement:exit");
        assert_eq!(selector.kind, "BlockStatement");
        assert_eq!(selector.phase, Phase::Exit);
        assert_eq!(selector.to_string(), "BlockStatement:exit");
    }

    fn rule_with_schema(schema: Option<RuleSchema>) -> RuleDefinition {
        RuleDefinition::with_meta(
            RuleMeta {
                schema,
                ..Default::default()
            },
            |_| Ok(RuleVisitor::new()),
        )
    }

    #[test]
    fn test_positional_schema_wraps_into_capped_array() {
        let rule = rule_with_schema(Some(RuleSchema::Positional(vec![
            json!({ "enum": ["always", "never"] }),
        ])));
        assert_eq!(
            rule.options_schema().unwrap().as_ref(),
            &json!({
                "type": "array",
                "items": [{ "enum": ["always", "never"] }],
                "minItems": 0,
                "maxItems": 1,
            })
        );
    }

    #[test]
    fn test_empty_positional_schema_means_no_options() {
        let rule = rule_with_schema(Some(RuleSchema::Positional(Vec::new())));
        assert!(rule.options_schema().is_none());
        assert!(rule_with_schema(None).options_schema().is_none());
    }

    #[test]
    fn test_object_schema_is_left_alone() {
        let raw = json!({ "enum": ["always", "never"] });
        let rule = rule_with_schema(Some(RuleSchema::Object(raw.clone())));
        assert!(matches!(rule.options_schema(), Some(Cow::Borrowed(_))));
        assert_eq!(rule.options_schema().unwrap().as_ref(), &raw);
    }

    #[test]
    fn test_visitor_notifies_matching_selector_only() {
        let hits = Rc::new(Cell::new(0));
        let seen = Rc::clone(&hits);
        let mut visitor = RuleVisitor::new().on("DebuggerStatement", move |_| {
            seen.set(seen.get() + 1);
            Ok(())
        });

        let node = node("DebuggerStatement");
        visitor
            .notify(&Selector::enter("DebuggerStatement"), &node)
            .unwrap();
        visitor
            .notify(&Selector::exit("DebuggerStatement"), &node)
            .unwrap();
        visitor
            .notify(&Selector::enter("EmptyStatement"), &node)
            .unwrap();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_visitor_duplicate_selector_keeps_last_listener() {
        let hits = Rc::new(Cell::new(0));
        let first = Rc::clone(&hits);
        let second = Rc::clone(&hits);
        let mut visitor = RuleVisitor::new()
            .on("Program", move |_| {
                first.set(first.get() + 1);
                Ok(())
            })
            .on("Program", move |_| {
                second.set(second.get() + 10);
                Ok(())
            });

        visitor
            .notify(&Selector::enter("Program"), &node("Program"))
            .unwrap();
        assert_eq!(hits.get(), 10);
    }
}

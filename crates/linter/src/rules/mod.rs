//! Built-in rules, one file per rule.
//!
//! Each file exposes a `rule()` constructor returning the definition:
//! metadata (docs, fixability, options schema) plus the factory that wires
//! listeners into a traversal. [`builtin_rules`] is the canonical list the
//! default registry loads from.

use crate::rule::RuleDefinition;
use std::sync::{Arc, LazyLock};

mod eqeqeq;
mod id_match;
mod max_depth;
mod no_debugger;
mod no_empty;
mod no_warning_comments;
mod semi;

static BUILTIN_RULES: LazyLock<Vec<(&'static str, Arc<RuleDefinition>)>> = LazyLock::new(|| {
    vec![
        ("eqeqeq", Arc::new(eqeqeq::rule())),
        ("id-match", Arc::new(id_match::rule())),
        ("max-depth", Arc::new(max_depth::rule())),
        ("no-debugger", Arc::new(no_debugger::rule())),
        ("no-empty", Arc::new(no_empty::rule())),
        ("no-warning-comments", Arc::new(no_warning_comments::rule())),
        ("semi", Arc::new(semi::rule())),
    ]
});

/// Every rule that ships with the analyzer, in rule-id order.
pub fn builtin_rules() -> &'static [(&'static str, Arc<RuleDefinition>)] {
    &BUILTIN_RULES
}

//! Registry of available rules.

use crate::rule::RuleDefinition;
use crate::rules::builtin_rules;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registered rules, keyed by rule id.
///
/// Later definitions under an existing id silently replace the earlier one,
/// so callers can shadow a builtin rule with their own variant.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: BTreeMap<String, Arc<RuleDefinition>>,
}

impl RuleRegistry {
    /// An empty registry with no rules at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry preloaded with the builtin rules.
    #[must_use]
    pub fn with_builtin_rules() -> Self {
        let mut registry = Self::default();
        for (id, rule) in builtin_rules() {
            registry.rules.insert((*id).to_string(), Arc::clone(rule));
        }
        registry
    }

    pub fn define(&mut self, id: impl Into<String>, rule: RuleDefinition) {
        self.rules.insert(id.into(), Arc::new(rule));
    }

    /// Looks up a rule. The returned handle stays valid even if the id is
    /// later redefined, so an in-flight run keeps the definition it started
    /// with.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<RuleDefinition>> {
        self.rules.get(id).map(Arc::clone)
    }

    #[must_use]
    pub fn has(&self, id: &str) -> bool {
        self.rules.contains_key(id)
    }

    /// Rule ids in lexical order.
    #[must_use]
    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).collect()
    }
}

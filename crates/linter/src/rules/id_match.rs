use crate::error::RuleError;
use crate::rule::{RuleDefinition, RuleDocs, RuleMeta, RuleSchema, RuleVisitor};
use regex::Regex;
use serde_json::{json, Value};
use std::rc::Rc;

/// `id-match`: require identifiers to match a configured regular expression.
///
/// The pattern compiles when the rule instantiates; an invalid pattern fails
/// the rule for the whole run instead of erroring on every identifier.
pub(crate) fn rule() -> RuleDefinition {
    RuleDefinition::with_meta(
        RuleMeta {
            docs: Some(RuleDocs {
                description: "require identifiers to match a specified regular expression"
                    .to_string(),
                category: "Stylistic Issues".to_string(),
                recommended: false,
            }),
            fixable: None,
            schema: Some(RuleSchema::Positional(vec![json!({ "type": "string" })])),
        },
        |context| {
            let pattern = context
                .option(0)
                .and_then(Value::as_str)
                .unwrap_or("^.+$")
                .to_string();
            let matcher = Regex::new(&pattern).map_err(|_| {
                RuleError::new(format!(
                    "pattern '{pattern}' is not a valid regular expression"
                ))
            })?;

            let reporter = Rc::clone(&context);
            Ok(RuleVisitor::new().on("Identifier", move |node| {
                if let Some(name) = node.attr_str("name") {
                    if !matcher.is_match(name) {
                        reporter.report_with_data(
                            node,
                            "Identifier '{{name}}' does not match the pattern '{{pattern}}'.",
                            &[("name", name), ("pattern", &pattern)],
                        );
                    }
                }
                Ok(())
            }))
        },
    )
}

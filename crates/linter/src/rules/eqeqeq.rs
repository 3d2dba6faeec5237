use crate::context::RuleContext;
use crate::rule::{Fixable, RuleDefinition, RuleDocs, RuleMeta, RuleSchema, RuleVisitor};
use estree_syntax::SyntaxNode;
use estree_types::{Fix, OffsetRange};
use serde_json::{json, Value};
use std::rc::Rc;

/// `eqeqeq`: require `===` and `!==` over the type-coercing `==` and `!=`.
///
/// In `"smart"` mode comparisons that cannot coerce are tolerated: both
/// operands literals of the same type, a `typeof` on either side, or a
/// comparison against `null`.
pub(crate) fn rule() -> RuleDefinition {
    RuleDefinition::with_meta(
        RuleMeta {
            docs: Some(RuleDocs {
                description: "require the use of `===` and `!==`".to_string(),
                category: "Best Practices".to_string(),
                recommended: false,
            }),
            fixable: Some(Fixable::Code),
            schema: Some(RuleSchema::Positional(vec![json!({
                "enum": ["always", "smart"]
            })])),
        },
        |context| {
            let smart = matches!(context.option(0).and_then(Value::as_str), Some("smart"));
            let reporter = Rc::clone(&context);
            Ok(RuleVisitor::new().on("BinaryExpression", move |node| {
                let Some(operator) = node.attr_str("operator") else {
                    return Ok(());
                };
                let expected = match operator {
                    "==" => "===",
                    "!=" => "!==",
                    _ => return Ok(()),
                };

                let operands = (node.children.first(), node.children.get(1));
                if smart {
                    if let (Some(left), Some(right)) = operands {
                        if is_coercion_free(left, right) {
                            return Ok(());
                        }
                    }
                }

                let message = format!("Expected '{expected}' and instead saw '{operator}'.");
                let located = operands.0.zip(operands.1).and_then(|(left, right)| {
                    locate_operator(&reporter, left, right, operator)
                });
                if let Some((offset, safe_sides)) = located {
                    let position = reporter.source().position_at(offset);
                    if safe_sides {
                        let fix = Fix::replace(offset, offset + operator.len(), expected);
                        reporter.report_at_with_fix(node, position, message, fix);
                    } else {
                        reporter.report_at(node, position, message);
                    }
                } else {
                    reporter.report(node, message);
                }
                Ok(())
            }))
        },
    )
}

/// Finds the operator's byte offset between the operand spans, and whether a
/// textual swap to the strict operator is behavior-preserving.
fn locate_operator(
    context: &RuleContext,
    left: &SyntaxNode,
    right: &SyntaxNode,
    operator: &str,
) -> Option<(usize, bool)> {
    let gap = OffsetRange::new(left.range.end(), right.range.start());
    let offset = context.source().slice(gap).find(operator)?;
    let safe = is_typeof(left) || is_typeof(right) || same_type_literals(left, right);
    Some((left.range.end() + offset, safe))
}

fn is_coercion_free(left: &SyntaxNode, right: &SyntaxNode) -> bool {
    is_typeof(left)
        || is_typeof(right)
        || same_type_literals(left, right)
        || is_null(left)
        || is_null(right)
}

fn is_typeof(node: &SyntaxNode) -> bool {
    node.kind == "UnaryExpression" && node.attr_str("operator") == Some("typeof")
}

fn is_null(node: &SyntaxNode) -> bool {
    node.kind == "Literal" && node.attr("value") == Some(&Value::Null)
}

fn same_type_literals(left: &SyntaxNode, right: &SyntaxNode) -> bool {
    if left.kind != "Literal" || right.kind != "Literal" {
        return false;
    }
    matches!(
        (left.attr("value"), right.attr("value")),
        (Some(Value::String(_)), Some(Value::String(_)))
            | (Some(Value::Number(_)), Some(Value::Number(_)))
            | (Some(Value::Bool(_)), Some(Value::Bool(_)))
            | (Some(Value::Null), Some(Value::Null))
    )
}

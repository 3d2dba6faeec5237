use crate::context::RuleContext;
use crate::rule::{RuleDefinition, RuleDocs, RuleMeta, RuleSchema, RuleVisitor};
use estree_syntax::SyntaxNode;
use serde::Deserialize;
use serde_json::json;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Options for `no-empty`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct NoEmptyOptions {
    /// Permit `catch` clauses with an empty body.
    allow_empty_catch: bool,
}

impl NoEmptyOptions {
    fn from_context(context: &RuleContext) -> Self {
        context
            .option(0)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }
}

/// `no-empty`: disallow empty block statements and empty `switch` bodies.
///
/// Function bodies are always exempt, and a block counts as non-empty when
/// it contains a comment (intentionally-empty blocks are documented that
/// way).
pub(crate) fn rule() -> RuleDefinition {
    RuleDefinition::with_meta(
        RuleMeta {
            docs: Some(RuleDocs {
                description: "disallow empty block statements".to_string(),
                category: "Possible Errors".to_string(),
                recommended: true,
            }),
            fixable: None,
            schema: Some(RuleSchema::Positional(vec![json!({
                "type": "object",
                "properties": {
                    "allowEmptyCatch": { "type": "boolean" }
                },
                "additionalProperties": false
            })])),
        },
        |context| {
            let options = NoEmptyOptions::from_context(&context);
            // Body blocks of functions and catch clauses, recorded on the
            // parent's enter so they are known before the block itself
            // enters.
            let function_bodies = Rc::new(RefCell::new(HashSet::new()));
            let catch_bodies = Rc::new(RefCell::new(HashSet::new()));

            let mut visitor = RuleVisitor::new();
            for kind in [
                "FunctionDeclaration",
                "FunctionExpression",
                "ArrowFunctionExpression",
            ] {
                let bodies = Rc::clone(&function_bodies);
                visitor = visitor.on(kind, move |node| {
                    record_block_children(node, &mut bodies.borrow_mut());
                    Ok(())
                });
            }

            let bodies = Rc::clone(&catch_bodies);
            visitor = visitor.on("CatchClause", move |node| {
                record_block_children(node, &mut bodies.borrow_mut());
                Ok(())
            });

            let reporter = Rc::clone(&context);
            visitor = visitor.on("BlockStatement", move |node| {
                if !node.children.is_empty() {
                    return Ok(());
                }
                let span = (node.range.start(), node.range.end());
                if function_bodies.borrow().contains(&span) {
                    return Ok(());
                }
                if options.allow_empty_catch && catch_bodies.borrow().contains(&span) {
                    return Ok(());
                }
                if has_comment_inside(&reporter, node) {
                    return Ok(());
                }
                reporter.report_with_data(node, "Empty {{type}} statement.", &[("type", "block")]);
                Ok(())
            });

            let reporter = Rc::clone(&context);
            visitor = visitor.on("SwitchStatement", move |node| {
                if !node.children.iter().any(|child| child.kind == "SwitchCase") {
                    reporter.report_with_data(
                        node,
                        "Empty {{type}} statement.",
                        &[("type", "switch")],
                    );
                }
                Ok(())
            });

            Ok(visitor)
        },
    )
}

fn record_block_children(parent: &SyntaxNode, spans: &mut HashSet<(usize, usize)>) {
    for child in &parent.children {
        if child.kind == "BlockStatement" {
            spans.insert((child.range.start(), child.range.end()));
        }
    }
}

fn has_comment_inside(context: &RuleContext, node: &SyntaxNode) -> bool {
    context.comments().any(|comment| {
        comment.range.start() >= node.range.start() && comment.range.end() <= node.range.end()
    })
}

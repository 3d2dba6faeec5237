use crate::context::RuleContext;
use crate::rule::{Fixable, RuleDefinition, RuleDocs, RuleMeta, RuleSchema, RuleVisitor};
use estree_syntax::SyntaxNode;
use estree_types::Fix;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Statement kinds a semicolon check applies to.
const STATEMENT_KINDS: [&str; 5] = [
    "ExpressionStatement",
    "VariableDeclaration",
    "ReturnStatement",
    "ThrowStatement",
    "DebuggerStatement",
];

/// Loop heads whose `var` declarations carry no semicolon of their own.
const LOOP_KINDS: [&str; 3] = ["ForStatement", "ForInStatement", "ForOfStatement"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SemiStyle {
    #[default]
    Always,
    Never,
}

impl SemiStyle {
    fn from_context(context: &RuleContext) -> Self {
        match context.option(0).and_then(Value::as_str) {
            Some("never") => Self::Never,
            _ => Self::Always,
        }
    }
}

/// `semi`: require (`"always"`, the default) or forbid (`"never"`) trailing
/// semicolons on statements. Both directions suggest a fix.
pub(crate) fn rule() -> RuleDefinition {
    RuleDefinition::with_meta(
        RuleMeta {
            docs: Some(RuleDocs {
                description: "require or disallow semicolons instead of ASI".to_string(),
                category: "Stylistic Issues".to_string(),
                recommended: false,
            }),
            fixable: Some(Fixable::Code),
            schema: Some(RuleSchema::Positional(vec![json!({
                "enum": ["always", "never"]
            })])),
        },
        |context| {
            let style = SemiStyle::from_context(&context);
            // Declarations in loop heads (`for (var i = 0; ...)`) end at the
            // head's own punctuation; recorded on the loop's enter.
            let loop_declarations = Rc::new(RefCell::new(HashSet::new()));

            let mut visitor = RuleVisitor::new();
            for kind in LOOP_KINDS {
                let declarations = Rc::clone(&loop_declarations);
                visitor = visitor.on(kind, move |node| {
                    for child in &node.children {
                        if child.kind == "VariableDeclaration" {
                            declarations
                                .borrow_mut()
                                .insert((child.range.start(), child.range.end()));
                        }
                    }
                    Ok(())
                });
            }

            for kind in STATEMENT_KINDS {
                let reporter = Rc::clone(&context);
                let declarations = Rc::clone(&loop_declarations);
                visitor = visitor.on(kind, move |node| {
                    let span = (node.range.start(), node.range.end());
                    if node.kind == "VariableDeclaration"
                        && declarations.borrow().contains(&span)
                    {
                        return Ok(());
                    }
                    check_semicolon(&reporter, node, style);
                    Ok(())
                });
            }

            Ok(visitor)
        },
    )
}

fn check_semicolon(context: &RuleContext, node: &SyntaxNode, style: SemiStyle) {
    let end = node.range.end();
    let has_semicolon = context.source().slice(node.range).ends_with(';');
    match style {
        SemiStyle::Always => {
            if !has_semicolon {
                context.report_at_with_fix(
                    node,
                    context.source().position_at(end),
                    "Missing semicolon.",
                    Fix::insert(end, ";"),
                );
            }
        }
        SemiStyle::Never => {
            if has_semicolon {
                context.report_at_with_fix(
                    node,
                    context.source().position_at(end - 1),
                    "Extra semicolon.",
                    Fix::remove(end - 1, end),
                );
            }
        }
    }
}

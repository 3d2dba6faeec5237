use crate::context::RuleContext;
use crate::rule::{RuleDefinition, RuleDocs, RuleMeta, RuleSchema, RuleVisitor};
use estree_syntax::SyntaxNode;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

const DEFAULT_MAX: u64 = 4;

/// Function kinds each start their own depth count at zero.
const FUNCTION_KINDS: [&str; 3] = [
    "FunctionDeclaration",
    "FunctionExpression",
    "ArrowFunctionExpression",
];

/// Statement kinds that nest. `IfStatement` is handled separately because an
/// `else if` chain stays at the depth of its head `if`.
const NESTING_KINDS: [&str; 8] = [
    "SwitchStatement",
    "TryStatement",
    "DoWhileStatement",
    "WhileStatement",
    "WithStatement",
    "ForStatement",
    "ForInStatement",
    "ForOfStatement",
];

fn max_from_context(context: &RuleContext) -> u64 {
    match context.option(0) {
        Some(Value::Number(value)) => value.as_u64().unwrap_or(DEFAULT_MAX),
        Some(Value::Object(map)) => map
            .get("maximum")
            .or_else(|| map.get("max"))
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_MAX),
        _ => DEFAULT_MAX,
    }
}

/// `max-depth`: limit how deeply block statements nest inside a function.
pub(crate) fn rule() -> RuleDefinition {
    RuleDefinition::with_meta(
        RuleMeta {
            docs: Some(RuleDocs {
                description: "enforce a maximum depth that blocks can be nested".to_string(),
                category: "Stylistic Issues".to_string(),
                recommended: false,
            }),
            fixable: None,
            schema: Some(RuleSchema::Positional(vec![json!({
                "oneOf": [
                    { "type": "integer", "minimum": 0 },
                    {
                        "type": "object",
                        "properties": {
                            "maximum": { "type": "integer", "minimum": 0 },
                            "max": { "type": "integer", "minimum": 0 }
                        },
                        "additionalProperties": false
                    }
                ]
            })])),
        },
        |context| {
            let max = max_from_context(&context);
            // One depth counter per enclosing function; the root of the file
            // counts as the outermost frame.
            let frames = Rc::new(RefCell::new(vec![0_u64]));
            // Ifs that are a direct child of another if (`else if` chains and
            // unbraced `if (a) if (b)`) share their parent's depth.
            let chained_ifs = Rc::new(RefCell::new(HashSet::new()));

            let mut visitor = RuleVisitor::new();
            for kind in FUNCTION_KINDS {
                let stack = Rc::clone(&frames);
                visitor = visitor.on(kind, move |_| {
                    stack.borrow_mut().push(0);
                    Ok(())
                });
                let stack = Rc::clone(&frames);
                visitor = visitor.on(&format!("{kind}:exit"), move |_| {
                    stack.borrow_mut().pop();
                    Ok(())
                });
            }

            for kind in NESTING_KINDS {
                let stack = Rc::clone(&frames);
                let reporter = Rc::clone(&context);
                visitor = visitor.on(kind, move |node| {
                    enter_block(&reporter, &mut stack.borrow_mut(), node, max);
                    Ok(())
                });
                let stack = Rc::clone(&frames);
                visitor = visitor.on(&format!("{kind}:exit"), move |_| {
                    leave_block(&mut stack.borrow_mut());
                    Ok(())
                });
            }

            let stack = Rc::clone(&frames);
            let chained = Rc::clone(&chained_ifs);
            let reporter = Rc::clone(&context);
            visitor = visitor.on("IfStatement", move |node| {
                let mut chained = chained.borrow_mut();
                for child in &node.children {
                    if child.kind == "IfStatement" {
                        chained.insert((child.range.start(), child.range.end()));
                    }
                }
                if !chained.contains(&(node.range.start(), node.range.end())) {
                    enter_block(&reporter, &mut stack.borrow_mut(), node, max);
                }
                Ok(())
            });

            let stack = Rc::clone(&frames);
            let chained = Rc::clone(&chained_ifs);
            visitor = visitor.on("IfStatement:exit", move |node| {
                if !chained
                    .borrow()
                    .contains(&(node.range.start(), node.range.end()))
                {
                    leave_block(&mut stack.borrow_mut());
                }
                Ok(())
            });

            Ok(visitor)
        },
    )
}

fn enter_block(context: &RuleContext, frames: &mut [u64], node: &SyntaxNode, max: u64) {
    let Some(depth) = frames.last_mut() else {
        return;
    };
    *depth += 1;
    if *depth > max {
        context.report_with_data(
            node,
            "Blocks are nested too deeply ({{depth}}).",
            &[("depth", &depth.to_string())],
        );
    }
}

fn leave_block(frames: &mut [u64]) {
    if let Some(depth) = frames.last_mut() {
        *depth = depth.saturating_sub(1);
    }
}

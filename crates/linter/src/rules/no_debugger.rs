use crate::rule::{RuleDefinition, RuleDocs, RuleMeta, RuleSchema, RuleVisitor};
use std::rc::Rc;

/// `no-debugger`: disallow `debugger` statements.
///
/// A `debugger` statement halts execution whenever developer tools are open,
/// so one left behind in committed code is always a mistake.
pub(crate) fn rule() -> RuleDefinition {
    RuleDefinition::with_meta(
        RuleMeta {
            docs: Some(RuleDocs {
                description: "disallow the use of `debugger`".to_string(),
                category: "Possible Errors".to_string(),
                recommended: true,
            }),
            fixable: None,
            schema: Some(RuleSchema::Positional(Vec::new())),
        },
        |context| {
            let reporter = Rc::clone(&context);
            Ok(RuleVisitor::new().on("DebuggerStatement", move |node| {
                reporter.report(node, "Unexpected 'debugger' statement.");
                Ok(())
            }))
        },
    )
}

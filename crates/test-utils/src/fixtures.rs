//! Canned files for integration tests that don't care about tree shape.

use crate::builder::TreeBuilder;
use estree_syntax::SourceFile;

/// `debugger;` as a single debugger statement.
#[must_use]
pub fn debugger_program() -> SourceFile {
    let builder = TreeBuilder::new("debugger;");
    let root = builder
        .node("Program", 0, 9)
        .with_child(builder.node("DebuggerStatement", 0, 9));
    builder.file(root, Vec::new())
}

/// `debugger;` twice, on two lines.
#[must_use]
pub fn double_debugger_program() -> SourceFile {
    let builder = TreeBuilder::new("debugger;\ndebugger;");
    let root = builder
        .node("Program", 0, 19)
        .with_child(builder.node("DebuggerStatement", 0, 9))
        .with_child(builder.node("DebuggerStatement", 10, 19));
    builder.file(root, Vec::new())
}

/// `foo();` as a call that is clean under every builtin rule's defaults.
#[must_use]
pub fn call_program() -> SourceFile {
    let builder = TreeBuilder::new("foo();");
    let root = builder.node("Program", 0, 6).with_child(
        builder.node("ExpressionStatement", 0, 6).with_child(
            builder
                .node("CallExpression", 0, 5)
                .with_child(builder.node("Identifier", 0, 3).with_attr("name", "foo")),
        ),
    );
    builder.file(root, Vec::new())
}

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use estree_linter::Linter;
use estree_syntax::{file_from_estree, SourceFile};
use serde_json::{json, Value};

/// Builds a program of `count` `debugger;` statements, one per line.
fn debugger_program(count: usize) -> SourceFile {
    let mut source = String::new();
    let mut body = Vec::new();
    for _ in 0..count {
        let start = source.len();
        source.push_str("debugger;\n");
        body.push(json!({
            "type": "DebuggerStatement",
            "range": [start, start + 9]
        }));
    }
    program(&source, body)
}

/// Builds a program of `count` clean `a === b;` statements that no builtin
/// rule reports on, to measure pure traversal and dispatch cost.
fn clean_program(count: usize) -> SourceFile {
    let mut source = String::new();
    let mut body = Vec::new();
    for _ in 0..count {
        let start = source.len();
        source.push_str("a === b;\n");
        body.push(json!({
            "type": "ExpressionStatement",
            "range": [start, start + 8],
            "expression": {
                "type": "BinaryExpression",
                "range": [start, start + 7],
                "operator": "===",
                "left": { "type": "Identifier", "range": [start, start + 1], "name": "a" },
                "right": { "type": "Identifier", "range": [start + 6, start + 7], "name": "b" }
            }
        }));
    }
    program(&source, body)
}

/// Builds a program where every fourth line trips a different builtin rule:
/// a debugger statement, a loose equality, an empty block, and a declaration
/// missing its semicolon.
fn mixed_program(units: usize) -> SourceFile {
    let mut source = String::new();
    let mut body = Vec::new();
    for _ in 0..units {
        let s = source.len();
        source.push_str("debugger;\n");
        body.push(json!({
            "type": "DebuggerStatement",
            "range": [s, s + 9]
        }));

        let s = source.len();
        source.push_str("a == b;\n");
        body.push(json!({
            "type": "ExpressionStatement",
            "range": [s, s + 7],
            "expression": {
                "type": "BinaryExpression",
                "range": [s, s + 6],
                "operator": "==",
                "left": { "type": "Identifier", "range": [s, s + 1], "name": "a" },
                "right": { "type": "Identifier", "range": [s + 5, s + 6], "name": "b" }
            }
        }));

        let s = source.len();
        source.push_str("if (x) {}\n");
        body.push(json!({
            "type": "IfStatement",
            "range": [s, s + 9],
            "test": { "type": "Identifier", "range": [s + 4, s + 5], "name": "x" },
            "consequent": { "type": "BlockStatement", "range": [s + 7, s + 9] }
        }));

        let s = source.len();
        source.push_str("var x = 1\n");
        body.push(json!({
            "type": "VariableDeclaration",
            "range": [s, s + 9],
            "declarations": [{
                "type": "VariableDeclarator",
                "range": [s + 4, s + 9],
                "id": { "type": "Identifier", "range": [s + 4, s + 5], "name": "x" },
                "init": { "type": "Literal", "range": [s + 8, s + 9], "value": 1 }
            }]
        }));
    }
    program(&source, body)
}

fn program(source: &str, body: Vec<Value>) -> SourceFile {
    let root = json!({
        "type": "Program",
        "range": [0, source.len()],
        "body": body
    });
    file_from_estree(source, &root).expect("synthetic program is well formed")
}

fn all_rules_config() -> Value {
    json!({
        "rules": {
            "eqeqeq": "error",
            "id-match": ["error", "^[a-z]+$"],
            "max-depth": ["error", 4],
            "no-debugger": "error",
            "no-empty": "error",
            "no-warning-comments": "warn",
            "semi": ["error", "always"]
        }
    })
}

/// Verification benchmarks
fn bench_verify_single_rule(c: &mut Criterion) {
    c.bench_function("verify_single_rule", |b| {
        // Setup: one linter and file shared across iterations
        let linter = Linter::new();
        let file = debugger_program(200);
        let config = json!({ "rules": { "no-debugger": "error" } });

        b.iter_batched(
            || file.clone(),
            |file| black_box(linter.verify(file, &config, None)),
            BatchSize::SmallInput,
        );
    });
}

fn bench_verify_all_builtins(c: &mut Criterion) {
    c.bench_function("verify_all_builtins", |b| {
        // Setup: every builtin rule enabled, every fourth line reports
        let linter = Linter::new();
        let file = mixed_program(50);
        let config = all_rules_config();

        b.iter_batched(
            || file.clone(),
            |file| black_box(linter.verify(file, &config, None)),
            BatchSize::SmallInput,
        );
    });
}

fn bench_verify_clean_file(c: &mut Criterion) {
    c.bench_function("verify_clean_file", |b| {
        // Setup: every builtin rule enabled but nothing to report, so the
        // measurement is dominated by traversal and listener dispatch
        let linter = Linter::new();
        let file = clean_program(200);
        let config = all_rules_config();

        b.iter_batched(
            || file.clone(),
            |file| black_box(linter.verify(file, &config, None)),
            BatchSize::SmallInput,
        );
    });
}

/// Configuration benchmarks
fn bench_config_validation(c: &mut Criterion) {
    c.bench_function("config_validation", |b| {
        // Setup: a configuration exercising env, overrides, and rule schemas
        let linter = Linter::new();
        let config = json!({
            "root": true,
            "env": { "es6": true, "node": true },
            "rules": all_rules_config()["rules"],
            "overrides": [{
                "files": ["*.test.js"],
                "rules": { "no-debugger": "off" }
            }]
        });

        b.iter(|| {
            // Measure: full validation against the builtin registries
            black_box(estree_linter::validate(
                &config,
                None,
                |id| linter.rules().get(id),
                linter.environments(),
            ))
        });
    });
}

fn bench_linter_construction(c: &mut Criterion) {
    c.bench_function("linter_construction", |b| {
        b.iter(|| {
            // Measure: registry assembly for the builtin rules and envs
            black_box(Linter::new())
        });
    });
}

criterion_group!(
    benches,
    bench_verify_single_rule,
    bench_verify_all_builtins,
    bench_verify_clean_file,
    bench_config_validation,
    bench_linter_construction,
);

criterion_main!(benches);

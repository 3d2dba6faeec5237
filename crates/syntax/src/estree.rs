//! Ingestion of ESTree-style JSON parser output.
//!
//! The analyzer does not parse source itself; an external parser hands it a
//! JSON document in the ESTree shape (nodes are objects with a `type` field,
//! spans as `range: [start, end]` or `start`/`end`, optional `loc`, and
//! `tokens`/`comments` arrays on the program node). This module converts that
//! output into [`SyntaxNode`]s and [`Token`]s.

use estree_types::{OffsetRange, Range};
use serde_json::Value;

use crate::{Result, SourceFile, SourceText, SyntaxError, SyntaxNode, SyntaxTree, Token};

/// Node object fields that are structural rather than attributes.
const STRUCTURAL_FIELDS: [&str; 7] = ["type", "range", "start", "end", "loc", "tokens", "comments"];

/// Build a [`SourceFile`] from source text and the parser's JSON output
/// (the program node, optionally carrying `tokens` and `comments` arrays).
pub fn file_from_estree(text: &str, program: &Value) -> Result<SourceFile> {
    let source = SourceText::new(text);
    let root = node_from_value(program, &source)?;

    let mut tokens = Vec::new();
    for field in ["tokens", "comments"] {
        if let Some(list) = program.get(field).and_then(Value::as_array) {
            for token in list {
                tokens.push(token_from_value(token, &source)?);
            }
        }
    }
    tokens.sort_by_key(|token| token.range.start());

    Ok(SourceFile::new(source, SyntaxTree::new(root, tokens)))
}

/// Convert one ESTree JSON node (and its descendants) into a [`SyntaxNode`].
///
/// Object-valued fields with a `type` string become children, as do such
/// objects inside array-valued fields; everything else becomes an attribute.
/// Children are ordered by source position, so traversal order does not
/// depend on JSON key order. `null` fields (absent optional children) are
/// dropped. Spans are checked against the source on the way in: inverted,
/// out-of-range, or mid-character offsets are rejected.
pub fn node_from_value(value: &Value, source: &SourceText) -> Result<SyntaxNode> {
    let Some(object) = value.as_object() else {
        return Err(SyntaxError::NotAnObject(value.to_string()));
    };
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(SyntaxError::MissingNodeType)?
        .to_string();
    let range = span_of(object).ok_or_else(|| SyntaxError::MissingSpan(kind.clone()))?;
    check_span(&kind, range, source)?;
    let loc = match object.get("loc") {
        Some(loc) => parse_loc(loc).ok_or_else(|| SyntaxError::MalformedField {
            kind: kind.clone(),
            field: "loc".to_string(),
        })?,
        None => Range::new(
            source.position_at(range.start()),
            source.position_at(range.end()),
        ),
    };

    let mut node = SyntaxNode::new(kind, range, loc);
    for (name, field) in object {
        if STRUCTURAL_FIELDS.contains(&name.as_str()) || field.is_null() {
            continue;
        }
        if is_node_value(field) {
            node.children.push(node_from_value(field, source)?);
        } else if let Some(items) = field.as_array() {
            if items.iter().any(is_node_value) {
                for item in items.iter().filter(|item| is_node_value(item)) {
                    node.children.push(node_from_value(item, source)?);
                }
            } else if !items.is_empty() {
                node.attrs.insert(name.clone(), field.clone());
            }
        } else {
            node.attrs.insert(name.clone(), field.clone());
        }
    }
    node.children.sort_by_key(|child| child.range.start());
    Ok(node)
}

fn token_from_value(value: &Value, source: &SourceText) -> Result<Token> {
    let Some(object) = value.as_object() else {
        return Err(SyntaxError::NotAnObject(value.to_string()));
    };
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(SyntaxError::MissingNodeType)?;
    let text = object.get("value").and_then(Value::as_str).unwrap_or("");
    let range = span_of(object).ok_or_else(|| SyntaxError::MissingSpan(kind.to_string()))?;
    check_span(kind, range, source)?;
    let loc = match object.get("loc") {
        Some(loc) => parse_loc(loc).ok_or_else(|| SyntaxError::MalformedField {
            kind: kind.to_string(),
            field: "loc".to_string(),
        })?,
        None => Range::new(
            source.position_at(range.start()),
            source.position_at(range.end()),
        ),
    };
    Ok(Token::new(kind, text, range, loc))
}

/// Returns `true` for JSON values that represent tree nodes.
fn is_node_value(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.get("type").is_some_and(Value::is_string))
}

/// Read a byte span from `range: [start, end]` or `start`/`end` fields.
fn span_of(object: &serde_json::Map<String, Value>) -> Option<OffsetRange> {
    if let Some(range) = object.get("range").and_then(Value::as_array) {
        let start = range.first().and_then(Value::as_u64)?;
        let end = range.get(1).and_then(Value::as_u64)?;
        return Some(OffsetRange::new(start as usize, end as usize));
    }
    let start = object.get("start").and_then(Value::as_u64)?;
    let end = object.get("end").and_then(Value::as_u64)?;
    Some(OffsetRange::new(start as usize, end as usize))
}

/// Spans must be ordered byte offsets on character boundaries of the
/// source; `is_char_boundary` also rules out offsets past the end.
fn check_span(kind: &str, range: OffsetRange, source: &SourceText) -> Result<()> {
    let text = source.text();
    if range.start() <= range.end()
        && text.is_char_boundary(range.start())
        && text.is_char_boundary(range.end())
    {
        Ok(())
    } else {
        Err(SyntaxError::InvalidSpan {
            kind: kind.to_string(),
            start: range.start(),
            end: range.end(),
        })
    }
}

fn parse_loc(value: &Value) -> Option<Range> {
    serde_json::from_value(value.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_program() {
        let text = "debugger;";
        let program = json!({
            "type": "Program",
            "range": [0, 9],
            "body": [
                { "type": "DebuggerStatement", "range": [0, 9] }
            ],
            "sourceType": "script"
        });

        let file = file_from_estree(text, &program).unwrap();
        let root = &file.tree.root;
        assert_eq!(root.kind, "Program");
        assert_eq!(root.attr_str("sourceType"), Some("script"));
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].kind, "DebuggerStatement");
        // loc derived from the source when absent
        assert_eq!(root.children[0].loc.start.line, 1);
        assert_eq!(root.children[0].loc.end.column, 9);
    }

    #[test]
    fn test_children_sorted_by_position() {
        let program = json!({
            "type": "BinaryExpression",
            "range": [0, 6],
            "operator": "==",
            // "left" sorts after "right" lexically in the object; source
            // order must win
            "right": { "type": "Literal", "range": [5, 6], "value": 2 },
            "left": { "type": "Identifier", "range": [0, 1], "name": "a" }
        });

        let source = SourceText::new("a == 2");
        let node = node_from_value(&program, &source).unwrap();
        assert_eq!(node.children[0].kind, "Identifier");
        assert_eq!(node.children[1].kind, "Literal");
        assert_eq!(node.attr_str("operator"), Some("=="));
    }

    #[test]
    fn test_null_fields_dropped() {
        let program = json!({
            "type": "ReturnStatement",
            "range": [0, 7],
            "argument": null
        });
        let source = SourceText::new("return;");
        let node = node_from_value(&program, &source).unwrap();
        assert!(node.is_leaf());
        assert!(node.attr("argument").is_none());
    }

    #[test]
    fn test_tokens_and_comments_merge_sorted() {
        let text = "a; // x";
        let program = json!({
            "type": "Program",
            "range": [0, 7],
            "body": [],
            "tokens": [
                { "type": "Identifier", "value": "a", "range": [0, 1] },
                { "type": "Punctuator", "value": ";", "range": [1, 2] }
            ],
            "comments": [
                { "type": "Line", "value": " x", "range": [3, 7] }
            ]
        });

        let file = file_from_estree(text, &program).unwrap();
        let kinds: Vec<&str> = file
            .tree
            .tokens
            .iter()
            .map(|token| token.kind.as_str())
            .collect();
        assert_eq!(kinds, ["Identifier", "Punctuator", "Line"]);
        assert!(file.tree.tokens[2].is_comment());
    }

    #[test]
    fn test_missing_type_is_an_error() {
        let source = SourceText::new("");
        let err = node_from_value(&json!({ "range": [0, 0] }), &source).unwrap_err();
        assert!(matches!(err, SyntaxError::MissingNodeType));
    }

    #[test]
    fn test_missing_span_is_an_error() {
        let source = SourceText::new("");
        let err = node_from_value(&json!({ "type": "Identifier" }), &source).unwrap_err();
        assert!(matches!(err, SyntaxError::MissingSpan(kind) if kind == "Identifier"));
    }

    #[test]
    fn test_inverted_span_is_an_error() {
        let program = json!({
            "type": "Program",
            "range": [0, 10],
            "body": [
                { "type": "ExpressionStatement", "range": [9, 2] }
            ]
        });
        let err = file_from_estree("foo();bar;", &program).unwrap_err();
        assert!(matches!(
            err,
            SyntaxError::InvalidSpan { kind, start: 9, end: 2 } if kind == "ExpressionStatement"
        ));
    }

    #[test]
    fn test_mid_character_span_is_an_error() {
        // "é" is two bytes; offset 1 splits it.
        let source = SourceText::new("é;");
        let err = node_from_value(
            &json!({ "type": "Identifier", "range": [0, 1], "name": "é" }),
            &source,
        )
        .unwrap_err();
        assert!(matches!(err, SyntaxError::InvalidSpan { .. }));
    }

    #[test]
    fn test_out_of_bounds_span_is_an_error() {
        let source = SourceText::new("x");
        let err = node_from_value(
            &json!({ "type": "Identifier", "range": [0, 5], "name": "x" }),
            &source,
        )
        .unwrap_err();
        assert!(matches!(err, SyntaxError::InvalidSpan { end: 5, .. }));
    }

    #[test]
    fn test_token_spans_are_checked() {
        let program = json!({
            "type": "Program",
            "range": [0, 2],
            "body": [],
            "tokens": [
                { "type": "Identifier", "value": "a", "range": [2, 0] }
            ]
        });
        let err = file_from_estree("a;", &program).unwrap_err();
        assert!(matches!(
            err,
            SyntaxError::InvalidSpan { start: 2, end: 0, .. }
        ));
    }

    #[test]
    fn test_start_end_span_form() {
        let source = SourceText::new("foo");
        let node = node_from_value(
            &json!({ "type": "Identifier", "start": 0, "end": 3, "name": "foo" }),
            &source,
        )
        .unwrap();
        assert_eq!(node.range, OffsetRange::new(0, 3));
    }
}

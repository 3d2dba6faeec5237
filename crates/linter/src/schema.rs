//! A small JSON-schema validator covering the subset of keywords that
//! configuration and rule-option schemas actually use: `type`, `enum`,
//! `properties`, `required`, `additionalProperties`, `items` (single and
//! positional forms), `additionalItems`, `minItems`/`maxItems`,
//! `minimum`/`maximum` and `oneOf`.
//!
//! Violations carry the offending value and a stable default message so
//! callers can render the exact text their consumers already match on.

use serde_json::Value;

/// Which schema keyword a value violated.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    Type { expected: Vec<String> },
    Enum,
    Required { property: String },
    AdditionalProperty { property: String },
    MinItems { limit: u64 },
    MaxItems { limit: u64 },
    AdditionalItems { limit: u64 },
    Minimum { limit: f64 },
    Maximum { limit: f64 },
    OneOf,
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Path to the offending value: `""` for the root, otherwise dotted
    /// segments with bracketed indices, e.g. `overrides[0].files`.
    pub path: String,
    pub kind: ViolationKind,
    /// The value that failed the keyword. For `Required` this is the object
    /// missing the property; for array-length keywords, the whole array.
    pub value: Value,
}

impl Violation {
    /// The default message for the violated keyword, without the path or
    /// value (callers embed those in their own formats).
    #[must_use]
    pub fn message(&self) -> String {
        match &self.kind {
            ViolationKind::Type { expected } => format!("should be {}", expected.join(",")),
            ViolationKind::Enum => "should be equal to one of the allowed values".to_string(),
            ViolationKind::Required { property } => {
                format!("should have required property '{property}'")
            }
            ViolationKind::AdditionalProperty { .. } => {
                "should NOT have additional properties".to_string()
            }
            ViolationKind::MinItems { limit } => {
                format!("should NOT have fewer than {limit} items")
            }
            ViolationKind::MaxItems { limit } | ViolationKind::AdditionalItems { limit } => {
                format!("should NOT have more than {limit} items")
            }
            ViolationKind::Minimum { limit } => format!("should be >= {limit}"),
            ViolationKind::Maximum { limit } => format!("should be <= {limit}"),
            ViolationKind::OneOf => "should match exactly one schema in oneOf".to_string(),
        }
    }
}

/// Validates `value` against `schema`, returning every violation found.
/// An empty vector means the value conforms.
#[must_use]
pub fn validate(schema: &Value, value: &Value) -> Vec<Violation> {
    let mut violations = Vec::new();
    validate_at(schema, value, "", &mut violations);
    violations
}

fn validate_at(schema: &Value, value: &Value, path: &str, out: &mut Vec<Violation>) {
    let Some(schema) = schema.as_object() else {
        return;
    };

    if let Some(expected) = schema.get("type") {
        if !type_matches(expected, value) {
            out.push(Violation {
                path: path.to_string(),
                kind: ViolationKind::Type {
                    expected: type_names(expected),
                },
                value: value.clone(),
            });
            // Remaining keywords assume the declared type.
            return;
        }
    }

    if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
        if !allowed.contains(value) {
            out.push(Violation {
                path: path.to_string(),
                kind: ViolationKind::Enum,
                value: value.clone(),
            });
        }
    }

    if let Some(object) = value.as_object() {
        if let Some(required) = schema.get("required").and_then(Value::as_array) {
            for property in required.iter().filter_map(Value::as_str) {
                if !object.contains_key(property) {
                    out.push(Violation {
                        path: path.to_string(),
                        kind: ViolationKind::Required {
                            property: property.to_string(),
                        },
                        value: value.clone(),
                    });
                }
            }
        }

        let properties = schema.get("properties").and_then(Value::as_object);
        if let Some(properties) = properties {
            for (name, property_schema) in properties {
                if let Some(property_value) = object.get(name) {
                    validate_at(property_schema, property_value, &join(path, name), out);
                }
            }
        }

        if schema.get("additionalProperties").and_then(Value::as_bool) == Some(false) {
            for name in object.keys() {
                let declared = properties.is_some_and(|p| p.contains_key(name));
                if !declared {
                    out.push(Violation {
                        path: path.to_string(),
                        kind: ViolationKind::AdditionalProperty {
                            property: name.clone(),
                        },
                        value: value.clone(),
                    });
                }
            }
        }
    }

    if let Some(array) = value.as_array() {
        match schema.get("items") {
            Some(Value::Array(item_schemas)) => {
                for (index, item) in array.iter().enumerate().take(item_schemas.len()) {
                    validate_at(&item_schemas[index], item, &index_path(path, index), out);
                }
                if schema.get("additionalItems").and_then(Value::as_bool) == Some(false)
                    && array.len() > item_schemas.len()
                {
                    out.push(Violation {
                        path: path.to_string(),
                        kind: ViolationKind::AdditionalItems {
                            limit: item_schemas.len() as u64,
                        },
                        value: value.clone(),
                    });
                }
            }
            Some(item_schema @ Value::Object(_)) => {
                for (index, item) in array.iter().enumerate() {
                    validate_at(item_schema, item, &index_path(path, index), out);
                }
            }
            _ => {}
        }

        if let Some(limit) = schema.get("minItems").and_then(Value::as_u64) {
            if (array.len() as u64) < limit {
                out.push(Violation {
                    path: path.to_string(),
                    kind: ViolationKind::MinItems { limit },
                    value: value.clone(),
                });
            }
        }
        if let Some(limit) = schema.get("maxItems").and_then(Value::as_u64) {
            if (array.len() as u64) > limit {
                out.push(Violation {
                    path: path.to_string(),
                    kind: ViolationKind::MaxItems { limit },
                    value: value.clone(),
                });
            }
        }
    }

    if let Some(number) = value.as_f64() {
        if let Some(limit) = schema.get("minimum").and_then(Value::as_f64) {
            if number < limit {
                out.push(Violation {
                    path: path.to_string(),
                    kind: ViolationKind::Minimum { limit },
                    value: value.clone(),
                });
            }
        }
        if let Some(limit) = schema.get("maximum").and_then(Value::as_f64) {
            if number > limit {
                out.push(Violation {
                    path: path.to_string(),
                    kind: ViolationKind::Maximum { limit },
                    value: value.clone(),
                });
            }
        }
    }

    if let Some(branches) = schema.get("oneOf").and_then(Value::as_array) {
        let mut branch_violations = Vec::new();
        let mut matches = 0;
        for branch in branches {
            let mut scratch = Vec::new();
            validate_at(branch, value, path, &mut scratch);
            if scratch.is_empty() {
                matches += 1;
            } else {
                branch_violations.append(&mut scratch);
            }
        }
        if matches != 1 {
            // No branch matched: report why each failed, then the summary.
            // More than one matched: the summary alone explains it.
            if matches == 0 {
                out.append(&mut branch_violations);
            }
            out.push(Violation {
                path: path.to_string(),
                kind: ViolationKind::OneOf,
                value: value.clone(),
            });
        }
    }
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}.{segment}")
    }
}

fn index_path(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

fn type_names(expected: &Value) -> Vec<String> {
    match expected {
        Value::String(name) => vec![name.clone()],
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn type_matches(expected: &Value, value: &Value) -> bool {
    match expected {
        Value::String(name) => matches_type_name(name, value),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .any(|name| matches_type_name(name, value)),
        _ => true,
    }
}

fn matches_type_name(name: &str, value: &Value) -> bool {
    match name {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => is_integer(value),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => false,
    }
}

fn is_integer(value: &Value) -> bool {
    let Some(number) = value.as_number() else {
        return false;
    };
    number.is_i64() || number.is_u64() || number.as_f64().is_some_and(|f| f.fract() == 0.0)
}

//! Whole-configuration validation.
//!
//! Error text produced here is a compatibility contract: downstream tooling
//! matches on the exact strings, including punctuation and trailing
//! newlines. Structural problems fail fast as one aggregated error; rule
//! entry problems are accumulated so a single failing call reports every
//! broken rule, not just the first.

use crate::environments::EnvironmentRegistry;
use crate::error::{ConfigError, ConfigErrorKind, Result};
use crate::rule::RuleDefinition;
use crate::schema::{self, Violation, ViolationKind};
use estree_types::Severity;
use serde_json::{json, Value};
use std::sync::{Arc, LazyLock};

/// Schema for the closed set of recognized configuration keys.
///
/// Overrides are restricted configurations: `files` is required and
/// `overrides`, `extends`, and `root` may not appear inside one.
static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "object",
        "properties": {
            "root": { "type": "boolean" },
            "globals": { "type": "object" },
            "env": { "type": "object" },
            "parser": { "type": ["string", "null"] },
            "parserOptions": { "type": "object" },
            "plugins": { "type": "array" },
            "settings": { "type": "object" },
            "extends": { "type": ["string", "array"] },
            "rules": { "type": "object" },
            "overrides": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "files": {
                            "oneOf": [
                                { "type": "string" },
                                {
                                    "type": "array",
                                    "items": { "type": "string" },
                                    "minItems": 1
                                }
                            ]
                        },
                        "excludedFiles": {
                            "oneOf": [
                                { "type": "string" },
                                { "type": "array", "items": { "type": "string" } }
                            ]
                        },
                        "env": { "type": "object" },
                        "globals": { "type": "object" },
                        "parserOptions": { "type": "object" },
                        "rules": { "type": "object" },
                        "settings": { "type": "object" }
                    },
                    "required": ["files"],
                    "additionalProperties": false
                }
            }
        },
        "additionalProperties": false
    })
});

/// Validates a raw configuration value.
///
/// `rule_mapper` resolves configured rule ids; ids it cannot resolve are
/// skipped here (the execution engine reports them as problems, so a config
/// naming a not-yet-loaded plugin rule still validates). `source` labels the
/// configuration in error messages.
#[tracing::instrument(skip(config, rule_mapper, environments))]
pub fn validate(
    config: &Value,
    source: Option<&str>,
    rule_mapper: impl Fn(&str) -> Option<Arc<RuleDefinition>>,
    environments: &EnvironmentRegistry,
) -> Result<()> {
    validate_config_schema(config, source)?;

    validate_environment(config.get("env"), environments)?;
    for override_config in config_overrides(config) {
        validate_environment(override_config.get("env"), environments)?;
    }

    let mut errors = Vec::new();
    collect_rule_errors(config.get("rules"), source, &rule_mapper, &mut errors);
    for override_config in config_overrides(config) {
        collect_rule_errors(override_config.get("rules"), source, &rule_mapper, &mut errors);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::new(ConfigErrorKind::Rules, errors.join("")))
    }
}

/// Validates a single rule entry: severity first, then options against the
/// rule's schema (skipped entirely when the severity is `off`).
///
/// Unlike whole-config validation, a missing rule definition is fatal here.
pub fn validate_rule_options(
    rule: Option<&RuleDefinition>,
    rule_id: &str,
    entry: &Value,
    source: Option<&str>,
) -> Result<()> {
    let Some(rule) = rule else {
        return Err(ConfigError::new(
            ConfigErrorKind::MissingRule,
            format!("Definition for rule '{rule_id}' was not found."),
        ));
    };
    check_rule_entry(rule, entry).map_err(|message| {
        ConfigError::new(
            ConfigErrorKind::Rules,
            wrap_rule_error(rule_id, &message, source),
        )
    })
}

fn config_overrides(config: &Value) -> impl Iterator<Item = &Value> {
    config
        .get("overrides")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn validate_config_schema(config: &Value, source: Option<&str>) -> Result<()> {
    let violations = schema::validate(&CONFIG_SCHEMA, config);
    if violations.is_empty() {
        return Ok(());
    }
    let formatted: String = violations
        .iter()
        .map(|violation| format!("\t- {}.\n", format_violation(violation)))
        .collect();
    let message = match source {
        Some(source) => format!("ESLint configuration in {source} is invalid:\n{formatted}"),
        None => format!("ESLint configuration is invalid:\n{formatted}"),
    };
    Err(ConfigError::new(ConfigErrorKind::Structure, message))
}

fn format_violation(violation: &Violation) -> String {
    match &violation.kind {
        ViolationKind::AdditionalProperty { property } => {
            let path = if violation.path.is_empty() {
                property.clone()
            } else {
                format!("{}.{property}", violation.path)
            };
            format!("Unexpected top-level property \"{path}\"")
        }
        ViolationKind::Type { expected } => format!(
            "Property \"{}\" is the wrong type (expected {} but got `{}`)",
            violation.path,
            expected.join("/"),
            violation.value
        ),
        _ => format!(
            "\"{}\" {}. Value: {}",
            violation.path,
            violation.message(),
            violation.value
        ),
    }
}

fn validate_environment(env: Option<&Value>, environments: &EnvironmentRegistry) -> Result<()> {
    let Some(env) = env.and_then(Value::as_object) else {
        return Ok(());
    };
    // A key set to `false` must still name a known environment.
    for name in env.keys() {
        if !environments.has(name) {
            return Err(ConfigError::new(
                ConfigErrorKind::Environment,
                format!("Environment key \"{name}\" is unknown\n"),
            ));
        }
    }
    Ok(())
}

fn collect_rule_errors(
    rules: Option<&Value>,
    source: Option<&str>,
    rule_mapper: &impl Fn(&str) -> Option<Arc<RuleDefinition>>,
    errors: &mut Vec<String>,
) {
    let Some(rules) = rules.and_then(Value::as_object) else {
        return;
    };
    for (rule_id, entry) in rules {
        let Some(rule) = rule_mapper(rule_id) else {
            tracing::debug!(rule_id, "skipping unresolved rule id during validation");
            continue;
        };
        if let Err(message) = check_rule_entry(&rule, entry) {
            errors.push(wrap_rule_error(rule_id, &message, source));
        }
    }
}

fn check_rule_entry(rule: &RuleDefinition, entry: &Value) -> std::result::Result<(), String> {
    let severity_value = match entry {
        Value::Array(items) => items.first(),
        other => Some(other),
    };
    match severity_value.and_then(parse_severity) {
        None => Err(format!(
            "\tSeverity should be one of the following: 0 = off, 1 = warn, 2 = error (you passed '{}').\n",
            severity_echo(severity_value)
        )),
        Some(Severity::Off) => Ok(()),
        Some(_) => {
            let options = match entry {
                Value::Array(items) => &items[1..],
                _ => &[],
            };
            check_rule_options(rule, options)
        }
    }
}

fn check_rule_options(rule: &RuleDefinition, options: &[Value]) -> std::result::Result<(), String> {
    let options_value = Value::Array(options.to_vec());
    let Some(options_schema) = rule.options_schema() else {
        // No schema means no options accepted at all.
        if options.is_empty() {
            return Ok(());
        }
        return Err(format!(
            "\tValue {options_value} should NOT have more than 0 items.\n"
        ));
    };
    let violations = schema::validate(&options_schema, &options_value);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations
            .iter()
            .map(|violation| format!("\tValue {} {}.\n", violation.value, violation.message()))
            .collect())
    }
}

fn wrap_rule_error(rule_id: &str, message: &str, source: Option<&str>) -> String {
    let enhanced = format!("Configuration for rule \"{rule_id}\" is invalid:\n{message}");
    match source {
        Some(source) => format!("{source}:\n\t{enhanced}"),
        None => enhanced,
    }
}

fn parse_severity(value: &Value) -> Option<Severity> {
    match value {
        Value::Number(number) => Severity::from_code(numeric_code(number)?),
        Value::String(name) => Severity::from_name(name),
        _ => None,
    }
}

fn numeric_code(number: &serde_json::Number) -> Option<u64> {
    if let Some(code) = number.as_u64() {
        return Some(code);
    }
    let code = number.as_f64()?;
    if code.fract() == 0.0 && (0.0..=2.0).contains(&code) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        return Some(code as u64);
    }
    None
}

fn severity_echo(value: Option<&Value>) -> String {
    value.map_or_else(
        || "undefined".to_string(),
        |value| inspect(value).replace('\'', "\""),
    )
}

/// Console-inspector rendition of a value: single-quoted strings, spaces
/// inside non-empty array and object braces, bare identifier keys. Kept
/// byte-compatible with the echo historically embedded in severity errors.
fn inspect(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => match number.as_f64() {
            Some(code) if number.is_f64() && code.fract() == 0.0 && code.is_finite() => {
                format!("{}", code as i64)
            }
            _ => number.to_string(),
        },
        Value::String(text) => format!("'{text}'"),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(inspect).collect();
            format!("[ {} ]", rendered.join(", "))
        }
        Value::Object(entries) if entries.is_empty() => "{}".to_string(),
        Value::Object(entries) => {
            let rendered: Vec<String> = entries
                .iter()
                .map(|(key, value)| format!("{}: {}", inspect_key(key), inspect(value)))
                .collect();
            format!("{{ {} }}", rendered.join(", "))
        }
    }
}

fn inspect_key(key: &str) -> String {
    let mut chars = key.chars();
    let identifier = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if identifier {
        key.to_string()
    } else {
        format!("'{key}'")
    }
}

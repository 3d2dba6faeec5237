//! Operations over validated configurations: merging, per-file override
//! application, and environment resolution.

use crate::config::{Config, OverrideConfig, RuleEntry, StringOrList};
use crate::environments::EnvironmentRegistry;
use glob::Pattern;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Merges `extension` onto `base`, right-biased.
///
/// Maps merge per key with the extension winning; nested JSON objects
/// (settings, parser options) merge recursively. A rule entry that sets only
/// a severity keeps the base entry's options, so `"semi": "off"` in an
/// extension does not discard `["error", "always"]` options configured
/// upstream. Override lists concatenate in base-then-extension order.
#[must_use]
pub fn merge(base: &Config, extension: &Config) -> Config {
    Config {
        root: base.root || extension.root,
        globals: merge_maps(&base.globals, &extension.globals),
        env: merge_maps(&base.env, &extension.env),
        parser: extension.parser.clone().or_else(|| base.parser.clone()),
        parser_options: merge_json_maps(&base.parser_options, &extension.parser_options),
        plugins: merge_plugins(&base.plugins, &extension.plugins),
        settings: merge_json_maps(&base.settings, &extension.settings),
        extends: extension.extends.clone().or_else(|| base.extends.clone()),
        rules: merge_rules(&base.rules, &extension.rules),
        overrides: [base.overrides.clone(), extension.overrides.clone()].concat(),
    }
}

/// The effective configuration for one file: every override whose patterns
/// match `path` is merged onto the base, in declaration order. The result
/// carries no overrides of its own.
#[must_use]
pub fn apply_overrides(config: &Config, path: &str) -> Config {
    let mut effective = Config {
        overrides: Vec::new(),
        ..config.clone()
    };
    for override_config in &config.overrides {
        if !applies_to(override_config, path) {
            continue;
        }
        tracing::trace!(path, files = ?override_config.files, "applying override");
        let fragment = Config {
            env: override_config.env.clone(),
            globals: override_config.globals.clone(),
            parser_options: override_config.parser_options.clone(),
            rules: override_config.rules.clone(),
            settings: override_config.settings.clone(),
            ..Config::default()
        };
        effective = merge(&effective, &fragment);
    }
    effective
}

/// Whether an override's file patterns select `path`: at least one `files`
/// pattern matches and no `excludedFiles` pattern does.
#[must_use]
pub fn applies_to(override_config: &OverrideConfig, path: &str) -> bool {
    let matches = override_config
        .files
        .iter()
        .any(|pattern| glob_match(pattern, path));
    let excluded = override_config
        .excluded_files
        .as_ref()
        .map(StringOrList::iter)
        .into_iter()
        .flatten()
        .any(|pattern| glob_match(pattern, path));
    matches && !excluded
}

/// Folds enabled environments into the configuration: environment globals
/// and parser options apply underneath the config's own, so explicit
/// configuration always wins.
#[must_use]
pub fn resolve_environments(config: &Config, environments: &EnvironmentRegistry) -> Config {
    let mut resolved = config.clone();
    for name in config.enabled_environments() {
        let Some(environment) = environments.get(name) else {
            continue;
        };
        for (global, writable) in &environment.globals {
            resolved
                .globals
                .entry(global.clone())
                .or_insert(crate::config::GlobalValue::Flag(*writable));
        }
        for (option, value) in &environment.parser_options {
            if !resolved.parser_options.contains_key(option) {
                resolved
                    .parser_options
                    .insert(option.clone(), value.clone());
            }
        }
    }
    resolved
}

/// Matches one glob pattern against a path. A pattern without a slash
/// matches against the path's final component, so `"*.test.js"` selects
/// test files anywhere in the tree.
fn glob_match(pattern: &str, path: &str) -> bool {
    let Ok(compiled) = Pattern::new(pattern) else {
        tracing::debug!(pattern, "ignoring invalid override pattern");
        return false;
    };
    let candidate = if pattern.contains('/') {
        path
    } else {
        Path::new(path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(path)
    };
    compiled.matches(candidate)
}

fn merge_maps<V: Clone>(
    base: &BTreeMap<String, V>,
    extension: &BTreeMap<String, V>,
) -> BTreeMap<String, V> {
    let mut merged = base.clone();
    for (key, value) in extension {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

fn merge_json_maps(
    base: &Map<String, Value>,
    extension: &Map<String, Value>,
) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in extension {
        match (merged.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                *existing = merge_json_maps(existing, incoming);
            }
            _ => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}

fn merge_plugins(base: &[String], extension: &[String]) -> Vec<String> {
    let mut merged = base.to_vec();
    for plugin in extension {
        if !merged.contains(plugin) {
            merged.push(plugin.clone());
        }
    }
    merged
}

fn merge_rules(
    base: &BTreeMap<String, RuleEntry>,
    extension: &BTreeMap<String, RuleEntry>,
) -> BTreeMap<String, RuleEntry> {
    let mut merged = base.clone();
    for (rule_id, entry) in extension {
        let combined = match merged.get(rule_id) {
            // A severity-only extension keeps the options configured upstream.
            Some(existing) if entry.options.is_empty() && !existing.options.is_empty() => {
                RuleEntry::with_options(entry.severity, existing.options.clone())
            }
            _ => entry.clone(),
        };
        merged.insert(rule_id.clone(), combined);
    }
    merged
}

//! Execution environments and their registry.
//!
//! An environment bundles the globals and parser options a config turns on
//! with a single `env` key, e.g. `"env": { "es6": true }`.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

/// A named execution environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    /// Globals the environment provides; `true` marks a global as writable.
    pub globals: BTreeMap<String, bool>,
    /// Parser options the environment implies, e.g. `ecmaVersion`.
    pub parser_options: Map<String, Value>,
}

impl Environment {
    #[must_use]
    pub fn new(globals: BTreeMap<String, bool>) -> Self {
        Self {
            globals,
            parser_options: Map::new(),
        }
    }

    #[must_use]
    pub fn with_parser_options(mut self, parser_options: Map<String, Value>) -> Self {
        self.parser_options = parser_options;
        self
    }
}

/// Registered environments, keyed by name.
///
/// Starts out with the builtin set; later definitions under an existing name
/// silently replace the earlier one.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentRegistry {
    environments: BTreeMap<String, Arc<Environment>>,
}

impl EnvironmentRegistry {
    /// An empty registry with no environments at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry preloaded with the builtin environments.
    #[must_use]
    pub fn with_builtin_environments() -> Self {
        let mut registry = Self::default();
        for (name, environment) in builtin_environments() {
            registry
                .environments
                .insert((*name).to_string(), Arc::clone(environment));
        }
        registry
    }

    pub fn define(&mut self, name: impl Into<String>, environment: Environment) {
        self.environments.insert(name.into(), Arc::new(environment));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Environment>> {
        self.environments.get(name).map(Arc::clone)
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.environments.contains_key(name)
    }

    /// Environment names in lexical order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.environments.keys().map(String::as_str).collect()
    }
}

/// Lazily initialized builtin environments.
/// Environments are created once and shared across all registries.
static BUILTIN_ENVIRONMENTS: LazyLock<Vec<(&'static str, Arc<Environment>)>> =
    LazyLock::new(|| {
        vec![
            ("builtin", Arc::new(Environment::new(builtin_globals()))),
            ("browser", Arc::new(Environment::new(browser_globals()))),
            ("node", Arc::new(Environment::new(node_globals()))),
            ("commonjs", Arc::new(Environment::new(commonjs_globals()))),
            (
                "shared-node-browser",
                Arc::new(Environment::new(globals(&[
                    ("clearInterval", false),
                    ("clearTimeout", false),
                    ("console", false),
                    ("setInterval", false),
                    ("setTimeout", false),
                ]))),
            ),
            (
                "es6",
                Arc::new(
                    Environment::new(es6_globals())
                        .with_parser_options(ecma_version(6)),
                ),
            ),
            ("worker", Arc::new(Environment::new(worker_globals()))),
            (
                "amd",
                Arc::new(Environment::new(globals(&[
                    ("define", false),
                    ("require", false),
                ]))),
            ),
            ("mocha", Arc::new(Environment::new(mocha_globals()))),
            ("jest", Arc::new(Environment::new(jest_globals()))),
        ]
    });

#[must_use]
pub fn builtin_environments() -> &'static [(&'static str, Arc<Environment>)] {
    &BUILTIN_ENVIRONMENTS
}

fn globals(entries: &[(&str, bool)]) -> BTreeMap<String, bool> {
    entries
        .iter()
        .map(|(name, writable)| ((*name).to_string(), *writable))
        .collect()
}

fn ecma_version(version: u64) -> Map<String, Value> {
    let mut options = Map::new();
    options.insert("ecmaVersion".to_string(), Value::from(version));
    options
}

fn builtin_globals() -> BTreeMap<String, bool> {
    globals(&[
        ("Array", false),
        ("Boolean", false),
        ("Date", false),
        ("Error", false),
        ("Function", false),
        ("Infinity", false),
        ("JSON", false),
        ("Math", false),
        ("NaN", false),
        ("Number", false),
        ("Object", false),
        ("RegExp", false),
        ("String", false),
        ("decodeURI", false),
        ("decodeURIComponent", false),
        ("encodeURI", false),
        ("encodeURIComponent", false),
        ("isFinite", false),
        ("isNaN", false),
        ("parseFloat", false),
        ("parseInt", false),
        ("undefined", false),
    ])
}

fn browser_globals() -> BTreeMap<String, bool> {
    globals(&[
        ("alert", false),
        ("console", false),
        ("document", false),
        ("fetch", false),
        ("history", false),
        ("localStorage", false),
        ("location", false),
        ("navigator", false),
        ("sessionStorage", false),
        ("window", false),
    ])
}

fn node_globals() -> BTreeMap<String, bool> {
    globals(&[
        ("Buffer", false),
        ("__dirname", false),
        ("__filename", false),
        ("console", false),
        ("exports", true),
        ("global", false),
        ("module", false),
        ("process", false),
        ("require", false),
    ])
}

fn commonjs_globals() -> BTreeMap<String, bool> {
    globals(&[
        ("exports", true),
        ("global", false),
        ("module", false),
        ("require", false),
    ])
}

fn es6_globals() -> BTreeMap<String, bool> {
    globals(&[
        ("Map", false),
        ("Promise", false),
        ("Proxy", false),
        ("Reflect", false),
        ("Set", false),
        ("Symbol", false),
        ("WeakMap", false),
        ("WeakSet", false),
    ])
}

fn worker_globals() -> BTreeMap<String, bool> {
    globals(&[
        ("importScripts", false),
        ("postMessage", false),
        ("self", false),
    ])
}

fn mocha_globals() -> BTreeMap<String, bool> {
    globals(&[
        ("after", false),
        ("afterEach", false),
        ("before", false),
        ("beforeEach", false),
        ("describe", false),
        ("it", false),
    ])
}

fn jest_globals() -> BTreeMap<String, bool> {
    globals(&[
        ("afterAll", false),
        ("afterEach", false),
        ("beforeAll", false),
        ("beforeEach", false),
        ("describe", false),
        ("expect", false),
        ("it", false),
        ("jest", false),
        ("test", false),
    ])
}

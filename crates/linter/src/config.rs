//! The typed configuration model.
//!
//! Raw configuration text parses into a [`serde_json::Value`] first; the
//! config validator checks that value and produces the consumer-facing error
//! messages. Only validated values are deserialized into [`Config`], so the
//! typed model never needs to describe malformed shapes. Serializing a
//! `Config` yields the canonical form: numeric severities, defaulted keys
//! omitted.

use crate::error::{ConfigError, ConfigErrorKind, Result};
use estree_types::Severity;
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// A whole configuration: the closed set of recognized top-level keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    #[serde(skip_serializing_if = "is_false")]
    pub root: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub globals: BTreeMap<String, GlobalValue>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub parser_options: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub settings: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<StringOrList>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<String, RuleEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<OverrideConfig>,
}

impl Config {
    /// Deserializes an already-validated configuration value.
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone())
            .map_err(|err| ConfigError::new(ConfigErrorKind::Structure, err.to_string()))
    }

    /// Serializes into the canonical value form: severities numeric,
    /// defaulted keys omitted. Re-validating the result never produces new
    /// errors.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self)
            .map_err(|err| ConfigError::new(ConfigErrorKind::Structure, err.to_string()))
    }

    /// Environment names enabled by this config, in lexical order.
    pub fn enabled_environments(&self) -> impl Iterator<Item = &str> {
        self.env
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(name, _)| name.as_str())
    }
}

/// A scoped configuration fragment applied to files matching `files`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverrideConfig {
    pub files: StringOrList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_files: Option<StringOrList>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub globals: BTreeMap<String, GlobalValue>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub parser_options: Map<String, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<String, RuleEntry>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub settings: Map<String, Value>,
}

/// A global's writability: the boolean form, or a named mode string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GlobalValue {
    Flag(bool),
    Mode(String),
}

impl GlobalValue {
    #[must_use]
    pub fn is_writable(&self) -> bool {
        match self {
            Self::Flag(writable) => *writable,
            Self::Mode(mode) => mode.eq_ignore_ascii_case("writable"),
        }
    }
}

/// A key accepting a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        match self {
            Self::One(single) => std::slice::from_ref(single).iter(),
            Self::Many(list) => list.iter(),
        }
        .map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(list) => list.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringOrList {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

/// One configured rule: its severity plus the positional options that
/// followed it. Accepts the bare-severity form (`"no-empty": 2`) and the
/// sequence form (`"semi": [2, "always"]`); serializes back to whichever of
/// the two is shortest.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    pub severity: Severity,
    pub options: Vec<Value>,
}

impl RuleEntry {
    #[must_use]
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            options: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_options(severity: Severity, options: Vec<Value>) -> Self {
        Self { severity, options }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.severity.is_enabled()
    }
}

impl Serialize for RuleEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.options.is_empty() {
            self.severity.serialize(serializer)
        } else {
            let mut seq = serializer.serialize_seq(Some(1 + self.options.len()))?;
            seq.serialize_element(&self.severity)?;
            for option in &self.options {
                seq.serialize_element(option)?;
            }
            seq.end()
        }
    }
}

impl<'de> Deserialize<'de> for RuleEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RuleEntryVisitor;

        impl<'de> Visitor<'de> for RuleEntryVisitor {
            type Value = RuleEntry;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a severity, or a sequence of severity then options")
            }

            fn visit_u64<E: de::Error>(self, code: u64) -> std::result::Result<RuleEntry, E> {
                Severity::from_code(code)
                    .map(RuleEntry::new)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(code), &self))
            }

            fn visit_i64<E: de::Error>(self, code: i64) -> std::result::Result<RuleEntry, E> {
                u64::try_from(code)
                    .ok()
                    .and_then(Severity::from_code)
                    .map(RuleEntry::new)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(code), &self))
            }

            fn visit_f64<E: de::Error>(self, code: f64) -> std::result::Result<RuleEntry, E> {
                if code.fract() == 0.0 && (0.0..=2.0).contains(&code) {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    return self.visit_u64(code as u64);
                }
                Err(E::invalid_value(de::Unexpected::Float(code), &self))
            }

            fn visit_str<E: de::Error>(self, name: &str) -> std::result::Result<RuleEntry, E> {
                Severity::from_name(name)
                    .map(RuleEntry::new)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Str(name), &self))
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<RuleEntry, A::Error> {
                let severity: Severity = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let mut options = Vec::new();
                while let Some(option) = seq.next_element::<Value>()? {
                    options.push(option);
                }
                Ok(RuleEntry { severity, options })
            }
        }

        deserializer.deserialize_any(RuleEntryVisitor)
    }
}

/// Parses configuration text in JSON form into a raw value for validation.
pub fn parse_json(text: &str) -> Result<Value> {
    serde_json::from_str(text)
        .map_err(|err| ConfigError::new(ConfigErrorKind::Structure, err.to_string()))
}

/// Parses configuration text in YAML form into a raw value for validation.
pub fn parse_yaml(text: &str) -> Result<Value> {
    serde_saphyr::from_str(text)
        .map_err(|err| ConfigError::new(ConfigErrorKind::Structure, err.to_string()))
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Result type for rule factories and listeners.
pub type RuleResult<T> = std::result::Result<T, RuleError>;

/// Why a configuration was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// Top-level shape: unknown keys, wrong types, malformed overrides
    Structure,
    /// An `env` key no registered environment matches
    Environment,
    /// One or more rule entries with a bad severity or bad options
    Rules,
    /// A rule id that resolves to no definition
    MissingRule,
}

/// A rejected configuration.
///
/// The rendered message is what consumers match on (existing tooling asserts
/// on exact text, trailing newlines included); `kind` is for programmatic
/// dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConfigError {
    /// Classification of the failure
    pub kind: ConfigErrorKind,
    /// Fully rendered, consumer-facing message
    pub message: String,
}

impl ConfigError {
    pub(crate) fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// A fault raised by a rule itself: a factory that cannot build its visitor
/// (bad options it only detects at runtime, an invalid regex, ...) or a
/// listener that fails mid-traversal.
///
/// Rule faults never abort the engine; they are converted into synthetic
/// problems attributed to the faulting rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RuleError(String);

impl RuleError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// The fault description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<String> for RuleError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for RuleError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

//! Severity types for rule configuration and reported problems.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Severity of a lint rule, as configured by the user.
///
/// Configs accept the numeric codes `0`/`1`/`2` and the names
/// `"off"`/`"warn"`/`"error"` (case-insensitive). The canonical wire form
/// is the numeric code, which is what [`Serialize`] emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    /// Rule is disabled
    #[default]
    Off,
    /// Rule violations are reported but do not fail the run
    Warn,
    /// Rule violations are errors
    Error,
}

impl Severity {
    /// The canonical numeric code (`0`, `1`, or `2`).
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Warn => 1,
            Self::Error => 2,
        }
    }

    /// Parse a numeric severity code.
    #[must_use]
    pub const fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::Off),
            1 => Some(Self::Warn),
            2 => Some(Self::Error),
            _ => None,
        }
    }

    /// Parse a severity name, case-insensitively (`"Off"`, `"WARN"`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "off" => Some(Self::Off),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Returns true if the rule is enabled (warn or error).
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Off)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

struct SeverityVisitor;

impl Visitor<'_> for SeverityVisitor {
    type Value = Severity;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a severity: 0, 1, 2, \"off\", \"warn\", or \"error\"")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Severity, E> {
        Severity::from_code(value)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(value), &self))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Severity, E> {
        u64::try_from(value)
            .ok()
            .and_then(Severity::from_code)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(value), &self))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Severity, E> {
        if value.fract() == 0.0 && (0.0..=2.0).contains(&value) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            return self.visit_u64(value as u64);
        }
        Err(E::invalid_value(de::Unexpected::Float(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Severity, E> {
        Severity::from_name(value)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Str(value), &self))
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SeverityVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_codes() {
        assert_eq!(Severity::Off.code(), 0);
        assert_eq!(Severity::Warn.code(), 1);
        assert_eq!(Severity::Error.code(), 2);

        assert_eq!(Severity::from_code(0), Some(Severity::Off));
        assert_eq!(Severity::from_code(2), Some(Severity::Error));
        assert_eq!(Severity::from_code(3), None);
    }

    #[test]
    fn test_severity_names_case_insensitive() {
        assert_eq!(Severity::from_name("off"), Some(Severity::Off));
        assert_eq!(Severity::from_name("Off"), Some(Severity::Off));
        assert_eq!(Severity::from_name("WARN"), Some(Severity::Warn));
        assert_eq!(Severity::from_name("Error"), Some(Severity::Error));
        assert_eq!(Severity::from_name("fatal"), None);
    }

    #[test]
    fn test_severity_enabled() {
        assert!(!Severity::Off.is_enabled());
        assert!(Severity::Warn.is_enabled());
        assert!(Severity::Error.is_enabled());
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(format!("{}", Severity::Off), "off");
        assert_eq!(format!("{}", Severity::Warn), "warn");
        assert_eq!(format!("{}", Severity::Error), "error");
    }

    #[test]
    fn test_severity_serde() {
        assert_eq!(serde_json::to_string(&Severity::Error).unwrap(), "2");

        let from_number: Severity = serde_json::from_str("1").unwrap();
        assert_eq!(from_number, Severity::Warn);
        let from_name: Severity = serde_json::from_str("\"Error\"").unwrap();
        assert_eq!(from_name, Severity::Error);
        let from_float: Severity = serde_json::from_str("2.0").unwrap();
        assert_eq!(from_float, Severity::Error);
        assert!(serde_json::from_str::<Severity>("3").is_err());
        assert!(serde_json::from_str::<Severity>("1.5").is_err());
        assert!(serde_json::from_str::<Severity>("\"loud\"").is_err());
    }
}

//! Validation configuration
//!
//! Built once at startup from the service configuration and handed to the
//! validator by value. Nothing here is read from ambient process state.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How presence of a categorical field (`strengthResistance`, `loyalty`) is decided
/// when the card type requires it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceCheck {
    /// Present iff the key exists, whatever its value. A 0-loyalty
    /// planeswalker is accepted.
    #[default]
    Explicit,
    /// Present iff the key exists and its value is truthy. `0`,
    /// `""`, `false` and `null` count as missing.
    Truthy,
}

impl PresenceCheck {
    /// Returns the config name
    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceCheck::Explicit => "explicit",
            PresenceCheck::Truthy => "truthy",
        }
    }

    /// Whether `value` counts as present under this rule
    pub fn is_present(&self, value: Option<&Value>) -> bool {
        match (self, value) {
            (_, None) => false,
            (PresenceCheck::Explicit, Some(_)) => true,
            (PresenceCheck::Truthy, Some(v)) => is_truthy(v),
        }
    }
}

impl fmt::Display for PresenceCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable validator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationConfig {
    pub presence_check: PresenceCheck,
}

impl ValidationConfig {
    pub fn new(presence_check: PresenceCheck) -> Self {
        Self { presence_check }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explicit_counts_any_value() {
        let rule = PresenceCheck::Explicit;
        assert!(rule.is_present(Some(&json!(0))));
        assert!(rule.is_present(Some(&json!(null))));
        assert!(!rule.is_present(None));
    }

    #[test]
    fn test_truthy_rejects_falsy_values() {
        let rule = PresenceCheck::Truthy;
        assert!(!rule.is_present(Some(&json!(0))));
        assert!(!rule.is_present(Some(&json!(0.0))));
        assert!(!rule.is_present(Some(&json!(""))));
        assert!(!rule.is_present(Some(&json!(false))));
        assert!(!rule.is_present(Some(&json!(null))));
        assert!(rule.is_present(Some(&json!(3))));
        assert!(rule.is_present(Some(&json!("x"))));
        assert!(rule.is_present(Some(&json!([]))));
    }

    #[test]
    fn test_default_is_explicit() {
        assert_eq!(ValidationConfig::default().presence_check, PresenceCheck::Explicit);
    }

    #[test]
    fn test_config_names() {
        let parsed: PresenceCheck = serde_json::from_value(json!("truthy")).unwrap();
        assert_eq!(parsed, PresenceCheck::Truthy);
        assert_eq!(PresenceCheck::Explicit.to_string(), "explicit");
    }
}

//! Card validator
//!
//! Check order (first failure wins):
//! 1. owner is a non-empty string
//! 2. localId is an integer
//! 3. name is a non-empty string
//! 4. manaCost is a number >= 0
//! 5. colorCategory is a known color
//! 6. cardType is a known type
//! 7. rarity is a known rarity
//! 8. rulesText is a string
//! 9. loyalty present iff planeswalker (numeric when present)
//! 10. marketValue is a number
//! 11. strengthResistance, when present, is a number
//! 12. strengthResistance present iff creature
//!
//! The order is part of the contract: callers see the same reason for the
//! same input every time.

use serde_json::{Map, Value};

use crate::card::{Card, CardType, Color, Rarity, CARD_FIELDS};

use super::errors::{ValidationError, ValidationResult};
use super::rules::{PresenceCheck, ValidationConfig};

/// Validates untrusted card payloads.
///
/// Pure: holds only immutable configuration and never touches storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardValidator {
    config: ValidationConfig,
}

impl CardValidator {
    /// Creates a validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this validator enforces.
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validates a candidate record.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a `ValidationError`.
    pub fn validate(&self, candidate: &Value) -> ValidationResult<Card> {
        let obj = candidate.as_object().ok_or_else(|| {
            ValidationError::type_mismatch(
                "$root",
                "object",
                json_type_name(candidate),
                "Card must be a JSON object",
            )
        })?;

        let owner = require_string(obj, "owner", "User must be a string")?;
        if owner.is_empty() {
            return Err(ValidationError::out_of_range(
                "owner",
                "non-empty string",
                "empty string",
                "User must not be empty",
            ));
        }

        let local_id = require_integer(obj, "localId", "ID must be a number")?;

        let name = require_string(obj, "name", "Name must be a string")?;
        if name.is_empty() {
            return Err(ValidationError::out_of_range(
                "name",
                "non-empty string",
                "empty string",
                "Name must not be empty",
            ));
        }

        let mana_cost = require_number(obj, "manaCost", "Mana Cost must be a number")?;
        if mana_cost < 0.0 {
            return Err(ValidationError::out_of_range(
                "manaCost",
                "number >= 0",
                mana_cost.to_string(),
                "Mana Cost must not be negative",
            ));
        }

        let color_category = require_enum(
            obj,
            "colorCategory",
            Color::parse,
            &Color::ALL.map(|c| c.as_str()),
            "Color must be a valid color",
        )?;
        let card_type = require_enum(
            obj,
            "cardType",
            CardType::parse,
            &CardType::ALL.map(|t| t.as_str()),
            "Type must be a valid type",
        )?;
        let rarity = require_enum(
            obj,
            "rarity",
            Rarity::parse,
            &Rarity::ALL.map(|r| r.as_str()),
            "Rare must be a valid rare",
        )?;

        let rules_text = require_string(obj, "rulesText", "Rules must be a string")?;

        let loyalty = self.check_loyalty(obj, card_type)?;

        let market_value = require_number(obj, "marketValue", "Value must be a number")?;

        let strength_resistance = self.check_strength_resistance(obj, card_type)?;

        Ok(Card {
            owner: owner.to_string(),
            local_id,
            name: name.to_string(),
            mana_cost,
            color_category,
            card_type,
            rarity,
            rules_text: rules_text.to_string(),
            market_value,
            strength_resistance,
            loyalty,
        })
    }

    /// Screens an update patch before it is merged.
    ///
    /// The patch must be an object and every key must be a card field.
    /// Keys are visited in map order (sorted), so the reported field is
    /// deterministic.
    pub fn check_patch_fields<'v>(&self, patch: &'v Value) -> ValidationResult<&'v Map<String, Value>> {
        let obj = patch.as_object().ok_or_else(|| {
            ValidationError::type_mismatch(
                "$root",
                "object",
                json_type_name(patch),
                "Update must be a JSON object",
            )
        })?;

        if let Some(unknown) = obj.keys().find(|k| !CARD_FIELDS.contains(&k.as_str())) {
            return Err(ValidationError::unknown_field(unknown));
        }

        Ok(obj)
    }

    /// Merges a screened patch over an existing card.
    ///
    /// A `null` patch value removes the field; anything else overwrites it.
    /// The result is unvalidated and must go through `validate`.
    pub fn merge_patch(&self, existing: &Card, patch: &Map<String, Value>) -> Value {
        let mut merged = existing.to_map();

        for (key, value) in patch {
            if value.is_null() {
                merged.remove(key);
            } else {
                merged.insert(key.clone(), value.clone());
            }
        }

        Value::Object(merged)
    }

    /// Step 9: loyalty exactly on planeswalkers.
    fn check_loyalty(
        &self,
        obj: &Map<String, Value>,
        card_type: CardType,
    ) -> ValidationResult<Option<f64>> {
        let value = obj.get("loyalty");

        if !card_type.requires_loyalty() {
            if value.is_some() {
                return Err(ValidationError::forbidden_conditional(
                    "loyalty",
                    card_type.as_str(),
                    "Loyalty is only for planeswalker type",
                ));
            }
            return Ok(None);
        }

        if !self.config.presence_check.is_present(value) {
            return Err(ValidationError::missing_conditional(
                "loyalty",
                card_type.as_str(),
                "Planeswalker type must have Loyalty",
            ));
        }

        require_number(obj, "loyalty", "Loyalty must be a number").map(Some)
    }

    /// Steps 11 and 12: strengthResistance exactly on creatures.
    fn check_strength_resistance(
        &self,
        obj: &Map<String, Value>,
        card_type: CardType,
    ) -> ValidationResult<Option<f64>> {
        let value = obj.get("strengthResistance");

        // Under the truthy rule a falsy value skips the type check, as it
        // is treated as not being there at all.
        let type_checked = match self.config.presence_check {
            PresenceCheck::Explicit => value.is_some(),
            PresenceCheck::Truthy => self.config.presence_check.is_present(value),
        };
        let number = if type_checked {
            Some(require_number(
                obj,
                "strengthResistance",
                "Strength/Resistance must be a number",
            )?)
        } else {
            None
        };

        if card_type.requires_strength_resistance() {
            if !self.config.presence_check.is_present(value) {
                return Err(ValidationError::missing_conditional(
                    "strengthResistance",
                    card_type.as_str(),
                    "Creature type must have Strength/Resistance",
                ));
            }
            Ok(number)
        } else {
            if value.is_some() {
                return Err(ValidationError::forbidden_conditional(
                    "strengthResistance",
                    card_type.as_str(),
                    "Strength/Resistance is only for Creature type",
                ));
            }
            Ok(None)
        }
    }
}

fn require_string<'v>(
    obj: &'v Map<String, Value>,
    field: &str,
    message: &str,
) -> ValidationResult<&'v str> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s),
        other => Err(ValidationError::type_mismatch(
            field,
            "string",
            actual_name(other),
            message,
        )),
    }
}

fn require_number(obj: &Map<String, Value>, field: &str, message: &str) -> ValidationResult<f64> {
    match obj.get(field) {
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
            ValidationError::type_mismatch(field, "number", "unrepresentable number", message)
        }),
        other => Err(ValidationError::type_mismatch(
            field,
            "number",
            actual_name(other),
            message,
        )),
    }
}

fn require_integer(obj: &Map<String, Value>, field: &str, message: &str) -> ValidationResult<i64> {
    let n = match obj.get(field) {
        Some(Value::Number(n)) => n,
        other => {
            return Err(ValidationError::type_mismatch(
                field,
                "integer",
                actual_name(other),
                message,
            ))
        }
    };

    if let Some(i) = n.as_i64() {
        return Ok(i);
    }

    // Integral floats such as 3.0 are accepted; i64::MAX as f64 rounds up
    // to 2^63, hence the strict upper bound.
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        Some(f) if f.fract() == 0.0 => Err(ValidationError::out_of_range(
            field,
            "integer within 64-bit range",
            n.to_string(),
            "ID is out of range",
        )),
        _ => Err(ValidationError::type_mismatch(
            field,
            "integer",
            n.to_string(),
            message,
        )),
    }
}

fn require_enum<T>(
    obj: &Map<String, Value>,
    field: &str,
    parse: fn(&str) -> Option<T>,
    allowed: &[&str],
    message: &str,
) -> ValidationResult<T> {
    let value = obj.get(field);
    value
        .and_then(Value::as_str)
        .and_then(parse)
        .ok_or_else(|| {
            let actual = match value {
                Some(v) => v.to_string(),
                None => "missing".to_string(),
            };
            ValidationError::invalid_enum(field, allowed, actual, message)
        })
}

fn actual_name(value: Option<&Value>) -> &'static str {
    match value {
        Some(v) => json_type_name(v),
        None => "missing",
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

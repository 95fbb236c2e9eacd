//! Card Invariant Tests
//!
//! Validation rules every stored card satisfies:
//! - Conditional fields follow the card type (strength on creatures,
//!   loyalty on planeswalkers)
//! - Enumerated fields only take their listed values
//! - Validation is idempotent on valid cards
//! - Rejected writes leave the store untouched

use std::sync::Arc;

use cardvault::card::{Card, CardKey, CardType, Color, Rarity};
use cardvault::service::{CardService, ServiceError};
use cardvault::store::{MemoryStore, RecordStore};
use cardvault::validation::{
    CardValidator, PresenceCheck, ValidationConfig, ValidationErrorCode,
};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn scenario_a() -> Value {
    json!({
        "owner": "jose",
        "localId": 0,
        "name": "Cazador",
        "manaCost": 16,
        "colorCategory": "multicolor",
        "cardType": "creature",
        "rarity": "mythicRare",
        "rulesText": "No puede atacar cuerpo a cuerpo",
        "marketValue": 150,
        "strengthResistance": 100
    })
}

/// A valid candidate of the given type, conditional fields set as required.
fn candidate_of(card_type: CardType) -> Value {
    let mut body = scenario_a();
    let obj = body.as_object_mut().unwrap();
    obj.insert("cardType".into(), json!(card_type.as_str()));
    obj.remove("strengthResistance");
    if card_type.requires_strength_resistance() {
        obj.insert("strengthResistance".into(), json!(100));
    }
    if card_type.requires_loyalty() {
        obj.insert("loyalty".into(), json!(3));
    }
    body
}

fn error_code(validator: &CardValidator, candidate: &Value) -> ValidationErrorCode {
    validator
        .validate(candidate)
        .expect_err("candidate should be rejected")
        .code()
}

fn truthy() -> CardValidator {
    CardValidator::new(ValidationConfig::new(PresenceCheck::Truthy))
}

fn service() -> CardService<MemoryStore> {
    CardService::new(Arc::new(MemoryStore::new()), CardValidator::default())
}

// =============================================================================
// Conditional Field Tests
// =============================================================================

/// Every valid non-creature type refuses strengthResistance.
#[test]
fn test_strength_forbidden_on_every_non_creature() {
    let validator = CardValidator::default();

    for card_type in CardType::ALL.iter().filter(|t| **t != CardType::Creature) {
        let mut body = candidate_of(*card_type);
        assert!(validator.validate(&body).is_ok(), "{} baseline", card_type);

        body["strengthResistance"] = json!(100);
        assert_eq!(
            error_code(&validator, &body),
            ValidationErrorCode::ForbiddenConditionalField,
            "{}",
            card_type
        );
    }
}

/// A creature without strengthResistance is missing a conditional field.
#[test]
fn test_creature_requires_strength() {
    let mut body = candidate_of(CardType::Creature);
    body.as_object_mut().unwrap().remove("strengthResistance");

    assert_eq!(
        error_code(&CardValidator::default(), &body),
        ValidationErrorCode::MissingConditionalField
    );
}

/// Every valid non-planeswalker type refuses loyalty.
#[test]
fn test_loyalty_forbidden_on_every_non_planeswalker() {
    let validator = CardValidator::default();

    for card_type in CardType::ALL.iter().filter(|t| **t != CardType::Planeswalker) {
        let mut body = candidate_of(*card_type);
        body["loyalty"] = json!(4);
        assert_eq!(
            error_code(&validator, &body),
            ValidationErrorCode::ForbiddenConditionalField,
            "{}",
            card_type
        );
    }
}

/// Zero loyalty is present under the explicit rule and missing under the
/// truthy rule.
#[test]
fn test_zero_loyalty_depends_on_presence_rule() {
    let mut body = candidate_of(CardType::Planeswalker);
    body["loyalty"] = json!(0);

    let card = CardValidator::default().validate(&body).unwrap();
    assert_eq!(card.loyalty, Some(0.0));

    assert_eq!(
        error_code(&truthy(), &body),
        ValidationErrorCode::MissingConditionalField
    );
}

/// Under the truthy rule a falsy strength on a creature is missing, while
/// on another type the key's mere existence is still forbidden.
#[test]
fn test_truthy_rule_falsy_strength() {
    let mut creature = candidate_of(CardType::Creature);
    creature["strengthResistance"] = json!(0);
    assert_eq!(
        error_code(&truthy(), &creature),
        ValidationErrorCode::MissingConditionalField
    );

    let mut land = candidate_of(CardType::Land);
    land["strengthResistance"] = json!(0);
    assert_eq!(
        error_code(&truthy(), &land),
        ValidationErrorCode::ForbiddenConditionalField
    );
}

// =============================================================================
// Enumeration Tests
// =============================================================================

/// Every listed value passes; anything else is an invalid enum value.
#[test]
fn test_enumerations_are_closed() {
    let validator = CardValidator::default();

    for color in Color::ALL {
        let mut body = scenario_a();
        body["colorCategory"] = json!(color.as_str());
        assert_eq!(validator.validate(&body).unwrap().color_category, color);
    }
    for rarity in Rarity::ALL {
        let mut body = scenario_a();
        body["rarity"] = json!(rarity.as_str());
        assert_eq!(validator.validate(&body).unwrap().rarity, rarity);
    }
    for card_type in CardType::ALL {
        let card = validator.validate(&candidate_of(card_type)).unwrap();
        assert_eq!(card.card_type, card_type);
    }

    for (field, bad) in [
        ("colorCategory", json!("purple")),
        ("colorCategory", json!("Multicolor")),
        ("cardType", json!("tribal")),
        ("rarity", json!("legendary")),
        ("rarity", json!(2)),
    ] {
        let mut body = scenario_a();
        body[field] = bad.clone();
        let err = validator.validate(&body).unwrap_err();
        assert_eq!(err.code(), ValidationErrorCode::InvalidEnumValue, "{} = {}", field, bad);
        assert_eq!(err.field(), field);
    }
}

// =============================================================================
// Ordering and Type Tests
// =============================================================================

/// With several violations, the earliest check in field order is reported.
#[test]
fn test_first_failure_wins() {
    let mut body = scenario_a();
    body["name"] = json!(5);
    body["rarity"] = json!("legendary");
    body["cardType"] = json!("sorcery");

    let err = CardValidator::default().validate(&body).unwrap_err();
    assert_eq!(err.field(), "name");
    assert_eq!(err.message(), "Name must be a string");
}

/// Numeric fields accept JSON numbers only.
#[test]
fn test_numbers_are_not_coerced() {
    let validator = CardValidator::default();

    for field in ["localId", "manaCost", "marketValue", "strengthResistance"] {
        let mut body = scenario_a();
        body[field] = json!("16");
        assert_eq!(
            error_code(&validator, &body),
            ValidationErrorCode::TypeMismatch,
            "{}",
            field
        );
    }
}

/// A fractional local id is not an id.
#[test]
fn test_local_id_must_be_integral() {
    let validator = CardValidator::default();

    let mut body = scenario_a();
    body["localId"] = json!(3.0);
    assert_eq!(validator.validate(&body).unwrap().local_id, 3);

    body["localId"] = json!(3.5);
    assert!(validator.validate(&body).is_err());
}

// =============================================================================
// Idempotence
// =============================================================================

/// Validating the serialized form of a valid card returns the same card.
#[test]
fn test_validation_is_idempotent() {
    let validator = CardValidator::default();

    for card_type in CardType::ALL {
        let card = validator.validate(&candidate_of(card_type)).unwrap();
        let again = validator.validate(&card.to_value()).unwrap();
        assert_eq!(card, again);
    }
}

// =============================================================================
// Scenarios
// =============================================================================

/// Scenario A: a complete creature validates and is stored.
#[test]
fn test_scenario_a_creature_is_stored() {
    let svc = service();
    let card = svc.create(Some("jose"), &scenario_a()).unwrap();

    assert_eq!(card.name, "Cazador");
    assert_eq!(card.strength_resistance, Some(100.0));
    assert_eq!(
        svc.store().find_one(&CardKey::new("jose", 0)).unwrap(),
        Some(card)
    );
}

/// Scenario B: a sorcery that kept its strength is rejected.
#[test]
fn test_scenario_b_sorcery_with_strength() {
    let mut body = scenario_a();
    body["cardType"] = json!("sorcery");

    assert_eq!(
        error_code(&CardValidator::default(), &body),
        ValidationErrorCode::ForbiddenConditionalField
    );
}

/// Scenario C: a planeswalker without loyalty is rejected.
#[test]
fn test_scenario_c_planeswalker_without_loyalty() {
    let mut body = candidate_of(CardType::Planeswalker);
    body.as_object_mut().unwrap().remove("loyalty");

    assert_eq!(
        error_code(&CardValidator::default(), &body),
        ValidationErrorCode::MissingConditionalField
    );
}

/// Scenario D: a patch naming an unknown field is rejected wholesale.
#[test]
fn test_scenario_d_unknown_patch_field() {
    let svc = service();
    let stored = svc.create(Some("jose"), &scenario_a()).unwrap();

    let err = svc
        .update("jose", 0, &json!({"name": "Renamed", "power": 9}))
        .unwrap_err();
    match err {
        ServiceError::Validation(e) => {
            assert_eq!(e.code(), ValidationErrorCode::UnknownField);
            assert_eq!(e.field(), "power");
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    assert_eq!(svc.get("jose", 0).unwrap(), stored);
}

/// Scenario E: deleting a card that does not exist is NotFound.
#[test]
fn test_scenario_e_delete_missing() {
    let svc = service();
    assert!(svc.store().delete_one(&CardKey::new("jose", 99)).unwrap().is_none());
    assert!(svc.delete("jose", 99).unwrap_err().is_not_found());
}

// =============================================================================
// Round Trip
// =============================================================================

/// insert then find_one returns an equal record.
#[test]
fn test_insert_then_find_returns_equal_card() {
    let store = MemoryStore::new();
    let card: Card = CardValidator::default()
        .validate(&candidate_of(CardType::Planeswalker))
        .unwrap();

    store.insert(card.clone()).unwrap();
    assert_eq!(store.find_one(&card.key()).unwrap(), Some(card));
}

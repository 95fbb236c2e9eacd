//! In-memory card index shared by both store backends
//!
//! Keys are ordered (owner, local id), so all cards of one owner form a
//! contiguous range and listings come back sorted by local id.

use std::collections::BTreeMap;

use crate::card::{Card, CardKey};

use super::errors::{StoreError, StoreResult};

/// Ordered map of key -> card
#[derive(Debug, Default, Clone)]
pub struct CardIndex {
    cards: BTreeMap<CardKey, Card>,
}

impl CardIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored cards
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// All cards of `owner`, ordered by local id
    pub fn list_by_owner(&self, owner: &str) -> Vec<Card> {
        let lo = CardKey::new(owner, i64::MIN);
        let hi = CardKey::new(owner, i64::MAX);
        self.cards.range(lo..=hi).map(|(_, card)| card.clone()).collect()
    }

    pub fn get(&self, key: &CardKey) -> Option<&Card> {
        self.cards.get(key)
    }

    pub fn contains(&self, key: &CardKey) -> bool {
        self.cards.contains_key(key)
    }

    /// Fails with `DuplicateKey` if `key` is taken
    pub fn ensure_vacant(&self, key: &CardKey) -> StoreResult<()> {
        if self.cards.contains_key(key) {
            return Err(StoreError::duplicate_key(key));
        }
        Ok(())
    }

    /// Whether the card under `key` is still `expected`.
    ///
    /// `Ok(false)` if nothing is stored there, `Conflict` if something else is.
    pub fn ensure_unchanged(&self, key: &CardKey, expected: &Card) -> StoreResult<bool> {
        match self.cards.get(key) {
            None => Ok(false),
            Some(current) if current == expected => Ok(true),
            Some(_) => Err(StoreError::conflict(key)),
        }
    }

    /// Fails with `DuplicateKey` if moving `old` to `new` would collide
    pub fn ensure_rekey_allowed(&self, old: &CardKey, new: &CardKey) -> StoreResult<()> {
        if old != new {
            self.ensure_vacant(new)?;
        }
        Ok(())
    }

    /// Stores `card` under its own key, overwriting any previous card there
    pub fn put(&mut self, card: Card) {
        self.cards.insert(card.key(), card);
    }

    pub fn remove(&mut self, key: &CardKey) -> Option<Card> {
        self.cards.remove(key)
    }

    /// Removes `old` and stores `card` under its own key
    pub fn replace(&mut self, old: &CardKey, card: Card) {
        self.cards.remove(old);
        self.put(card);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardType, Color, Rarity};

    fn land(owner: &str, local_id: i64) -> Card {
        Card {
            owner: owner.into(),
            local_id,
            name: "Island".into(),
            mana_cost: 0.0,
            color_category: Color::Colorless,
            card_type: CardType::Land,
            rarity: Rarity::Common,
            rules_text: String::new(),
            market_value: 0.1,
            strength_resistance: None,
            loyalty: None,
        }
    }

    #[test]
    fn test_list_by_owner_is_scoped_and_sorted() {
        let mut index = CardIndex::new();
        index.put(land("jose", 5));
        index.put(land("ana", 1));
        index.put(land("jose", -3));
        index.put(land("josefa", 0));

        let ids: Vec<i64> = index.list_by_owner("jose").iter().map(|c| c.local_id).collect();
        assert_eq!(ids, vec![-3, 5]);
        assert!(index.list_by_owner("nobody").is_empty());
    }

    #[test]
    fn test_same_local_id_under_two_owners() {
        let mut index = CardIndex::new();
        index.put(land("jose", 0));
        index.put(land("ana", 0));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_rekey_collision_detected() {
        let mut index = CardIndex::new();
        index.put(land("jose", 0));
        index.put(land("jose", 1));

        let old = CardKey::new("jose", 0);
        assert!(index.ensure_rekey_allowed(&old, &old).is_ok());
        assert!(index.ensure_rekey_allowed(&old, &CardKey::new("jose", 2)).is_ok());
        assert!(index.ensure_rekey_allowed(&old, &CardKey::new("jose", 1)).is_err());
    }

    #[test]
    fn test_stale_expectation_is_a_conflict() {
        let mut index = CardIndex::new();
        let original = land("jose", 0);
        index.put(original.clone());

        let key = CardKey::new("jose", 0);
        assert!(index.ensure_unchanged(&key, &original).unwrap());
        assert!(!index.ensure_unchanged(&CardKey::new("jose", 1), &original).unwrap());

        let mut repriced = original.clone();
        repriced.market_value = 2.0;
        index.put(repriced);

        let err = index.ensure_unchanged(&key, &original).unwrap_err();
        assert_eq!(err.code(), crate::store::StoreErrorCode::Conflict);
    }

    #[test]
    fn test_replace_moves_card() {
        let mut index = CardIndex::new();
        index.put(land("jose", 0));
        index.replace(&CardKey::new("jose", 0), land("jose", 9));

        assert!(!index.contains(&CardKey::new("jose", 0)));
        assert!(index.get(&CardKey::new("jose", 9)).is_some());
        assert_eq!(index.len(), 1);
    }
}

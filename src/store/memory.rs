//! Volatile record store
//!
//! Suitable for tests and throwaway deployments. Contents are lost when
//! the process exits.

use std::sync::RwLock;

use crate::card::{Card, CardKey};

use super::errors::{StoreError, StoreResult};
use super::index::CardIndex;
use super::RecordStore;

/// In-memory `RecordStore`
#[derive(Debug, Default)]
pub struct MemoryStore {
    cards: RwLock<CardIndex>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored cards across all owners
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, CardIndex>> {
        self.cards
            .read()
            .map_err(|_| StoreError::internal("Lock poisoned"))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, CardIndex>> {
        self.cards
            .write()
            .map_err(|_| StoreError::internal("Lock poisoned"))
    }
}

impl RecordStore for MemoryStore {
    fn list_by_owner(&self, owner: &str) -> StoreResult<Vec<Card>> {
        Ok(self.read()?.list_by_owner(owner))
    }

    fn find_one(&self, key: &CardKey) -> StoreResult<Option<Card>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn insert(&self, card: Card) -> StoreResult<Card> {
        let mut cards = self.write()?;
        cards.ensure_vacant(&card.key())?;
        cards.put(card.clone());
        Ok(card)
    }

    fn update_one(
        &self,
        key: &CardKey,
        expected: &Card,
        replacement: Card,
    ) -> StoreResult<Option<Card>> {
        let mut cards = self.write()?;
        if !cards.ensure_unchanged(key, expected)? {
            return Ok(None);
        }
        cards.ensure_rekey_allowed(key, &replacement.key())?;
        cards.replace(key, replacement.clone());
        Ok(Some(replacement))
    }

    fn delete_one(&self, key: &CardKey) -> StoreResult<Option<Card>> {
        Ok(self.write()?.remove(key))
    }
}

//! Card service: Validator -> RecordStore
//!
//! Write paths (create, update) validate before touching the store. Read
//! paths (list, get, delete) go straight to the store.

use std::sync::Arc;

use serde_json::Value;

use crate::card::{Card, CardKey};
use crate::observability::Event;
use crate::store::{RecordStore, StoreErrorCode};
use crate::validation::{CardValidator, ValidationError};

use super::errors::{ServiceError, ServiceResult};

/// Conditional writes attempted by one update before the conflict is reported
const UPDATE_ATTEMPTS: usize = 8;

/// Card operations over a shared store
pub struct CardService<S: RecordStore + ?Sized> {
    store: Arc<S>,
    validator: CardValidator,
}

impl<S: RecordStore + ?Sized> Clone for CardService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            validator: self.validator,
        }
    }
}

impl<S: RecordStore + ?Sized> CardService<S> {
    pub fn new(store: Arc<S>, validator: CardValidator) -> Self {
        Self { store, validator }
    }

    /// The validator used on every write
    pub fn validator(&self) -> &CardValidator {
        &self.validator
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Validates `body` and stores it as a new card.
    ///
    /// `owner_ctx` is the ownership context of the request; without one the
    /// request is rejected before validation runs.
    pub fn create(&self, owner_ctx: Option<&str>, body: &Value) -> ServiceResult<Card> {
        require_owner(owner_ctx)?;

        let card = self.validator.validate(body).map_err(rejected)?;
        let card = self.store.insert(card)?;

        tracing::info!(
            event = Event::CardCreated.as_str(),
            owner = %card.owner,
            local_id = card.local_id,
            card_type = %card.card_type
        );
        Ok(card)
    }

    /// All cards of `owner`. An empty list is a valid result.
    pub fn list(&self, owner: &str) -> ServiceResult<Vec<Card>> {
        Ok(self.store.list_by_owner(owner)?)
    }

    /// The card under `(owner, local_id)`
    pub fn get(&self, owner: &str, local_id: i64) -> ServiceResult<Card> {
        let key = CardKey::new(owner, local_id);
        self.store
            .find_one(&key)?
            .ok_or(ServiceError::NotFound(key))
    }

    /// Applies a partial update.
    ///
    /// The patch is screened for unknown fields, merged over the stored
    /// card, and the merged result is validated in full before the store
    /// sees it. The write only lands if the stored card is still the one
    /// the patch was merged over; otherwise the merge is redone against
    /// the newer card. Nothing changes unless every step succeeds.
    pub fn update(&self, owner: &str, local_id: i64, patch: &Value) -> ServiceResult<Card> {
        let key = CardKey::new(owner, local_id);

        let fields = self.validator.check_patch_fields(patch).map_err(rejected)?;

        let mut attempt = 1;
        loop {
            let existing = self
                .store
                .find_one(&key)?
                .ok_or_else(|| ServiceError::NotFound(key.clone()))?;

            let merged = self.validator.merge_patch(&existing, fields);
            let card = self.validator.validate(&merged).map_err(rejected)?;

            match self.store.update_one(&key, &existing, card) {
                Ok(Some(card)) => {
                    tracing::info!(
                        event = Event::CardUpdated.as_str(),
                        owner = %key.owner,
                        local_id = key.local_id,
                        new_key = %card.key(),
                        attempt
                    );
                    return Ok(card);
                }
                // deleted between the read and the write
                Ok(None) => return Err(ServiceError::NotFound(key)),
                Err(err) if err.code() == StoreErrorCode::Conflict && attempt < UPDATE_ATTEMPTS => {
                    tracing::debug!(
                        owner = %key.owner,
                        local_id = key.local_id,
                        attempt,
                        "card changed during update, merging again"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Removes and returns the card under `(owner, local_id)`
    pub fn delete(&self, owner: &str, local_id: i64) -> ServiceResult<Card> {
        let key = CardKey::new(owner, local_id);
        let card = self
            .store
            .delete_one(&key)?
            .ok_or_else(|| ServiceError::NotFound(key.clone()))?;

        tracing::info!(
            event = Event::CardDeleted.as_str(),
            owner = %key.owner,
            local_id = key.local_id
        );
        Ok(card)
    }
}

fn require_owner(owner_ctx: Option<&str>) -> ServiceResult<&str> {
    match owner_ctx {
        Some(owner) if !owner.is_empty() => Ok(owner),
        _ => Err(ServiceError::MissingOwner),
    }
}

fn rejected(err: ValidationError) -> ServiceError {
    tracing::debug!(
        event = Event::ValidationRejected.as_str(),
        code = err.code().code(),
        field = err.field(),
        "{}",
        err.message()
    );
    ServiceError::Validation(err)
}

//! Record store subsystem for cardvault
//!
//! The store owns key uniqueness and existence checks. It does not know
//! the categorical card rules: callers validate before every write.
//!
//! # Design Principles
//!
//! - `(owner, localId)` is unique across the store
//! - Each call is atomic on its own; there are no multi-record transactions
//! - Absence is a value (`Ok(None)`), not an error, for update and delete
//! - Storage failures surface as errors and are never retried here

mod checksum;
mod errors;
mod file;
mod index;
mod memory;
mod reader;
mod record;
mod writer;

pub use errors::{Severity, StoreError, StoreErrorCode, StoreResult};
pub use file::{FileStore, LOG_FILE_NAME};
pub use memory::MemoryStore;

use crate::card::{Card, CardKey};

/// Keyed card storage.
///
/// Implementations may be called concurrently from many requests.
pub trait RecordStore: Send + Sync {
    /// All cards of `owner`, ordered by local id. Empty when there are none.
    fn list_by_owner(&self, owner: &str) -> StoreResult<Vec<Card>>;

    /// The card stored under `key`, if any
    fn find_one(&self, key: &CardKey) -> StoreResult<Option<Card>>;

    /// Stores a new card.
    ///
    /// # Errors
    ///
    /// `STORE_DUPLICATE_KEY` if a card already exists under the card's key.
    fn insert(&self, card: Card) -> StoreResult<Card>;

    /// Replaces the card under `key` with an already merged and validated
    /// record, provided the stored card still equals `expected`. The
    /// replacement may carry a different key, in which case the card moves.
    ///
    /// Returns `Ok(None)` if nothing is stored under `key`.
    ///
    /// # Errors
    ///
    /// - `STORE_WRITE_CONFLICT` if the stored card differs from `expected`
    /// - `STORE_DUPLICATE_KEY` if the card would move onto an occupied key
    fn update_one(
        &self,
        key: &CardKey,
        expected: &Card,
        replacement: Card,
    ) -> StoreResult<Option<Card>>;

    /// Removes and returns the card under `key`, or `Ok(None)` if none matched.
    fn delete_one(&self, key: &CardKey) -> StoreResult<Option<Card>>;
}

//! Durable record store backed by an append-only log
//!
//! Layout: `<data_dir>/cards.log`.
//!
//! On open the whole log is replayed into an in-memory index (latest
//! record per key wins, tombstones remove). Every mutation appends exactly
//! one record and fsyncs it before the index changes, so a failed write
//! leaves both disk and memory as they were.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::card::{Card, CardKey};

use super::errors::{StoreError, StoreResult};
use super::index::CardIndex;
use super::reader::LogReader;
use super::record::{LogRecord, RecordKind};
use super::writer::LogWriter;
use super::RecordStore;

/// File name of the card log inside the data directory
pub const LOG_FILE_NAME: &str = "cards.log";

struct FileState {
    writer: LogWriter,
    cards: CardIndex,
}

/// Durable `RecordStore`
pub struct FileStore {
    state: RwLock<FileState>,
}

impl FileStore {
    /// Opens (or creates) the store under `data_dir`.
    ///
    /// # Errors
    ///
    /// - `STORE_IO_ERROR` if the directory or log cannot be opened
    /// - `STORE_DATA_CORRUPTION` if any log record fails verification
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        Self::open_log(&data_dir.join(LOG_FILE_NAME))
    }

    /// Opens (or creates) the store at an explicit log path.
    pub fn open_log(path: &Path) -> StoreResult<Self> {
        let cards = replay(path)?;
        let writer = LogWriter::open(path)?;

        tracing::debug!(
            path = %path.display(),
            cards = cards.len(),
            bytes = writer.current_offset(),
            "card log replayed"
        );

        Ok(Self {
            state: RwLock::new(FileState { writer, cards }),
        })
    }

    /// Path of the underlying log file
    pub fn path(&self) -> StoreResult<PathBuf> {
        Ok(self.read()?.writer.path().to_path_buf())
    }

    /// Number of live cards across all owners
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.cards.len())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, FileState>> {
        self.state
            .read()
            .map_err(|_| StoreError::internal("Lock poisoned"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, FileState>> {
        self.state
            .write()
            .map_err(|_| StoreError::internal("Lock poisoned"))
    }
}

impl RecordStore for FileStore {
    fn list_by_owner(&self, owner: &str) -> StoreResult<Vec<Card>> {
        Ok(self.read()?.cards.list_by_owner(owner))
    }

    fn find_one(&self, key: &CardKey) -> StoreResult<Option<Card>> {
        Ok(self.read()?.cards.get(key).cloned())
    }

    fn insert(&self, card: Card) -> StoreResult<Card> {
        let mut state = self.write()?;
        state.cards.ensure_vacant(&card.key())?;

        state.writer.append(&LogRecord::put(&card)?)?;
        state.cards.put(card.clone());
        Ok(card)
    }

    fn update_one(
        &self,
        key: &CardKey,
        expected: &Card,
        replacement: Card,
    ) -> StoreResult<Option<Card>> {
        let mut state = self.write()?;
        if !state.cards.ensure_unchanged(key, expected)? {
            return Ok(None);
        }

        let new_key = replacement.key();
        state.cards.ensure_rekey_allowed(key, &new_key)?;

        let record = if new_key == *key {
            LogRecord::put(&replacement)?
        } else {
            LogRecord::replace(key, &replacement)?
        };
        state.writer.append(&record)?;
        state.cards.replace(key, replacement.clone());
        Ok(Some(replacement))
    }

    fn delete_one(&self, key: &CardKey) -> StoreResult<Option<Card>> {
        let mut state = self.write()?;
        if !state.cards.contains(key) {
            return Ok(None);
        }

        state.writer.append(&LogRecord::tombstone(key))?;
        Ok(state.cards.remove(key))
    }
}

/// Rebuilds the index from the log at `path`. A missing or empty log is an empty store.
fn replay(path: &Path) -> StoreResult<CardIndex> {
    let mut cards = CardIndex::new();

    match fs::metadata(path) {
        Ok(m) if m.len() == 0 => return Ok(cards),
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(cards),
        Err(e) => return Err(StoreError::io_error("Failed to read card log metadata", e)),
    }

    let mut reader = LogReader::open(path)?;
    loop {
        let offset = reader.current_offset();
        let record = match reader.read_next()? {
            Some(record) => record,
            None => break,
        };

        match record.kind {
            RecordKind::Put => {
                let card = decode(&record, offset)?;
                if !card.has_key(&record.key) {
                    return Err(StoreError::corruption_at_offset(
                        offset,
                        format!("Put record key '{}' does not match its card", record.key),
                    ));
                }
                cards.put(card);
            }
            RecordKind::Tombstone => {
                cards.remove(&record.key);
            }
            RecordKind::Replace => {
                let card = decode(&record, offset)?;
                cards.replace(&record.key, card);
            }
        }
    }

    Ok(cards)
}

fn decode(record: &LogRecord, offset: u64) -> StoreResult<Card> {
    record
        .card()
        .map_err(|e| StoreError::corruption_at_offset(offset, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardType, Color, Rarity};
    use crate::store::StoreErrorCode;
    use tempfile::TempDir;

    fn artifact(local_id: i64, name: &str) -> Card {
        Card {
            owner: "jose".into(),
            local_id,
            name: name.into(),
            mana_cost: 1.0,
            color_category: Color::Colorless,
            card_type: CardType::Artifact,
            rarity: Rarity::Rare,
            rules_text: "T: Add one mana of any color.".into(),
            market_value: 9.99,
            strength_resistance: None,
            loyalty: None,
        }
    }

    #[test]
    fn test_empty_directory_opens_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.len().unwrap(), 0);
        assert!(store.path().unwrap().ends_with(LOG_FILE_NAME));
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store.insert(artifact(0, "Mox")).unwrap();
            let ring = store.insert(artifact(1, "Sol Ring")).unwrap();
            let lotus = store.insert(artifact(2, "Lotus")).unwrap();
            store
                .update_one(&CardKey::new("jose", 1), &ring, artifact(1, "Sol Ring Foil"))
                .unwrap();
            store
                .update_one(&CardKey::new("jose", 2), &lotus, artifact(5, "Lotus"))
                .unwrap();
            store.delete_one(&CardKey::new("jose", 0)).unwrap();
        }

        let store = FileStore::open(dir.path()).unwrap();
        let ids: Vec<i64> = store.list_by_owner("jose").unwrap().iter().map(|c| c.local_id).collect();
        assert_eq!(ids, vec![1, 5]);
        assert_eq!(
            store.find_one(&CardKey::new("jose", 1)).unwrap().unwrap().name,
            "Sol Ring Foil"
        );
    }

    #[test]
    fn test_rejected_writes_append_nothing() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let mox = store.insert(artifact(0, "Mox")).unwrap();
        let size = fs::metadata(store.path().unwrap()).unwrap().len();

        let err = store.insert(artifact(0, "Mox again")).unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::DuplicateKey);
        assert!(store.delete_one(&CardKey::new("jose", 42)).unwrap().is_none());
        assert!(store
            .update_one(&CardKey::new("jose", 42), &artifact(42, "Nothing"), artifact(42, "Nothing"))
            .unwrap()
            .is_none());

        let stale = artifact(0, "Mox Pearl");
        let err = store
            .update_one(&CardKey::new("jose", 0), &stale, artifact(0, "Mox Emerald"))
            .unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::Conflict);
        assert_eq!(store.find_one(&CardKey::new("jose", 0)).unwrap(), Some(mox));

        assert_eq!(fs::metadata(store.path().unwrap()).unwrap().len(), size);
    }

    #[test]
    fn test_corrupted_log_refuses_to_open() {
        let dir = TempDir::new().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store.insert(artifact(0, "Mox")).unwrap();
        }

        let path = dir.path().join(LOG_FILE_NAME);
        let mut bytes = fs::read(&path).unwrap();
        let last = bytes.len() - 6;
        bytes[last] ^= 0xFF;
        fs::write(&path, bytes).unwrap();

        let err = FileStore::open(dir.path()).err().unwrap();
        assert_eq!(err.code(), StoreErrorCode::Corruption);
    }
}

//! Log record format for the file-backed store
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE)
//! +------------------+
//! | Kind             | (u8: 0 = put, 1 = tombstone, 2 = replace)
//! +------------------+
//! | Owner            | (length-prefixed string)
//! +------------------+
//! | Local Id         | (i64 LE)
//! +------------------+
//! | Card Body        | (length-prefixed JSON bytes, empty for tombstones)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! The key field names the record being written or removed. For a replace,
//! it names the record being removed and the body carries its successor,
//! which may live under a different key.
//!
//! Checksum covers all bytes except the checksum itself.

use std::io::{self, Read};

use crate::card::{Card, CardKey};

use super::checksum::compute_checksum;
use super::errors::{StoreError, StoreResult};

/// Smallest possible record: length + kind + empty owner + id + empty body + checksum
pub const MIN_RECORD_SIZE: usize = 4 + 1 + 4 + 8 + 4 + 4;

/// What a log record does on replay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Insert or overwrite the card under the key
    Put,
    /// Remove the card under the key
    Tombstone,
    /// Remove the card under the key and store the body under its own key
    Replace,
}

impl RecordKind {
    fn to_byte(self) -> u8 {
        match self {
            RecordKind::Put => 0,
            RecordKind::Tombstone => 1,
            RecordKind::Replace => 2,
        }
    }

    fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(RecordKind::Put),
            1 => Some(RecordKind::Tombstone),
            2 => Some(RecordKind::Replace),
            _ => None,
        }
    }
}

/// One entry in the card log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub kind: RecordKind,
    pub key: CardKey,
    /// Card JSON (empty for tombstones)
    pub body: Vec<u8>,
}

impl LogRecord {
    /// Record that stores `card` under its own key
    pub fn put(card: &Card) -> StoreResult<Self> {
        Ok(Self {
            kind: RecordKind::Put,
            key: card.key(),
            body: encode_card(card)?,
        })
    }

    /// Record that removes the card under `key`
    pub fn tombstone(key: &CardKey) -> Self {
        Self {
            kind: RecordKind::Tombstone,
            key: key.clone(),
            body: Vec::new(),
        }
    }

    /// Record that removes `old` and stores `card` under its own key
    pub fn replace(old: &CardKey, card: &Card) -> StoreResult<Self> {
        Ok(Self {
            kind: RecordKind::Replace,
            key: old.clone(),
            body: encode_card(card)?,
        })
    }

    /// Decodes the card carried by a put or replace record
    pub fn card(&self) -> io::Result<Card> {
        serde_json::from_slice(&self.body).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid card body for '{}': {}", self.key, e),
            )
        })
    }

    fn serialize_body(&self) -> Vec<u8> {
        let owner = self.key.owner.as_bytes();
        let mut buf = Vec::with_capacity(1 + 4 + owner.len() + 8 + 4 + self.body.len());

        buf.push(self.kind.to_byte());

        buf.extend_from_slice(&(owner.len() as u32).to_le_bytes());
        buf.extend_from_slice(owner);

        buf.extend_from_slice(&self.key.local_id.to_le_bytes());

        buf.extend_from_slice(&(self.body.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.body);

        buf
    }

    /// Serializes the complete record, length prefix and checksum included.
    pub fn serialize(&self) -> Vec<u8> {
        let body = self.serialize_body();
        let record_length = (4 + body.len() + 4) as u32;

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&body);

        let checksum = compute_checksum(&record);
        record.extend_from_slice(&checksum.to_le_bytes());

        record
    }

    /// Deserializes a record, verifying its checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Record too short",
            ));
        }

        let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if record_length < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if data.len() < record_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Record truncated: expected {} bytes, got {}",
                    record_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = record_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        let computed_checksum = compute_checksum(&data[0..checksum_offset]);

        if computed_checksum != stored_checksum {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    computed_checksum, stored_checksum
                ),
            ));
        }

        let mut cursor = io::Cursor::new(&data[4..checksum_offset]);

        let mut kind_buf = [0u8; 1];
        cursor.read_exact(&mut kind_buf)?;
        let kind = RecordKind::from_byte(kind_buf[0]).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unknown record kind: {}", kind_buf[0]),
            )
        })?;

        let owner = String::from_utf8(read_bytes(&mut cursor)?).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e))
        })?;

        let mut id_buf = [0u8; 8];
        cursor.read_exact(&mut id_buf)?;
        let local_id = i64::from_le_bytes(id_buf);

        let body = read_bytes(&mut cursor)?;

        Ok((
            Self {
                kind,
                key: CardKey::new(owner, local_id),
                body,
            },
            record_length,
        ))
    }
}

fn read_bytes<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf) as usize;

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

fn encode_card(card: &Card) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(card)
        .map_err(|e| StoreError::internal(format!("Failed to encode card '{}': {}", card.key(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardType, Color, Rarity};

    fn sample_card() -> Card {
        Card {
            owner: "jose".into(),
            local_id: 7,
            name: "Liliana".into(),
            mana_cost: 5.0,
            color_category: Color::Black,
            card_type: CardType::Planeswalker,
            rarity: Rarity::MythicRare,
            rules_text: "+2: Each player discards a card.".into(),
            market_value: 42.0,
            strength_resistance: None,
            loyalty: Some(3.0),
        }
    }

    #[test]
    fn test_put_record_roundtrip() {
        let record = LogRecord::put(&sample_card()).unwrap();
        let bytes = record.serialize();
        let (decoded, consumed) = LogRecord::deserialize(&bytes).unwrap();

        assert_eq!(decoded, record);
        assert_eq!(consumed, bytes.len());
        assert_eq!(decoded.card().unwrap(), sample_card());
    }

    #[test]
    fn test_tombstone_has_empty_body() {
        let record = LogRecord::tombstone(&CardKey::new("jose", 7));
        let bytes = record.serialize();
        assert_eq!(bytes.len(), MIN_RECORD_SIZE + "jose".len());

        let (decoded, _) = LogRecord::deserialize(&bytes).unwrap();
        assert_eq!(decoded.kind, RecordKind::Tombstone);
        assert!(decoded.body.is_empty());
    }

    #[test]
    fn test_replace_keeps_old_key() {
        let mut card = sample_card();
        card.local_id = 8;
        let record = LogRecord::replace(&CardKey::new("jose", 7), &card).unwrap();
        let (decoded, _) = LogRecord::deserialize(&record.serialize()).unwrap();

        assert_eq!(decoded.kind, RecordKind::Replace);
        assert_eq!(decoded.key, CardKey::new("jose", 7));
        assert_eq!(decoded.card().unwrap().local_id, 8);
    }

    #[test]
    fn test_checksum_detects_corruption() {
        let mut bytes = LogRecord::put(&sample_card()).unwrap().serialize();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xFF;

        let err = LogRecord::deserialize(&bytes).unwrap_err();
        assert!(err.to_string().contains("Checksum mismatch"));
    }

    #[test]
    fn test_truncated_record_rejected() {
        let bytes = LogRecord::put(&sample_card()).unwrap().serialize();
        let err = LogRecord::deserialize(&bytes[..bytes.len() - 3]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_negative_local_id_survives() {
        let mut card = sample_card();
        card.local_id = -42;
        let record = LogRecord::put(&card).unwrap();
        let (decoded, _) = LogRecord::deserialize(&record.serialize()).unwrap();
        assert_eq!(decoded.key.local_id, -42);
    }
}

//! Card model for cardvault
//!
//! A card is the only managed entity. It is keyed by `(owner, localId)`
//! and carries categorical fields whose presence depends on its type:
//!
//! - `strengthResistance` exists exactly on creatures
//! - `loyalty` exists exactly on planeswalkers
//!
//! Construction of a `Card` from untrusted input goes through the
//! validator; the types here only describe the shape.

mod types;

pub use types::{Card, CardKey, CardType, Color, Rarity, CARD_FIELDS};

//! Card type definitions
//!
//! Wire names (camelCase):
//! - owner, localId, name, manaCost, colorCategory, cardType, rarity,
//!   rulesText, marketValue, strengthResistance, loyalty

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Every field name a card may carry. Update patches are screened against this set.
pub const CARD_FIELDS: [&str; 11] = [
    "owner",
    "localId",
    "name",
    "manaCost",
    "colorCategory",
    "cardType",
    "rarity",
    "rulesText",
    "marketValue",
    "strengthResistance",
    "loyalty",
];

/// Color category of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
    Multicolor,
}

impl Color {
    /// All members in declaration order
    pub const ALL: [Color; 7] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Colorless,
        Color::Multicolor,
    ];

    /// Returns the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Blue => "blue",
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
            Color::Colorless => "colorless",
            Color::Multicolor => "multicolor",
        }
    }

    /// Parses a wire name. Matching is exact and case-sensitive.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Card type. Decides which categorical fields a card carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardType {
    Creature,
    Enchantment,
    Artifact,
    Instant,
    Sorcery,
    Planeswalker,
    Land,
}

impl CardType {
    /// All members in declaration order
    pub const ALL: [CardType; 7] = [
        CardType::Creature,
        CardType::Enchantment,
        CardType::Artifact,
        CardType::Instant,
        CardType::Sorcery,
        CardType::Planeswalker,
        CardType::Land,
    ];

    /// Returns the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Creature => "creature",
            CardType::Enchantment => "enchantment",
            CardType::Artifact => "artifact",
            CardType::Instant => "instant",
            CardType::Sorcery => "sorcery",
            CardType::Planeswalker => "planeswalker",
            CardType::Land => "land",
        }
    }

    /// Parses a wire name. Matching is exact and case-sensitive.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Whether `strengthResistance` must be present (and is allowed at all)
    pub fn requires_strength_resistance(&self) -> bool {
        matches!(self, CardType::Creature)
    }

    /// Whether `loyalty` must be present (and is allowed at all)
    pub fn requires_loyalty(&self) -> bool {
        matches!(self, CardType::Planeswalker)
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Card rarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    MythicRare,
}

impl Rarity {
    /// All members in declaration order
    pub const ALL: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::MythicRare,
    ];

    /// Returns the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::MythicRare => "mythicRare",
        }
    }

    /// Parses a wire name. Matching is exact and case-sensitive.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Composite primary key: owner first, then the owner-scoped id.
///
/// Ordering follows the tuple, so a range over one owner is contiguous.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardKey {
    pub owner: String,
    pub local_id: i64,
}

impl CardKey {
    pub fn new(owner: impl Into<String>, local_id: i64) -> Self {
        Self {
            owner: owner.into(),
            local_id,
        }
    }
}

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.local_id)
    }
}

/// A validated card record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub owner: String,
    pub local_id: i64,
    pub name: String,
    pub mana_cost: f64,
    pub color_category: Color,
    pub card_type: CardType,
    pub rarity: Rarity,
    pub rules_text: String,
    pub market_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength_resistance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loyalty: Option<f64>,
}

impl Card {
    /// Returns the primary key of this card
    pub fn key(&self) -> CardKey {
        CardKey::new(self.owner.clone(), self.local_id)
    }

    /// Whether the owner and local id match the given key
    pub fn has_key(&self, key: &CardKey) -> bool {
        self.owner == key.owner && self.local_id == key.local_id
    }

    /// The card's fields keyed by wire name. Absent optional fields are left out.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("owner".into(), Value::from(self.owner.as_str()));
        map.insert("localId".into(), Value::from(self.local_id));
        map.insert("name".into(), Value::from(self.name.as_str()));
        map.insert("manaCost".into(), Value::from(self.mana_cost));
        map.insert("colorCategory".into(), Value::from(self.color_category.as_str()));
        map.insert("cardType".into(), Value::from(self.card_type.as_str()));
        map.insert("rarity".into(), Value::from(self.rarity.as_str()));
        map.insert("rulesText".into(), Value::from(self.rules_text.as_str()));
        map.insert("marketValue".into(), Value::from(self.market_value));
        if let Some(strength) = self.strength_resistance {
            map.insert("strengthResistance".into(), Value::from(strength));
        }
        if let Some(loyalty) = self.loyalty {
            map.insert("loyalty".into(), Value::from(loyalty));
        }
        map
    }

    /// Converts the card to its JSON wire form
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }
}

//! Card records.
//!
//! `Card` holds the queryable data of one printing. Multi-faced cards
//! (split, transform, adventure, ...) carry one `CardFace` per face; the
//! attributes that are printed per face live there, everything else is
//! per card.
//!
//! ## Example
//!
//! ```
//! use card_filter::cards::{Card, CardId, Legality};
//!
//! let bolt = Card::new(CardId::new("lea-161"), "Lightning Bolt")
//!     .with_mana_cost("{R}".parse().unwrap())
//!     .with_type_line("Instant")
//!     .with_mana_value(1.0)
//!     .with_legality("legacy", Legality::Legal);
//!
//! assert_eq!(bolt.name(), "Lightning Bolt");
//! assert!(bolt.legal_in("legacy"));
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{de, Deserialize, Deserializer, Serialize};
use smallvec::{smallvec, SmallVec};

use super::color::ColorSet;
use super::mana::ManaCost;
use super::types::{CombatStat, Legality, TypeLine};

/// Stable identifier of a card printing.
///
/// Identifiers survive database updates, which is why categories store
/// them instead of card records.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub String);

impl CardId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The set a card was printed in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expansion {
    pub name: String,
    pub code: String,
    /// Block name, empty for sets outside any block.
    pub block: String,
}

impl Expansion {
    #[must_use]
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            block: String::new(),
        }
    }

    #[must_use]
    pub fn with_block(mut self, block: impl Into<String>) -> Self {
        self.block = block.into();
        self
    }
}

/// One face of a card.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CardFace {
    pub name: String,
    pub mana_cost: ManaCost,
    pub type_line: TypeLine,
    pub rules_text: String,
    pub flavor_text: String,
    pub power: Option<CombatStat>,
    pub toughness: Option<CombatStat>,
    pub loyalty: Option<CombatStat>,
}

impl CardFace {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_mana_cost(mut self, cost: ManaCost) -> Self {
        self.mana_cost = cost;
        self
    }

    #[must_use]
    pub fn with_type_line(mut self, line: &str) -> Self {
        self.type_line = TypeLine::parse(line);
        self
    }

    #[must_use]
    pub fn with_rules_text(mut self, text: impl Into<String>) -> Self {
        self.rules_text = text.into();
        self
    }

    #[must_use]
    pub fn with_power_toughness(mut self, power: &str, toughness: &str) -> Self {
        self.power = Some(CombatStat::new(power));
        self.toughness = Some(CombatStat::new(toughness));
        self
    }

    #[must_use]
    pub fn with_loyalty(mut self, loyalty: &str) -> Self {
        self.loyalty = Some(CombatStat::new(loyalty));
        self
    }
}

/// A card printing.
///
/// A card always has at least one face. The single-face builder methods
/// (`with_mana_cost`, `with_type_line`, ...) edit the front face.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    #[serde(deserialize_with = "non_empty_faces")]
    faces: SmallVec<[CardFace; 2]>,
    pub layout: String,
    pub mana_value: f64,
    pub colors: ColorSet,
    pub color_identity: ColorSet,
    pub rarity: String,
    pub expansion: Expansion,
    pub artist: String,
    pub number: String,
    pub legality: BTreeMap<String, Legality>,
    pub tags: BTreeSet<String>,
}

fn non_empty_faces<'de, D>(deserializer: D) -> Result<SmallVec<[CardFace; 2]>, D::Error>
where
    D: Deserializer<'de>,
{
    let faces = SmallVec::<[CardFace; 2]>::deserialize(deserializer)?;
    if faces.is_empty() {
        return Err(de::Error::invalid_length(0, &"at least one face"));
    }
    Ok(faces)
}

impl Card {
    /// Create a single-faced card with empty attributes.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>) -> Self {
        Self {
            id,
            faces: smallvec![CardFace::new(name)],
            layout: "normal".to_string(),
            mana_value: 0.0,
            colors: ColorSet::new(),
            color_identity: ColorSet::new(),
            rarity: String::new(),
            expansion: Expansion::default(),
            artist: String::new(),
            number: String::new(),
            legality: BTreeMap::new(),
            tags: BTreeSet::new(),
        }
    }

    /// Create a multi-faced card.
    ///
    /// Returns `None` if `faces` is empty.
    #[must_use]
    pub fn with_faces(id: CardId, faces: impl IntoIterator<Item = CardFace>) -> Option<Self> {
        let faces: SmallVec<[CardFace; 2]> = faces.into_iter().collect();
        let front = faces.first()?.name.clone();
        let mut card = Self::new(id, front);
        card.faces = faces;
        Some(card)
    }

    /// Full name; faces are joined with ` // `.
    #[must_use]
    pub fn name(&self) -> String {
        self.faces
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(" // ")
    }

    #[must_use]
    pub fn faces(&self) -> &[CardFace] {
        &self.faces
    }

    fn front_mut(&mut self) -> &mut CardFace {
        &mut self.faces[0]
    }

    /// Whether the card may be played in a format (restricted counts).
    #[must_use]
    pub fn legal_in(&self, format: &str) -> bool {
        self.legality.get(format).is_some_and(|l| l.is_legal())
    }

    #[must_use]
    pub fn is_restricted(&self, format: &str) -> bool {
        self.legality.get(format) == Some(&Legality::Restricted)
    }

    /// Formats the card is legal or restricted in.
    pub fn legal_formats(&self) -> impl Iterator<Item = &str> {
        self.legality
            .iter()
            .filter(|(_, l)| l.is_legal())
            .map(|(f, _)| f.as_str())
    }

    // === Builders ===

    #[must_use]
    pub fn with_mana_cost(mut self, cost: ManaCost) -> Self {
        self.front_mut().mana_cost = cost;
        self
    }

    #[must_use]
    pub fn with_type_line(mut self, line: &str) -> Self {
        self.front_mut().type_line = TypeLine::parse(line);
        self
    }

    #[must_use]
    pub fn with_rules_text(mut self, text: impl Into<String>) -> Self {
        self.front_mut().rules_text = text.into();
        self
    }

    #[must_use]
    pub fn with_flavor_text(mut self, text: impl Into<String>) -> Self {
        self.front_mut().flavor_text = text.into();
        self
    }

    #[must_use]
    pub fn with_power_toughness(mut self, power: &str, toughness: &str) -> Self {
        let face = self.front_mut();
        face.power = Some(CombatStat::new(power));
        face.toughness = Some(CombatStat::new(toughness));
        self
    }

    #[must_use]
    pub fn with_loyalty(mut self, loyalty: &str) -> Self {
        self.front_mut().loyalty = Some(CombatStat::new(loyalty));
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self
    }

    #[must_use]
    pub fn with_mana_value(mut self, value: f64) -> Self {
        self.mana_value = value;
        self
    }

    /// Set both color and color identity.
    #[must_use]
    pub fn with_colors(mut self, colors: ColorSet) -> Self {
        self.colors = colors;
        self.color_identity = colors;
        self
    }

    #[must_use]
    pub fn with_color_identity(mut self, identity: ColorSet) -> Self {
        self.color_identity = identity;
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: impl Into<String>) -> Self {
        self.rarity = rarity.into();
        self
    }

    #[must_use]
    pub fn with_expansion(mut self, expansion: Expansion) -> Self {
        self.expansion = expansion;
        self
    }

    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    #[must_use]
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    #[must_use]
    pub fn with_legality(mut self, format: impl Into<String>, legality: Legality) -> Self {
        self.legality.insert(format.into(), legality);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new("abc");
        assert_eq!(id.as_str(), "abc");
        assert_eq!(format!("{}", id), "Card(abc)");
    }

    #[test]
    fn test_card_builder() {
        let card = Card::new(CardId::new("1"), "Grizzly Bears")
            .with_mana_cost("{1}{G}".parse().unwrap())
            .with_type_line("Creature — Bear")
            .with_power_toughness("2", "2")
            .with_mana_value(2.0)
            .with_tag("vanilla");

        assert_eq!(card.faces().len(), 1);
        assert_eq!(card.faces()[0].type_line.subtypes, vec!["Bear"]);
        assert_eq!(card.faces()[0].power.as_ref().unwrap().value(), 2.0);
        assert!(card.tags.contains("vanilla"));
    }

    #[test]
    fn test_multi_faced_name() {
        let card = Card::with_faces(
            CardId::new("2"),
            [CardFace::new("Fire"), CardFace::new("Ice")],
        )
        .unwrap();
        assert_eq!(card.name(), "Fire // Ice");
        assert!(Card::with_faces(CardId::new("3"), []).is_none());
    }

    #[test]
    fn test_legality_queries() {
        let card = Card::new(CardId::new("4"), "Time Walk")
            .with_legality("vintage", Legality::Restricted)
            .with_legality("legacy", Legality::Banned);

        assert!(card.legal_in("vintage"));
        assert!(card.is_restricted("vintage"));
        assert!(!card.legal_in("legacy"));
        assert!(!card.legal_in("modern"));
        assert_eq!(card.legal_formats().collect::<Vec<_>>(), vec!["vintage"]);
    }

    #[test]
    fn test_card_serialization() {
        let card = Card::new(CardId::new("5"), "Test").with_mana_value(3.0);

        let json = serde_json::to_string(&card).unwrap();
        let deserialized: Card = serde_json::from_str(&json).unwrap();

        assert_eq!(card.id, deserialized.id);
        assert_eq!(card.name(), deserialized.name());
    }

    #[test]
    fn test_deserialize_rejects_no_faces() {
        let mut json = serde_json::to_value(Card::new(CardId::new("6"), "Test")).unwrap();
        json["faces"] = serde_json::json!([]);
        let err = serde_json::from_value::<Card>(json).unwrap_err();
        assert!(err.to_string().contains("at least one face"));
    }
}

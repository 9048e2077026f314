//! The attribute registry.
//!
//! `FilterAttribute` is the closed list of card attributes a filter can
//! constrain. Each entry knows its display name, its stable code (part of
//! the saved text form, never change one), the shape of leaf that filters
//! it, how to build a default leaf, and how to read its value off a card.

use std::collections::BTreeMap;
use std::fmt;

use smallvec::{smallvec, SmallVec};

use super::leaf::{
    ColorFilter, LeafFilter, LegalityFilter, ManaCostFilter, NumberFilter, OptionsFilter,
    TextFilter, TypeLineFilter, VariableNumberFilter,
};
use crate::cards::{Card, ColorSet, CombatStat, Legality, ManaCost, TypeLine};

/// A filterable card attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterAttribute {
    // === Text ===
    Name,
    RulesText,
    FlavorText,
    Artist,
    CardNumber,

    // === Cost ===
    ManaCost,
    ManaValue,

    // === Color ===
    Color,
    ColorIdentity,

    // === Types ===
    TypeLine,
    CardType,
    Subtype,
    Supertype,

    // === Combat ===
    Power,
    Toughness,
    Loyalty,

    // === Printing ===
    Layout,
    Expansion,
    Block,
    Rarity,

    // === Collection ===
    Legality,
    Tags,

    // === Constants ===
    AnyCard,
    NoCard,
}

/// The kind of leaf that filters an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LeafShape {
    Text,
    Options,
    Legality,
    Number,
    VariableNumber,
    ManaCost,
    Color,
    TypeLine,
    Binary,
}

/// An attribute's value on one card.
///
/// Per-face attributes yield one entry per face.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue<'a> {
    Text(SmallVec<[&'a str; 2]>),
    Options(SmallVec<[&'a str; 4]>),
    Numbers(SmallVec<[f64; 2]>),
    Stats(SmallVec<[Option<&'a CombatStat>; 2]>),
    ManaCosts(SmallVec<[&'a ManaCost; 2]>),
    Colors(ColorSet),
    TypeLines(SmallVec<[&'a TypeLine; 2]>),
    Legality(&'a BTreeMap<String, Legality>),
    Constant(bool),
}

impl FilterAttribute {
    pub const ALL: [FilterAttribute; 24] = [
        FilterAttribute::Name,
        FilterAttribute::RulesText,
        FilterAttribute::FlavorText,
        FilterAttribute::Artist,
        FilterAttribute::CardNumber,
        FilterAttribute::ManaCost,
        FilterAttribute::ManaValue,
        FilterAttribute::Color,
        FilterAttribute::ColorIdentity,
        FilterAttribute::TypeLine,
        FilterAttribute::CardType,
        FilterAttribute::Subtype,
        FilterAttribute::Supertype,
        FilterAttribute::Power,
        FilterAttribute::Toughness,
        FilterAttribute::Loyalty,
        FilterAttribute::Layout,
        FilterAttribute::Expansion,
        FilterAttribute::Block,
        FilterAttribute::Rarity,
        FilterAttribute::Legality,
        FilterAttribute::Tags,
        FilterAttribute::AnyCard,
        FilterAttribute::NoCard,
    ];

    /// Display name for editors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            FilterAttribute::Name => "Name",
            FilterAttribute::RulesText => "Rules Text",
            FilterAttribute::FlavorText => "Flavor Text",
            FilterAttribute::Artist => "Artist",
            FilterAttribute::CardNumber => "Card Number",
            FilterAttribute::ManaCost => "Mana Cost",
            FilterAttribute::ManaValue => "Mana Value",
            FilterAttribute::Color => "Color",
            FilterAttribute::ColorIdentity => "Color Identity",
            FilterAttribute::TypeLine => "Type Line",
            FilterAttribute::CardType => "Card Type",
            FilterAttribute::Subtype => "Subtype",
            FilterAttribute::Supertype => "Supertype",
            FilterAttribute::Power => "Power",
            FilterAttribute::Toughness => "Toughness",
            FilterAttribute::Loyalty => "Loyalty",
            FilterAttribute::Layout => "Layout",
            FilterAttribute::Expansion => "Expansion",
            FilterAttribute::Block => "Block",
            FilterAttribute::Rarity => "Rarity",
            FilterAttribute::Legality => "Format Legality",
            FilterAttribute::Tags => "Tags",
            FilterAttribute::AnyCard => "<Any Card>",
            FilterAttribute::NoCard => "<No Card>",
        }
    }

    /// Stable serialization code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            FilterAttribute::Name => "n",
            FilterAttribute::RulesText => "o",
            FilterAttribute::FlavorText => "f",
            FilterAttribute::Artist => "a",
            FilterAttribute::CardNumber => "#",
            FilterAttribute::ManaCost => "m",
            FilterAttribute::ManaValue => "cmc",
            FilterAttribute::Color => "c",
            FilterAttribute::ColorIdentity => "ci",
            FilterAttribute::TypeLine => "type",
            FilterAttribute::CardType => "cardtype",
            FilterAttribute::Subtype => "sub",
            FilterAttribute::Supertype => "super",
            FilterAttribute::Power => "pow",
            FilterAttribute::Toughness => "tough",
            FilterAttribute::Loyalty => "loy",
            FilterAttribute::Layout => "L",
            FilterAttribute::Expansion => "x",
            FilterAttribute::Block => "b",
            FilterAttribute::Rarity => "r",
            FilterAttribute::Legality => "legal",
            FilterAttribute::Tags => "tag",
            FilterAttribute::AnyCard => "*",
            FilterAttribute::NoCard => "0",
        }
    }

    /// Look an attribute up by code. Codes are case-sensitive (`L` is
    /// layout, `l` is nothing).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        FilterAttribute::ALL.into_iter().find(|a| a.code() == code)
    }

    #[must_use]
    pub const fn shape(self) -> LeafShape {
        match self {
            FilterAttribute::Name
            | FilterAttribute::RulesText
            | FilterAttribute::FlavorText
            | FilterAttribute::Artist
            | FilterAttribute::CardNumber => LeafShape::Text,
            FilterAttribute::ManaCost => LeafShape::ManaCost,
            FilterAttribute::ManaValue => LeafShape::Number,
            FilterAttribute::Color | FilterAttribute::ColorIdentity => LeafShape::Color,
            FilterAttribute::TypeLine => LeafShape::TypeLine,
            FilterAttribute::CardType
            | FilterAttribute::Subtype
            | FilterAttribute::Supertype
            | FilterAttribute::Layout
            | FilterAttribute::Expansion
            | FilterAttribute::Block
            | FilterAttribute::Rarity
            | FilterAttribute::Tags => LeafShape::Options,
            FilterAttribute::Power | FilterAttribute::Toughness | FilterAttribute::Loyalty => {
                LeafShape::VariableNumber
            }
            FilterAttribute::Legality => LeafShape::Legality,
            FilterAttribute::AnyCard | FilterAttribute::NoCard => LeafShape::Binary,
        }
    }

    /// Whether a card carries at most one value of this option attribute.
    #[must_use]
    pub const fn is_single_valued(self) -> bool {
        matches!(
            self,
            FilterAttribute::Layout
                | FilterAttribute::Expansion
                | FilterAttribute::Block
                | FilterAttribute::Rarity
        )
    }

    /// A fresh leaf for this attribute with default settings.
    #[must_use]
    pub fn default_leaf(self) -> LeafFilter {
        match self.shape() {
            LeafShape::Text => LeafFilter::Text(TextFilter::for_attribute(self)),
            LeafShape::Options => LeafFilter::Options(OptionsFilter::for_attribute(self)),
            LeafShape::Legality => LeafFilter::Legality(LegalityFilter::new()),
            LeafShape::Number => LeafFilter::Number(NumberFilter::new()),
            LeafShape::VariableNumber => {
                LeafFilter::VariableNumber(VariableNumberFilter::for_attribute(self))
            }
            LeafShape::ManaCost => LeafFilter::ManaCost(ManaCostFilter::new()),
            LeafShape::Color => LeafFilter::Color(ColorFilter::for_attribute(self)),
            LeafShape::TypeLine => LeafFilter::TypeLine(TypeLineFilter::new()),
            LeafShape::Binary => LeafFilter::Binary(self == FilterAttribute::AnyCard),
        }
    }

    /// Read this attribute off a card.
    #[must_use]
    pub fn value(self, card: &Card) -> AttributeValue<'_> {
        let faces = card.faces();
        match self {
            FilterAttribute::Name => {
                AttributeValue::Text(faces.iter().map(|f| f.name.as_str()).collect())
            }
            FilterAttribute::RulesText => {
                AttributeValue::Text(faces.iter().map(|f| f.rules_text.as_str()).collect())
            }
            FilterAttribute::FlavorText => {
                AttributeValue::Text(faces.iter().map(|f| f.flavor_text.as_str()).collect())
            }
            FilterAttribute::Artist => AttributeValue::Text(smallvec![card.artist.as_str()]),
            FilterAttribute::CardNumber => AttributeValue::Text(smallvec![card.number.as_str()]),
            FilterAttribute::ManaCost => {
                AttributeValue::ManaCosts(faces.iter().map(|f| &f.mana_cost).collect())
            }
            FilterAttribute::ManaValue => AttributeValue::Numbers(smallvec![card.mana_value]),
            FilterAttribute::Color => AttributeValue::Colors(card.colors),
            FilterAttribute::ColorIdentity => AttributeValue::Colors(card.color_identity),
            FilterAttribute::TypeLine => {
                AttributeValue::TypeLines(faces.iter().map(|f| &f.type_line).collect())
            }
            FilterAttribute::CardType => AttributeValue::Options(
                faces
                    .iter()
                    .flat_map(|f| f.type_line.types.iter().map(String::as_str))
                    .collect(),
            ),
            FilterAttribute::Subtype => AttributeValue::Options(
                faces
                    .iter()
                    .flat_map(|f| f.type_line.subtypes.iter().map(String::as_str))
                    .collect(),
            ),
            FilterAttribute::Supertype => AttributeValue::Options(
                faces
                    .iter()
                    .flat_map(|f| f.type_line.supertypes.iter().map(String::as_str))
                    .collect(),
            ),
            FilterAttribute::Power => {
                AttributeValue::Stats(faces.iter().map(|f| f.power.as_ref()).collect())
            }
            FilterAttribute::Toughness => {
                AttributeValue::Stats(faces.iter().map(|f| f.toughness.as_ref()).collect())
            }
            FilterAttribute::Loyalty => {
                AttributeValue::Stats(faces.iter().map(|f| f.loyalty.as_ref()).collect())
            }
            FilterAttribute::Layout => single(card.layout.as_str()),
            FilterAttribute::Expansion => single(card.expansion.name.as_str()),
            FilterAttribute::Block => single(card.expansion.block.as_str()),
            FilterAttribute::Rarity => single(card.rarity.as_str()),
            FilterAttribute::Legality => AttributeValue::Legality(&card.legality),
            FilterAttribute::Tags => {
                AttributeValue::Options(card.tags.iter().map(String::as_str).collect())
            }
            FilterAttribute::AnyCard => AttributeValue::Constant(true),
            FilterAttribute::NoCard => AttributeValue::Constant(false),
        }
    }
}

/// A single-valued option; an empty string means the card has no value.
fn single(value: &str) -> AttributeValue<'_> {
    if value.is_empty() {
        AttributeValue::Options(SmallVec::new())
    } else {
        AttributeValue::Options(smallvec![value])
    }
}

impl fmt::Display for FilterAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

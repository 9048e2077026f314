//! Option vocabularies.
//!
//! Option leaves select values from a known universe (every expansion,
//! every subtype, ...). The universes belong to the surrounding
//! application; `FilterVocabulary` carries them into the filter engine so
//! editors can list choices and parsed filters can be checked against them.
//!
//! An empty universe means "not configured": any value is accepted.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::error::ParseError;
use crate::filter::{Filter, FilterAttribute, LeafFilter};

/// Known option values, one set per option attribute.
///
/// ## Usage
///
/// ```
/// use card_filter::{Filter, FilterVocabulary};
///
/// let vocabulary = FilterVocabulary::new()
///     .with_rarity("common")
///     .with_rarity("rare");
///
/// assert!(Filter::from_text_with("«r:anyof{\"rare\"}»", &vocabulary).is_ok());
/// assert!(Filter::from_text_with("«r:anyof{\"epic\"}»", &vocabulary).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterVocabulary {
    pub expansions: BTreeSet<String>,
    pub blocks: BTreeSet<String>,
    pub card_types: BTreeSet<String>,
    pub subtypes: BTreeSet<String>,
    pub supertypes: BTreeSet<String>,
    pub formats: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub rarities: BTreeSet<String>,
    pub layouts: BTreeSet<String>,
}

impl FilterVocabulary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON object with any subset of the list fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Collect every option value that occurs on `cards`.
    pub fn from_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Self {
        let mut vocabulary = Self::new();
        for card in cards {
            vocabulary.add_card(card);
        }
        vocabulary
    }

    fn add_card(&mut self, card: &Card) {
        fn add(set: &mut BTreeSet<String>, value: &str) {
            if !value.is_empty() {
                set.insert(value.to_string());
            }
        }

        add(&mut self.expansions, &card.expansion.name);
        add(&mut self.blocks, &card.expansion.block);
        add(&mut self.rarities, &card.rarity);
        add(&mut self.layouts, &card.layout);
        for face in card.faces() {
            let line = &face.type_line;
            line.types.iter().for_each(|t| add(&mut self.card_types, t));
            line.subtypes.iter().for_each(|t| add(&mut self.subtypes, t));
            line.supertypes.iter().for_each(|t| add(&mut self.supertypes, t));
        }
        card.legality.keys().for_each(|f| add(&mut self.formats, f));
        card.tags.iter().for_each(|t| add(&mut self.tags, t));
    }

    /// The universe for an option attribute, `None` for other attributes.
    #[must_use]
    pub fn options(&self, attribute: FilterAttribute) -> Option<&BTreeSet<String>> {
        let set = match attribute {
            FilterAttribute::Expansion => &self.expansions,
            FilterAttribute::Block => &self.blocks,
            FilterAttribute::CardType => &self.card_types,
            FilterAttribute::Subtype => &self.subtypes,
            FilterAttribute::Supertype => &self.supertypes,
            FilterAttribute::Legality => &self.formats,
            FilterAttribute::Tags => &self.tags,
            FilterAttribute::Rarity => &self.rarities,
            FilterAttribute::Layout => &self.layouts,
            _ => return None,
        };
        Some(set)
    }

    fn options_mut(&mut self, attribute: FilterAttribute) -> Option<&mut BTreeSet<String>> {
        let set = match attribute {
            FilterAttribute::Expansion => &mut self.expansions,
            FilterAttribute::Block => &mut self.blocks,
            FilterAttribute::CardType => &mut self.card_types,
            FilterAttribute::Subtype => &mut self.subtypes,
            FilterAttribute::Supertype => &mut self.supertypes,
            FilterAttribute::Legality => &mut self.formats,
            FilterAttribute::Tags => &mut self.tags,
            FilterAttribute::Rarity => &mut self.rarities,
            FilterAttribute::Layout => &mut self.layouts,
            _ => return None,
        };
        Some(set)
    }

    /// Add a value to an attribute's universe.
    ///
    /// Returns `false` if the value was already known or `attribute` has
    /// no universe.
    pub fn insert(&mut self, attribute: FilterAttribute, value: impl Into<String>) -> bool {
        self.options_mut(attribute)
            .is_some_and(|set| set.insert(value.into()))
    }

    // === Builders ===

    #[must_use]
    pub fn with_option(mut self, attribute: FilterAttribute, value: impl Into<String>) -> Self {
        self.insert(attribute, value);
        self
    }

    #[must_use]
    pub fn with_expansion(self, name: impl Into<String>) -> Self {
        self.with_option(FilterAttribute::Expansion, name)
    }

    #[must_use]
    pub fn with_format(self, format: impl Into<String>) -> Self {
        self.with_option(FilterAttribute::Legality, format)
    }

    #[must_use]
    pub fn with_subtype(self, subtype: impl Into<String>) -> Self {
        self.with_option(FilterAttribute::Subtype, subtype)
    }

    #[must_use]
    pub fn with_rarity(self, rarity: impl Into<String>) -> Self {
        self.with_option(FilterAttribute::Rarity, rarity)
    }

    #[must_use]
    pub fn with_tag(self, tag: impl Into<String>) -> Self {
        self.with_option(FilterAttribute::Tags, tag)
    }

    // === Validation ===

    /// Check every selected option value in `filter` against its universe.
    pub fn validate(&self, filter: &Filter) -> Result<(), ParseError> {
        match filter {
            Filter::Group(group) => {
                for (index, child) in group.children().iter().enumerate() {
                    self.validate(child).map_err(|source| ParseError::Child {
                        index,
                        source: Box::new(source),
                    })?;
                }
                Ok(())
            }
            Filter::Leaf(leaf) => {
                let selected = match leaf {
                    LeafFilter::Options(f) => &f.selected,
                    LeafFilter::Legality(f) => &f.selected,
                    _ => return Ok(()),
                };
                let attribute = leaf.attribute();
                match self.options(attribute) {
                    Some(known) if !known.is_empty() => {
                        match selected.iter().find(|value| !known.contains(*value)) {
                            Some(value) => Err(ParseError::UnknownOption {
                                attribute: attribute.name().to_string(),
                                value: value.clone(),
                            }),
                            None => Ok(()),
                        }
                    }
                    _ => Ok(()),
                }
            }
        }
    }
}

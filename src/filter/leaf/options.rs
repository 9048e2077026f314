//! Option leaves: attributes drawn from a known vocabulary.

use std::collections::BTreeSet;

use crate::cards::Card;
use crate::error::DecodeError;
use crate::filter::attribute::{AttributeValue, FilterAttribute, LeafShape};
use crate::filter::containment::Containment;
use crate::filter::schema::{field, FieldKind, FieldReader, FieldSpec, FieldValue, LeafSchema};

/// Containment of a card's option values against a selection.
///
/// Single-valued attributes (rarity, expansion, block, layout) contribute
/// at most one value; multi-valued ones (types, tags) contribute every
/// value of every face.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionsFilter {
    attribute: FilterAttribute,
    pub contain: Containment,
    pub selected: BTreeSet<String>,
}

impl OptionsFilter {
    /// Returns `None` if `attribute` is not an option attribute.
    #[must_use]
    pub fn new(attribute: FilterAttribute) -> Option<Self> {
        (attribute.shape() == LeafShape::Options).then(|| Self::for_attribute(attribute))
    }

    pub(crate) fn for_attribute(attribute: FilterAttribute) -> Self {
        Self {
            attribute,
            contain: Containment::default(),
            selected: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_containment(mut self, contain: Containment) -> Self {
        self.contain = contain;
        self
    }

    /// Add a selected value (builder pattern).
    #[must_use]
    pub fn with_selected(mut self, value: impl Into<String>) -> Self {
        self.selected.insert(value.into());
        self
    }

    #[must_use]
    pub fn attribute(&self) -> FilterAttribute {
        self.attribute
    }

    pub fn test(&self, card: &Card) -> bool {
        match self.attribute.value(card) {
            AttributeValue::Options(values) => self
                .contain
                .test(values, self.selected.iter().map(String::as_str)),
            _ => false,
        }
    }
}

impl LeafSchema for OptionsFilter {
    const FIELDS: &'static [FieldSpec] = &[
        field("contains", FieldKind::Containment),
        field("selected", FieldKind::Values),
    ];

    fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Containment(self.contain),
            FieldValue::Values(self.selected.clone()),
        ]
    }

    fn from_fields(attribute: FilterAttribute, fields: &mut FieldReader) -> Result<Self, DecodeError> {
        Ok(Self {
            attribute,
            contain: fields.containment()?,
            selected: fields.values()?,
        })
    }
}

/// Format legality.
///
/// The card's values are the formats it is legal in, restricted formats
/// included. With `restricted` set, the card must additionally be
/// restricted in every selected format it is legal in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LegalityFilter {
    pub contain: Containment,
    pub selected: BTreeSet<String>,
    pub restricted: bool,
}

impl LegalityFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_containment(mut self, contain: Containment) -> Self {
        self.contain = contain;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.selected.insert(format.into());
        self
    }

    #[must_use]
    pub fn with_restricted(mut self, restricted: bool) -> Self {
        self.restricted = restricted;
        self
    }

    pub fn test(&self, card: &Card) -> bool {
        let legal = card.legal_formats();
        if !self
            .contain
            .test(legal, self.selected.iter().map(String::as_str))
        {
            return false;
        }
        !self.restricted
            || self
                .selected
                .iter()
                .filter(|format| card.legal_in(format))
                .all(|format| card.is_restricted(format))
    }
}

impl LeafSchema for LegalityFilter {
    const FIELDS: &'static [FieldSpec] = &[
        field("contains", FieldKind::Containment),
        field("selected", FieldKind::Values),
        field("restricted", FieldKind::Bool),
    ];

    fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Containment(self.contain),
            FieldValue::Values(self.selected.clone()),
            FieldValue::Bool(self.restricted),
        ]
    }

    fn from_fields(_: FilterAttribute, fields: &mut FieldReader) -> Result<Self, DecodeError> {
        Ok(Self {
            contain: fields.containment()?,
            selected: fields.values()?,
            restricted: fields.boolean()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, Expansion, Legality};

    #[test]
    fn test_single_valued_options() {
        let card = Card::new(CardId::new("1"), "Test").with_rarity("rare");
        let rarity = OptionsFilter::for_attribute(FilterAttribute::Rarity)
            .with_selected("rare")
            .with_selected("mythic");
        assert!(rarity.test(&card));

        let exact = rarity.clone().with_containment(Containment::Exactly);
        assert!(!exact.test(&card));
        assert!(!rarity.with_containment(Containment::NoneOf).test(&card));
    }

    #[test]
    fn test_missing_single_value() {
        let card = Card::new(CardId::new("1"), "Test").with_expansion(Expansion::new("Alpha", "LEA"));
        let block = OptionsFilter::for_attribute(FilterAttribute::Block).with_selected("Ice Age");
        assert!(!block.test(&card));
        assert!(block.with_containment(Containment::NoneOf).test(&card));
    }

    #[test]
    fn test_multi_valued_options() {
        let card = Card::new(CardId::new("1"), "Test")
            .with_type_line("Artifact Creature — Golem")
            .with_tag("cube")
            .with_tag("budget");

        let types = OptionsFilter::for_attribute(FilterAttribute::CardType)
            .with_containment(Containment::AllOf)
            .with_selected("Artifact")
            .with_selected("Creature");
        assert!(types.test(&card));

        let tags = OptionsFilter::for_attribute(FilterAttribute::Tags)
            .with_containment(Containment::Exactly)
            .with_selected("cube");
        assert!(!tags.test(&card));
    }

    #[test]
    fn test_empty_selection_any_of() {
        let card = Card::new(CardId::new("1"), "Test");
        assert!(OptionsFilter::for_attribute(FilterAttribute::Tags).test(&card));
    }

    #[test]
    fn test_legality_counts_restricted_as_legal() {
        let card = Card::new(CardId::new("1"), "Ancestral Recall")
            .with_legality("vintage", Legality::Restricted)
            .with_legality("legacy", Legality::Banned);

        let vintage = LegalityFilter::new().with_format("vintage");
        assert!(vintage.test(&card));
        assert!(!LegalityFilter::new().with_format("legacy").test(&card));
    }

    #[test]
    fn test_legality_restricted_flag() {
        let restricted = Card::new(CardId::new("1"), "Ancestral Recall")
            .with_legality("vintage", Legality::Restricted);
        let legal = Card::new(CardId::new("2"), "Counterspell")
            .with_legality("vintage", Legality::Legal);

        let filter = LegalityFilter::new().with_format("vintage").with_restricted(true);
        assert!(filter.test(&restricted));
        assert!(!filter.test(&legal));
    }

    #[test]
    fn test_new_checks_shape() {
        assert!(OptionsFilter::new(FilterAttribute::Subtype).is_some());
        assert!(OptionsFilter::new(FilterAttribute::Legality).is_none());
    }
}

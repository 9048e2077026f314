//! Leaf filters.
//!
//! A leaf constrains exactly one attribute. Each leaf family has its own
//! struct carrying the fields its text body and field table describe;
//! `LeafFilter` is the closed union over them.

mod color;
mod mana;
mod number;
mod options;
mod text;
mod type_line;

pub use color::ColorFilter;
pub use mana::ManaCostFilter;
pub use number::{NumberFilter, VariableNumberFilter};
pub use options::{LegalityFilter, OptionsFilter};
pub use text::TextFilter;
pub use type_line::TypeLineFilter;

use crate::cards::Card;
use crate::error::DecodeError;

use super::attribute::{FilterAttribute, LeafShape};
use super::schema::{FieldReader, FieldSpec, FieldValue, LeafSchema};

/// A filter on a single attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum LeafFilter {
    Text(TextFilter),
    Options(OptionsFilter),
    Legality(LegalityFilter),
    Number(NumberFilter),
    VariableNumber(VariableNumberFilter),
    ManaCost(ManaCostFilter),
    Color(ColorFilter),
    TypeLine(TypeLineFilter),
    /// Matches every card (`true`) or none (`false`).
    Binary(bool),
}

impl LeafFilter {
    /// The attribute this leaf constrains.
    #[must_use]
    pub fn attribute(&self) -> FilterAttribute {
        match self {
            LeafFilter::Text(f) => f.attribute(),
            LeafFilter::Options(f) => f.attribute(),
            LeafFilter::Legality(_) => FilterAttribute::Legality,
            LeafFilter::Number(_) => FilterAttribute::ManaValue,
            LeafFilter::VariableNumber(f) => f.attribute(),
            LeafFilter::ManaCost(_) => FilterAttribute::ManaCost,
            LeafFilter::Color(f) => f.attribute(),
            LeafFilter::TypeLine(_) => FilterAttribute::TypeLine,
            LeafFilter::Binary(true) => FilterAttribute::AnyCard,
            LeafFilter::Binary(false) => FilterAttribute::NoCard,
        }
    }

    pub fn test(&self, card: &Card) -> bool {
        match self {
            LeafFilter::Text(f) => f.test(card),
            LeafFilter::Options(f) => f.test(card),
            LeafFilter::Legality(f) => f.test(card),
            LeafFilter::Number(f) => f.test(card),
            LeafFilter::VariableNumber(f) => f.test(card),
            LeafFilter::ManaCost(f) => f.test(card),
            LeafFilter::Color(f) => f.test(card),
            LeafFilter::TypeLine(f) => f.test(card),
            LeafFilter::Binary(matches) => *matches,
        }
    }

    /// Field values in the order of `self.attribute().shape().fields()`.
    pub(crate) fn to_fields(&self) -> Vec<FieldValue> {
        match self {
            LeafFilter::Text(f) => f.to_fields(),
            LeafFilter::Options(f) => f.to_fields(),
            LeafFilter::Legality(f) => f.to_fields(),
            LeafFilter::Number(f) => f.to_fields(),
            LeafFilter::VariableNumber(f) => f.to_fields(),
            LeafFilter::ManaCost(f) => f.to_fields(),
            LeafFilter::Color(f) => f.to_fields(),
            LeafFilter::TypeLine(f) => f.to_fields(),
            LeafFilter::Binary(_) => Vec::new(),
        }
    }

    /// Rebuild a leaf for `attribute` from values in field-table order.
    pub(crate) fn from_fields(
        attribute: FilterAttribute,
        values: Vec<FieldValue>,
    ) -> Result<Self, DecodeError> {
        let reader = &mut FieldReader::new(attribute.shape().fields(), values);
        Ok(match attribute.shape() {
            LeafShape::Text => LeafFilter::Text(TextFilter::from_fields(attribute, reader)?),
            LeafShape::Options => LeafFilter::Options(OptionsFilter::from_fields(attribute, reader)?),
            LeafShape::Legality => {
                LeafFilter::Legality(LegalityFilter::from_fields(attribute, reader)?)
            }
            LeafShape::Number => LeafFilter::Number(NumberFilter::from_fields(attribute, reader)?),
            LeafShape::VariableNumber => {
                LeafFilter::VariableNumber(VariableNumberFilter::from_fields(attribute, reader)?)
            }
            LeafShape::ManaCost => {
                LeafFilter::ManaCost(ManaCostFilter::from_fields(attribute, reader)?)
            }
            LeafShape::Color => LeafFilter::Color(ColorFilter::from_fields(attribute, reader)?),
            LeafShape::TypeLine => {
                LeafFilter::TypeLine(TypeLineFilter::from_fields(attribute, reader)?)
            }
            LeafShape::Binary => LeafFilter::Binary(attribute == FilterAttribute::AnyCard),
        })
    }
}

impl LeafShape {
    /// Field table of leaves of this shape, in wire order.
    #[must_use]
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            LeafShape::Text => TextFilter::FIELDS,
            LeafShape::Options => OptionsFilter::FIELDS,
            LeafShape::Legality => LegalityFilter::FIELDS,
            LeafShape::Number => NumberFilter::FIELDS,
            LeafShape::VariableNumber => VariableNumberFilter::FIELDS,
            LeafShape::ManaCost => ManaCostFilter::FIELDS,
            LeafShape::Color => ColorFilter::FIELDS,
            LeafShape::TypeLine => TypeLineFilter::FIELDS,
            LeafShape::Binary => &[],
        }
    }
}

macro_rules! leaf_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for LeafFilter {
                fn from(leaf: $ty) -> Self {
                    LeafFilter::$variant(leaf)
                }
            }
        )*
    };
}

leaf_from!(
    Text(TextFilter),
    Options(OptionsFilter),
    Legality(LegalityFilter),
    Number(NumberFilter),
    VariableNumber(VariableNumberFilter),
    ManaCost(ManaCostFilter),
    Color(ColorFilter),
    TypeLine(TypeLineFilter),
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;
    use crate::filter::containment::Containment;

    #[test]
    fn test_fields_match_table() {
        for attribute in FilterAttribute::ALL {
            let leaf = attribute.default_leaf();
            let specs = attribute.shape().fields();
            assert_eq!(leaf.to_fields().len(), specs.len(), "{attribute:?}");
        }
    }

    #[test]
    fn test_from_fields_rebuilds_leaf() {
        let leaf = LeafFilter::from(
            OptionsFilter::for_attribute(FilterAttribute::Rarity)
                .with_containment(Containment::NoneOf)
                .with_selected("common"),
        );
        let rebuilt = LeafFilter::from_fields(FilterAttribute::Rarity, leaf.to_fields()).unwrap();
        assert_eq!(rebuilt, leaf);
    }

    #[test]
    fn test_from_fields_short_input() {
        let result = LeafFilter::from_fields(
            FilterAttribute::Legality,
            vec![FieldValue::Containment(Containment::AnyOf)],
        );
        assert!(matches!(result, Err(DecodeError::MissingField(_))));
    }

    #[test]
    fn test_binary() {
        let card = Card::new(CardId::new("1"), "Test");
        assert!(LeafFilter::Binary(true).test(&card));
        assert!(!LeafFilter::Binary(false).test(&card));
        assert_eq!(LeafFilter::Binary(false).attribute(), FilterAttribute::NoCard);
    }
}

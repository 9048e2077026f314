//! Color and color identity leaves.

use crate::cards::{Card, ColorSet};
use crate::error::DecodeError;
use crate::filter::attribute::{AttributeValue, FilterAttribute, LeafShape};
use crate::filter::containment::Containment;
use crate::filter::schema::{field, FieldKind, FieldReader, FieldSpec, FieldValue, LeafSchema};

/// Color or color identity.
///
/// `multicolored` additionally requires more than one color.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorFilter {
    attribute: FilterAttribute,
    pub contain: Containment,
    pub colors: ColorSet,
    pub multicolored: bool,
}

impl ColorFilter {
    /// Returns `None` if `attribute` is not a color attribute.
    #[must_use]
    pub fn new(attribute: FilterAttribute) -> Option<Self> {
        (attribute.shape() == LeafShape::Color).then(|| Self::for_attribute(attribute))
    }

    pub(crate) fn for_attribute(attribute: FilterAttribute) -> Self {
        Self {
            attribute,
            contain: Containment::default(),
            colors: ColorSet::new(),
            multicolored: false,
        }
    }

    #[must_use]
    pub fn with_containment(mut self, contain: Containment) -> Self {
        self.contain = contain;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: ColorSet) -> Self {
        self.colors = colors;
        self
    }

    #[must_use]
    pub fn with_multicolored(mut self, multicolored: bool) -> Self {
        self.multicolored = multicolored;
        self
    }

    #[must_use]
    pub fn attribute(&self) -> FilterAttribute {
        self.attribute
    }

    pub fn test(&self, card: &Card) -> bool {
        let AttributeValue::Colors(colors) = self.attribute.value(card) else {
            return false;
        };
        self.contain.test(colors.iter(), self.colors.iter()) && (!self.multicolored || colors.len() > 1)
    }
}

impl LeafSchema for ColorFilter {
    const FIELDS: &'static [FieldSpec] = &[
        field("contains", FieldKind::Containment),
        field("colors", FieldKind::Colors),
        field("multicolored", FieldKind::Bool),
    ];

    fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Containment(self.contain),
            FieldValue::Colors(self.colors),
            FieldValue::Bool(self.multicolored),
        ]
    }

    fn from_fields(attribute: FilterAttribute, fields: &mut FieldReader) -> Result<Self, DecodeError> {
        Ok(Self {
            attribute,
            contain: fields.containment()?,
            colors: fields.colors()?,
            multicolored: fields.boolean()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;

    fn card(colors: &str) -> Card {
        Card::new(CardId::new("1"), "Test").with_colors(ColorSet::parse(colors).unwrap())
    }

    fn filter(contain: Containment, colors: &str) -> ColorFilter {
        ColorFilter::for_attribute(FilterAttribute::Color)
            .with_containment(contain)
            .with_colors(ColorSet::parse(colors).unwrap())
    }

    #[test]
    fn test_containment() {
        assert!(filter(Containment::AnyOf, "RG").test(&card("R")));
        assert!(filter(Containment::AllOf, "RG").test(&card("WRG")));
        assert!(!filter(Containment::Exactly, "RG").test(&card("WRG")));
        assert!(filter(Containment::NoneOf, "U").test(&card("")));
    }

    #[test]
    fn test_multicolored() {
        let gold = filter(Containment::AnyOf, "").with_multicolored(true);
        assert!(gold.test(&card("WU")));
        assert!(!gold.test(&card("W")));
        assert!(!gold.test(&card("")));
    }

    #[test]
    fn test_identity_is_separate_from_color() {
        let card = Card::new(CardId::new("1"), "Test")
            .with_colors(ColorSet::new())
            .with_color_identity(ColorSet::parse("G").unwrap());
        let identity = ColorFilter::for_attribute(FilterAttribute::ColorIdentity)
            .with_colors(ColorSet::parse("G").unwrap());
        assert!(identity.test(&card));
        assert!(!filter(Containment::AnyOf, "G").test(&card));
    }
}

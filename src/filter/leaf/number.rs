//! Numeric leaves.

use crate::cards::Card;
use crate::error::DecodeError;
use crate::filter::attribute::{AttributeValue, FilterAttribute, LeafShape};
use crate::filter::comparison::Comparison;
use crate::filter::schema::{field, FieldKind, FieldReader, FieldSpec, FieldValue, LeafSchema};

/// Compares mana value against an operand.
#[derive(Clone, Debug, Default)]
pub struct NumberFilter {
    pub operation: Comparison,
    pub operand: f64,
}

impl NumberFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, operation: Comparison, operand: f64) -> Self {
        self.operation = operation;
        self.operand = operand;
        self
    }

    pub fn test(&self, card: &Card) -> bool {
        match FilterAttribute::ManaValue.value(card) {
            AttributeValue::Numbers(values) => values
                .iter()
                .filter(|v| !v.is_nan())
                .any(|v| self.operation.test(*v, self.operand)),
            _ => false,
        }
    }
}

/// Operands compare by value, with NaN equal to NaN.
fn same_operand(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

impl PartialEq for NumberFilter {
    fn eq(&self, other: &Self) -> bool {
        self.operation == other.operation && same_operand(self.operand, other.operand)
    }
}

impl LeafSchema for NumberFilter {
    const FIELDS: &'static [FieldSpec] = &[
        field("operation", FieldKind::Comparison),
        field("operand", FieldKind::Number),
    ];

    fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Comparison(self.operation),
            FieldValue::Number(self.operand),
        ]
    }

    fn from_fields(_: FilterAttribute, fields: &mut FieldReader) -> Result<Self, DecodeError> {
        Ok(Self {
            operation: fields.comparison()?,
            operand: fields.number()?,
        })
    }
}

/// Power, toughness or loyalty.
///
/// With `varies` set the leaf matches cards whose stat depends on the game
/// (`*`, `X`) on any face, and the comparison is ignored. Otherwise it
/// compares the constant part of each face's stat.
#[derive(Clone, Debug)]
pub struct VariableNumberFilter {
    attribute: FilterAttribute,
    pub varies: bool,
    pub operation: Comparison,
    pub operand: f64,
}

impl VariableNumberFilter {
    /// Returns `None` if `attribute` is not a combat stat.
    #[must_use]
    pub fn new(attribute: FilterAttribute) -> Option<Self> {
        (attribute.shape() == LeafShape::VariableNumber).then(|| Self::for_attribute(attribute))
    }

    pub(crate) fn for_attribute(attribute: FilterAttribute) -> Self {
        Self {
            attribute,
            varies: false,
            operation: Comparison::default(),
            operand: 0.0,
        }
    }

    #[must_use]
    pub fn with(mut self, operation: Comparison, operand: f64) -> Self {
        self.operation = operation;
        self.operand = operand;
        self
    }

    #[must_use]
    pub fn with_varies(mut self, varies: bool) -> Self {
        self.varies = varies;
        self
    }

    #[must_use]
    pub fn attribute(&self) -> FilterAttribute {
        self.attribute
    }

    pub fn test(&self, card: &Card) -> bool {
        let AttributeValue::Stats(stats) = self.attribute.value(card) else {
            return false;
        };
        let mut present = stats.iter().flatten();
        if self.varies {
            present.any(|s| s.is_variable())
        } else {
            present
                .map(|s| s.value())
                .filter(|v| !v.is_nan())
                .any(|v| self.operation.test(v, self.operand))
        }
    }
}

impl PartialEq for VariableNumberFilter {
    fn eq(&self, other: &Self) -> bool {
        self.attribute == other.attribute
            && self.varies == other.varies
            && self.operation == other.operation
            && same_operand(self.operand, other.operand)
    }
}

impl LeafSchema for VariableNumberFilter {
    const FIELDS: &'static [FieldSpec] = &[
        field("varies", FieldKind::Bool),
        field("operation", FieldKind::Comparison),
        field("operand", FieldKind::Number),
    ];

    fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Bool(self.varies),
            FieldValue::Comparison(self.operation),
            FieldValue::Number(self.operand),
        ]
    }

    fn from_fields(attribute: FilterAttribute, fields: &mut FieldReader) -> Result<Self, DecodeError> {
        Ok(Self {
            attribute,
            varies: fields.boolean()?,
            operation: fields.comparison()?,
            operand: fields.number()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardFace, CardId};

    #[test]
    fn test_mana_value() {
        let card = Card::new(CardId::new("1"), "Test").with_mana_value(3.0);
        assert!(NumberFilter::new().with(Comparison::Ge, 3.0).test(&card));
        assert!(!NumberFilter::new().with(Comparison::Lt, 3.0).test(&card));
        assert!(NumberFilter::new().with(Comparison::Ne, 2.0).test(&card));
    }

    #[test]
    fn test_nan_mana_value_never_matches() {
        let card = Card::new(CardId::new("1"), "Test").with_mana_value(f64::NAN);
        assert!(!NumberFilter::new().with(Comparison::Ne, 2.0).test(&card));
    }

    #[test]
    fn test_power_compares_constant_part() {
        let card = Card::new(CardId::new("1"), "Test").with_power_toughness("1+*", "3");
        let power = VariableNumberFilter::for_attribute(FilterAttribute::Power);
        assert!(power.clone().with(Comparison::Eq, 1.0).test(&card));
        assert!(power.with_varies(true).test(&card));

        let toughness = VariableNumberFilter::for_attribute(FilterAttribute::Toughness);
        assert!(!toughness.clone().with_varies(true).test(&card));
        assert!(toughness.with(Comparison::Ge, 3.0).test(&card));
    }

    #[test]
    fn test_missing_stat() {
        let card = Card::new(CardId::new("1"), "Opt");
        let power = VariableNumberFilter::for_attribute(FilterAttribute::Power);
        assert!(!power.clone().with(Comparison::Ne, 5.0).test(&card));
        assert!(!power.with_varies(true).test(&card));
    }

    #[test]
    fn test_any_face_matches() {
        let card = Card::with_faces(
            CardId::new("1"),
            [
                CardFace::new("Front").with_power_toughness("1", "1"),
                CardFace::new("Back").with_power_toughness("4", "4"),
            ],
        )
        .unwrap();
        let power = VariableNumberFilter::for_attribute(FilterAttribute::Power);
        assert!(power.with(Comparison::Gt, 3.0).test(&card));
    }

    #[test]
    fn test_new_checks_shape() {
        assert!(VariableNumberFilter::new(FilterAttribute::Loyalty).is_some());
        assert!(VariableNumberFilter::new(FilterAttribute::ManaValue).is_none());
    }
}

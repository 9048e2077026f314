//! Mana cost leaf.
//!
//! Target and card costs are compared as symbol multisets, with generic
//! mana compared by its total.

use crate::cards::{Card, ManaCost};
use crate::error::DecodeError;
use crate::filter::attribute::{AttributeValue, FilterAttribute};
use crate::filter::containment::Containment;
use crate::filter::schema::{field, FieldKind, FieldReader, FieldSpec, FieldValue, LeafSchema};

/// Compares each face's mana cost against a target cost.
///
/// Costs are multisets: `{R}{R}` is not a superset of `{R}{R}{R}`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ManaCostFilter {
    pub contain: Containment,
    pub cost: ManaCost,
}

impl ManaCostFilter {
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
    pub fn with_cost(mut self, cost: ManaCost) -> Self {
        self.cost = cost;
        self
    }

    pub fn test(&self, card: &Card) -> bool {
        match FilterAttribute::ManaCost.value(card) {
            AttributeValue::ManaCosts(costs) => costs.iter().any(|c| self.test_cost(c)),
            _ => false,
        }
    }

    fn test_cost(&self, cost: &ManaCost) -> bool {
        let target = self.cost.symbols();
        match self.contain {
            Containment::AllOf => cost.is_superset(&self.cost),
            Containment::NotAllOf => {
                Containment::AnyOf.test(cost.symbols(), target) && !cost.is_superset(&self.cost)
            }
            Containment::Exactly => *cost == self.cost,
            Containment::NotExactly => *cost != self.cost,
            contain => contain.test(cost.symbols(), target),
        }
    }
}

impl LeafSchema for ManaCostFilter {
    const FIELDS: &'static [FieldSpec] = &[
        field("contains", FieldKind::Containment),
        field("cost", FieldKind::ManaCost),
    ];

    fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Containment(self.contain),
            FieldValue::ManaCost(self.cost.clone()),
        ]
    }

    fn from_fields(_: FilterAttribute, fields: &mut FieldReader) -> Result<Self, DecodeError> {
        Ok(Self {
            contain: fields.containment()?,
            cost: fields.mana_cost()?,
        })
    }
}

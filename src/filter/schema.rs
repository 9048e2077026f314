//! Per-leaf field schema.
//!
//! Every leaf kind declares its fields once, as an ordered table of
//! `(name, kind)`. The binary codec writes the values in table order and
//! the tree codec keys them by name, so the two forms cannot drift apart:
//! a field added to a leaf shows up in both or in neither.

use std::collections::BTreeSet;

use crate::cards::{ColorSet, ManaCost};
use crate::error::DecodeError;

use super::comparison::Comparison;
use super::containment::Containment;

/// Wire type of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Containment,
    Comparison,
    Bool,
    Number,
    Text,
    Values,
    ManaCost,
    Colors,
}

impl FieldKind {
    pub(crate) const fn describe(self) -> &'static str {
        match self {
            FieldKind::Containment => "a containment code",
            FieldKind::Comparison => "a comparison operator",
            FieldKind::Bool => "a boolean",
            FieldKind::Number => "a number",
            FieldKind::Text => "a string",
            FieldKind::Values => "a list of strings",
            FieldKind::ManaCost => "a mana cost",
            FieldKind::Colors => "a color string",
        }
    }
}

/// One entry of a leaf's field table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

pub(crate) const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

/// A decoded or to-be-encoded field value.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Containment(Containment),
    Comparison(Comparison),
    Bool(bool),
    Number(f64),
    Text(String),
    Values(BTreeSet<String>),
    ManaCost(ManaCost),
    Colors(ColorSet),
}

/// Reads decoded field values back in table order.
pub(crate) struct FieldReader {
    specs: std::slice::Iter<'static, FieldSpec>,
    values: std::vec::IntoIter<FieldValue>,
}

macro_rules! take_field {
    ($name:ident, $variant:ident, $ty:ty) => {
        pub(crate) fn $name(&mut self) -> Result<$ty, DecodeError> {
            let name = self.specs.next().map_or(stringify!($name), |spec| spec.name);
            match self.values.next() {
                Some(FieldValue::$variant(value)) => Ok(value),
                Some(_) => Err(DecodeError::mismatch(name, FieldKind::$variant.describe())),
                None => Err(DecodeError::MissingField(name.to_string())),
            }
        }
    };
}

impl FieldReader {
    pub(crate) fn new(specs: &'static [FieldSpec], values: Vec<FieldValue>) -> Self {
        Self {
            specs: specs.iter(),
            values: values.into_iter(),
        }
    }

    take_field!(containment, Containment, Containment);
    take_field!(comparison, Comparison, Comparison);
    take_field!(boolean, Bool, bool);
    take_field!(number, Number, f64);
    take_field!(text, Text, String);
    take_field!(values, Values, BTreeSet<String>);
    take_field!(mana_cost, ManaCost, ManaCost);
    take_field!(colors, Colors, ColorSet);
}

/// Implemented by every leaf struct.
pub(crate) trait LeafSchema: Sized {
    /// Field table in wire order.
    const FIELDS: &'static [FieldSpec];

    /// Field values in the order of `FIELDS`.
    fn to_fields(&self) -> Vec<FieldValue>;

    /// Rebuild the leaf from values read in the order of `FIELDS`.
    fn from_fields(
        attribute: super::FilterAttribute,
        fields: &mut FieldReader,
    ) -> Result<Self, DecodeError>;
}

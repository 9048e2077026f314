//! Whole type line leaf, matched word by word.

use crate::cards::Card;
use crate::error::DecodeError;
use crate::filter::attribute::{AttributeValue, FilterAttribute};
use crate::filter::containment::Containment;
use crate::filter::schema::{field, FieldKind, FieldReader, FieldSpec, FieldValue, LeafSchema};

/// Matches words of the whole type line, ignoring case.
///
/// `line` is split on whitespace, so `"legendary creature"` selects the
/// two types `legendary` and `creature` independently of where they sit
/// on the card's type line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeLineFilter {
    pub contain: Containment,
    pub line: String,
}

impl TypeLineFilter {
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
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.line = line.into();
        self
    }

    pub fn test(&self, card: &Card) -> bool {
        let AttributeValue::TypeLines(lines) = FilterAttribute::TypeLine.value(card) else {
            return false;
        };
        let selected: Vec<String> = self.line.split_whitespace().map(str::to_lowercase).collect();
        lines.iter().any(|line| {
            self.contain
                .test(line.all_types().map(str::to_lowercase), selected.iter().cloned())
        })
    }
}

impl LeafSchema for TypeLineFilter {
    const FIELDS: &'static [FieldSpec] = &[
        field("contains", FieldKind::Containment),
        field("line", FieldKind::Text),
    ];

    fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Containment(self.contain),
            FieldValue::Text(self.line.clone()),
        ]
    }

    fn from_fields(_: FilterAttribute, fields: &mut FieldReader) -> Result<Self, DecodeError> {
        Ok(Self {
            contain: fields.containment()?,
            line: fields.text()?,
        })
    }
}

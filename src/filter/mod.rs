//! Filter expressions.
//!
//! A `Filter` is a tree: leaves constrain one card attribute each, groups
//! combine their children with AND, OR or NOR. Filters are plain data:
//! `Clone` gives an independent deep copy, and equality is structural
//! (group children compare as multisets).
//!
//! ## Key Types
//!
//! - `Filter`: Leaf or group
//! - `FilterAttribute`: The closed registry of filterable attributes
//! - `LeafFilter`: One of the leaf families (`TextFilter`, `OptionsFilter`, ...)
//! - `FilterGroup` / `GroupMode`: Boolean combination
//! - `Containment` / `Comparison`: Set and numeric relations used by leaves
//!
//! ## Persisted forms
//!
//! Every filter round-trips through three encodings: the bracketed text
//! form (`to_text`/`from_text`, also `Display`/`FromStr`), a fixed-layout
//! binary form (`to_binary`/`from_binary`) and a JSON tree
//! (`to_tree`/`from_tree`, also serde).

pub mod attribute;
pub mod comparison;
pub mod containment;
pub mod group;
pub mod leaf;

pub(crate) mod codec;
pub(crate) mod schema;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cards::Card;
use crate::error::{DecodeError, EncodeError, ParseError};
use crate::vocabulary::FilterVocabulary;

pub use attribute::{AttributeValue, FilterAttribute, LeafShape};
pub use comparison::Comparison;
pub use containment::Containment;
pub use group::{FilterGroup, GroupMode};
pub use leaf::{
    ColorFilter, LeafFilter, LegalityFilter, ManaCostFilter, NumberFilter, OptionsFilter,
    TextFilter, TypeLineFilter, VariableNumberFilter,
};
pub use schema::{FieldKind, FieldSpec};

/// Opens a filter in the text form.
pub const BEGIN_GROUP: char = '«';
/// Closes a filter in the text form.
pub const END_GROUP: char = '»';
/// Discriminator of a group in the binary and tree forms.
pub const GROUP_TAG: &str = "GROUP";
/// Deepest group nesting the decoders accept.
pub const MAX_DEPTH: usize = 256;

/// A card predicate.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Leaf(LeafFilter),
    Group(FilterGroup),
}

impl Filter {
    /// Matches every card.
    #[must_use]
    pub fn all() -> Self {
        Filter::Leaf(LeafFilter::Binary(true))
    }

    /// Matches no card.
    #[must_use]
    pub fn none() -> Self {
        Filter::Leaf(LeafFilter::Binary(false))
    }

    /// A default leaf for `attribute`.
    #[must_use]
    pub fn leaf(attribute: FilterAttribute) -> Self {
        Filter::Leaf(attribute.default_leaf())
    }

    pub fn test(&self, card: &Card) -> bool {
        match self {
            Filter::Leaf(leaf) => leaf.test(card),
            Filter::Group(group) => group.test(card),
        }
    }

    /// The leaf's attribute, `None` for a group.
    #[must_use]
    pub fn attribute(&self) -> Option<FilterAttribute> {
        self.as_leaf().map(LeafFilter::attribute)
    }

    /// Attribute code of a leaf, or [`GROUP_TAG`].
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Filter::Leaf(leaf) => leaf.attribute().code(),
            Filter::Group(_) => GROUP_TAG,
        }
    }

    #[must_use]
    pub fn as_leaf(&self) -> Option<&LeafFilter> {
        match self {
            Filter::Leaf(leaf) => Some(leaf),
            Filter::Group(_) => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut LeafFilter> {
        match self {
            Filter::Leaf(leaf) => Some(leaf),
            Filter::Group(_) => None,
        }
    }

    #[must_use]
    pub fn as_group(&self) -> Option<&FilterGroup> {
        match self {
            Filter::Group(group) => Some(group),
            Filter::Leaf(_) => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut FilterGroup> {
        match self {
            Filter::Group(group) => Some(group),
            Filter::Leaf(_) => None,
        }
    }

    /// The node reached by following child indices from this one.
    ///
    /// An empty path is `self`.
    #[must_use]
    pub fn at_path(&self, path: &[usize]) -> Option<&Filter> {
        let mut node = self;
        for &index in path {
            node = node.as_group()?.children().get(index)?;
        }
        Some(node)
    }

    pub fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Filter> {
        let mut node = self;
        for &index in path {
            node = node.as_group_mut()?.children_mut().get_mut(index)?;
        }
        Some(node)
    }

    // === Text form ===

    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        codec::text::write(self, &mut out);
        out
    }

    pub fn from_text(text: &str) -> Result<Self, ParseError> {
        let filter = codec::text::parse(text)?;
        tracing::debug!("Parsed {} filter from {} bytes of text", filter.kind(), text.len());
        Ok(filter)
    }

    /// Parse, then check every option value against `vocabulary`.
    pub fn from_text_with(text: &str, vocabulary: &FilterVocabulary) -> Result<Self, ParseError> {
        let filter = Self::from_text(text)?;
        vocabulary.validate(&filter)?;
        Ok(filter)
    }

    // === Binary form ===

    pub fn to_binary(&self) -> Result<Vec<u8>, EncodeError> {
        let mut bytes = Vec::new();
        self.write_binary(&mut bytes)?;
        Ok(bytes)
    }

    pub fn write_binary<W: Write>(&self, w: &mut W) -> Result<(), EncodeError> {
        codec::binary::write_filter(w, self)
    }

    /// Decode a filter that must span all of `bytes`.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut rest = bytes;
        let filter = Self::read_binary(&mut rest)?;
        if !rest.is_empty() {
            return Err(DecodeError::TrailingBytes(rest.len()));
        }
        tracing::debug!("Decoded {} filter from {} bytes", filter.kind(), bytes.len());
        Ok(filter)
    }

    /// Decode one filter from the front of `r`, advancing it past the filter.
    pub fn read_binary(r: &mut &[u8]) -> Result<Self, DecodeError> {
        codec::binary::read_filter(r)
    }

    // === Tree form ===

    #[must_use]
    pub fn to_tree(&self) -> serde_json::Value {
        codec::tree::encode(self)
    }

    pub fn from_tree(tree: &serde_json::Value) -> Result<Self, DecodeError> {
        let filter = codec::tree::decode(tree)?;
        tracing::debug!("Decoded {} filter from tree", filter.kind());
        Ok(filter)
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter::all()
    }
}

impl From<LeafFilter> for Filter {
    fn from(leaf: LeafFilter) -> Self {
        Filter::Leaf(leaf)
    }
}

impl From<FilterGroup> for Filter {
    fn from(group: FilterGroup) -> Self {
        Filter::Group(group)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for Filter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_tree().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tree = serde_json::Value::deserialize(deserializer)?;
        Self::from_tree(&tree).map_err(serde::de::Error::custom)
    }
}

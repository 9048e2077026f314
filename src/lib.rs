//! # card-filter
//!
//! Filter expressions and category specifications for a trading card
//! collection manager.
//!
//! ## Design Principles
//!
//! 1. **Closed Registry**: Every filterable attribute is one entry of
//!    `FilterAttribute`, with a stable text code and a fixed leaf shape.
//!    Saved filters depend on those codes.
//!
//! 2. **One Schema, Three Forms**: Each leaf kind declares its persisted
//!    fields once. The binary and tree codecs are driven from that
//!    declaration; the text form is hand-written for readability.
//!
//! 3. **Plain Data**: Filters own their children. `Clone` is a deep copy,
//!    equality is structural, and evaluation never fails.
//!
//! ## Architecture
//!
//! - **Evaluation**: `Filter::test` walks the tree. Leaves read card values
//!   through their attribute and relate them with a `Containment` or a
//!   `Comparison`; groups combine child verdicts with AND, OR or NOR.
//!
//! - **Categories**: `CategorySpec` overrides a filter with a whitelist
//!   and a blacklist of card ids and notifies listeners synchronously.
//!
//! ## Modules
//!
//! - `cards`: Card model and identifier lookup
//! - `filter`: Attributes, leaves, groups and codecs
//! - `category`: Category specifications and change events
//! - `vocabulary`: Known option values for option leaves
//! - `error`: Typed errors for parsing and decoding

pub mod cards;
pub mod category;
pub mod error;
pub mod filter;
pub mod vocabulary;

// Re-export commonly used types
pub use crate::cards::{Card, CardDatabase, CardId, CardLookup};

pub use crate::filter::{
    Comparison, Containment, Filter, FilterAttribute, FilterGroup, GroupMode, LeafFilter,
    BEGIN_GROUP, END_GROUP, MAX_DEPTH,
};

pub use crate::category::{CategoryEvent, CategorySpec, ListenerId, Rgb};

pub use crate::vocabulary::FilterVocabulary;

pub use crate::error::{DecodeError, EncodeError, FilterError, ParseError, UnknownCardError};

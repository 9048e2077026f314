//! Card model consumed by the filter engine.
//!
//! ## Key Types
//!
//! - `CardId`: Stable identifier of a printing
//! - `Card` / `CardFace`: Queryable card data, per card and per face
//! - `ManaCost`, `ColorSet`, `TypeLine`, `CombatStat`, `Legality`: Attribute values
//! - `CardLookup` / `CardDatabase`: Identifier resolution for decoders
//!
//! Filters only read cards; nothing in this crate mutates them.

pub mod card;
pub mod color;
pub mod database;
pub mod mana;
pub mod types;

pub use card::{Card, CardFace, CardId, Expansion};
pub use color::{Color, ColorSet};
pub use database::{CardDatabase, CardLookup};
pub use mana::{ManaCost, ManaSymbol};
pub use types::{CombatStat, Legality, TypeLine, SUPERTYPES};

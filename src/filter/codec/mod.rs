//! The three persisted forms of a filter.
//!
//! - `text`: bracketed, human-editable, used in saved settings
//! - `binary`: fixed layout, used in legacy save files
//! - `tree`: JSON object tree, used by newer save files and serde
//!
//! All three describe the same tree and decode to equal filters.

pub(crate) mod binary;
pub(crate) mod text;
pub(crate) mod tree;

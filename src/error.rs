//! Error types for filter parsing, decoding and card lookup.
//!
//! Every failure is recoverable and typed. `Filter::test` never fails;
//! only the codecs and the operator parsers report errors.

use thiserror::Error;

use crate::cards::CardId;

/// An unknown containment token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown containment: {0:?}")]
pub struct ContainmentParseError(pub String);

/// An unknown comparison token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown comparison: {0:?}")]
pub struct ComparisonParseError(pub String);

/// A malformed mana cost string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid mana cost {cost:?}: {reason}")]
pub struct ManaCostParseError {
    pub cost: String,
    pub reason: String,
}

/// A card identifier that the lookup could not resolve.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown card: {0}")]
pub struct UnknownCardError(pub CardId);

/// Malformed text form.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty filter text")]
    Empty,

    #[error("unbalanced delimiters at offset {offset}")]
    Unbalanced { offset: usize },

    #[error("expected '{expected}' at offset {offset}")]
    Expected { expected: char, offset: usize },

    #[error("unexpected trailing input: {0:?}")]
    TrailingInput(String),

    #[error("unknown attribute code: {0:?}")]
    UnknownAttribute(String),

    #[error("unknown group mode: {0:?}")]
    UnknownMode(String),

    #[error("malformed body for '{code}': {reason}")]
    MalformedBody { code: String, reason: String },

    #[error("'{value}' is not a known option for {attribute}")]
    UnknownOption { attribute: String, value: String },

    #[error(transparent)]
    Containment(#[from] ContainmentParseError),

    #[error(transparent)]
    Comparison(#[from] ComparisonParseError),

    #[error(transparent)]
    ManaCost(#[from] ManaCostParseError),

    #[error("groups nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("child {index}: {source}")]
    Child {
        index: usize,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    pub(crate) fn body(code: &str, reason: impl Into<String>) -> Self {
        Self::MalformedBody {
            code: code.to_string(),
            reason: reason.into(),
        }
    }
}

/// Malformed binary or tree form.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("unknown discriminator: {0:?}")]
    UnknownDiscriminator(String),

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("field '{field}' should be {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    #[error("malformed binary data: {0}")]
    Binary(#[from] bincode::Error),

    #[error("{0} unread bytes after filter")]
    TrailingBytes(usize),

    #[error("invalid data: {0}")]
    Invalid(String),

    #[error(transparent)]
    Containment(#[from] ContainmentParseError),

    #[error(transparent)]
    Comparison(#[from] ComparisonParseError),

    #[error(transparent)]
    ManaCost(#[from] ManaCostParseError),

    #[error(transparent)]
    UnknownCard(#[from] UnknownCardError),

    #[error("groups nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("child {index}: {source}")]
    Child {
        index: usize,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    pub(crate) fn mismatch(field: &str, expected: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.to_string(),
            expected,
        }
    }
}

/// Failure while writing the binary form.
#[derive(Error, Debug)]
#[error("failed to write binary data: {0}")]
pub struct EncodeError(#[from] pub bincode::Error);

/// Umbrella error for callers that do not care which codec failed.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    UnknownCard(#[from] UnknownCardError),
}

/// Result alias used by the codecs.
pub type Result<T, E = FilterError> = std::result::Result<T, E>;

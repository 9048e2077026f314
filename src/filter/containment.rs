//! Set relations between a card's values and a filter's selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::ContainmentParseError;

/// How a card's values must relate to the selected values.
///
/// `NotAllOf` is not the plain negation of `AllOf`: it also requires that
/// at least one selected value is present. Saved filters depend on this.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Containment {
    #[default]
    AnyOf,
    NoneOf,
    AllOf,
    NotAllOf,
    Exactly,
    NotExactly,
}

impl Containment {
    pub const ALL: [Containment; 6] = [
        Containment::AnyOf,
        Containment::NoneOf,
        Containment::AllOf,
        Containment::NotAllOf,
        Containment::Exactly,
        Containment::NotExactly,
    ];

    /// Stable short code used by the text and tree forms.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Containment::AnyOf => "anyof",
            Containment::NoneOf => "noneof",
            Containment::AllOf => "allof",
            Containment::NotAllOf => "notallof",
            Containment::Exactly => "exactly",
            Containment::NotExactly => "notexactly",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Containment::AnyOf => "contains any of",
            Containment::NoneOf => "contains none of",
            Containment::AllOf => "contains all of",
            Containment::NotAllOf => "contains not all of",
            Containment::Exactly => "contains exactly",
            Containment::NotExactly => "does not contain exactly",
        }
    }

    /// Test the relation between a card's values and the selection.
    ///
    /// Both sides are compared as sets; duplicates do not matter.
    pub fn test<T, I, J>(self, values: I, selected: J) -> bool
    where
        T: PartialEq,
        I: IntoIterator<Item = T>,
        J: IntoIterator<Item = T>,
    {
        let values: SmallVec<[T; 8]> = values.into_iter().collect();
        let selected: SmallVec<[T; 8]> = selected.into_iter().collect();

        let any = selected.is_empty() || selected.iter().any(|s| values.contains(s));
        let all = || selected.iter().all(|s| values.contains(s));
        let exact = || all() && values.iter().all(|v| selected.contains(v));

        match self {
            Containment::AnyOf => any,
            Containment::NoneOf => !selected.iter().any(|s| values.contains(s)),
            Containment::AllOf => all(),
            Containment::NotAllOf => any && !all(),
            Containment::Exactly => exact(),
            Containment::NotExactly => !exact(),
        }
    }

    /// Split a leading containment code off a text body.
    ///
    /// Codes are letters only, so the code ends at the first non-letter.
    /// A body without a code uses the default (`AnyOf`).
    pub(crate) fn split_prefix(body: &str) -> Result<(Containment, &str), ContainmentParseError> {
        let end = body
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(body.len());
        if end == 0 {
            return Ok((Containment::default(), body));
        }
        Ok((body[..end].parse()?, &body[end..]))
    }
}

impl FromStr for Containment {
    type Err = ContainmentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Containment::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s) || c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ContainmentParseError(s.to_string()))
    }
}

impl fmt::Display for Containment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

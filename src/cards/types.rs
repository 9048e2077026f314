//! Type lines, combat statistics and format legality.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Supertypes recognised when splitting a printed type line.
pub const SUPERTYPES: [&str; 5] = ["Basic", "Legendary", "Ongoing", "Snow", "World"];

/// The type line of one card face.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeLine {
    pub supertypes: Vec<String>,
    pub types: Vec<String>,
    pub subtypes: Vec<String>,
}

impl TypeLine {
    #[must_use]
    pub fn new<S: Into<String>>(
        supertypes: impl IntoIterator<Item = S>,
        types: impl IntoIterator<Item = S>,
        subtypes: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            supertypes: supertypes.into_iter().map(Into::into).collect(),
            types: types.into_iter().map(Into::into).collect(),
            subtypes: subtypes.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a printed type line such as `Legendary Creature — Goblin Wizard`.
    ///
    /// Words before the dash are supertypes if listed in [`SUPERTYPES`],
    /// card types otherwise. Both an em dash and ` - ` are accepted.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let (front, back) = match line.split_once('—') {
            Some(parts) => parts,
            None => line.split_once(" - ").unwrap_or((line, "")),
        };

        let mut type_line = TypeLine::default();
        for word in front.split_whitespace() {
            if SUPERTYPES.iter().any(|s| s.eq_ignore_ascii_case(word)) {
                type_line.supertypes.push(word.to_string());
            } else {
                type_line.types.push(word.to_string());
            }
        }
        type_line.subtypes = back.split_whitespace().map(str::to_string).collect();
        type_line
    }

    /// Supertypes, card types and subtypes in printed order.
    pub fn all_types(&self) -> impl Iterator<Item = &str> {
        self.supertypes
            .iter()
            .chain(&self.types)
            .chain(&self.subtypes)
            .map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.supertypes.is_empty() && self.types.is_empty() && self.subtypes.is_empty()
    }
}

impl fmt::Display for TypeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let front: Vec<&str> = self
            .supertypes
            .iter()
            .chain(&self.types)
            .map(String::as_str)
            .collect();
        f.write_str(&front.join(" "))?;
        if !self.subtypes.is_empty() {
            write!(f, " — {}", self.subtypes.join(" "))?;
        }
        Ok(())
    }
}

/// Power, toughness or loyalty as printed.
///
/// The printed expression may be variable (`*`, `1+*`, `X`). The numeric
/// value is the constant part of the expression, or NaN when there is none.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CombatStat {
    expression: String,
    value: f64,
}

impl CombatStat {
    #[must_use]
    pub fn new(expression: impl Into<String>) -> Self {
        let expression = expression.into();
        let constant: String = expression
            .chars()
            .filter(|c| !matches!(c, '*' | 'X' | 'x' | '?' | '²'))
            .collect();
        let constant = constant.trim().trim_end_matches(['+', '-']).trim();
        let value = constant.parse::<f64>().unwrap_or(f64::NAN);
        Self { expression, value }
    }

    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Numeric value, NaN if the stat has no constant part.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Whether the printed value depends on the game state.
    #[must_use]
    pub fn is_variable(&self) -> bool {
        self.expression
            .chars()
            .any(|c| matches!(c, '*' | 'X' | 'x' | '?'))
    }
}

impl PartialEq for CombatStat {
    fn eq(&self, other: &Self) -> bool {
        self.expression == other.expression
    }
}

impl fmt::Display for CombatStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

/// Legality of a card in one format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Legality {
    Legal,
    Restricted,
    Banned,
    NotLegal,
}

impl Legality {
    /// Restricted cards are still legal, just limited to one copy.
    #[must_use]
    pub const fn is_legal(self) -> bool {
        matches!(self, Legality::Legal | Legality::Restricted)
    }
}

//! Mana costs.
//!
//! A mana cost is a multiset of symbols written in brace notation, e.g.
//! `{2}{R}{R}` or `{W/U}{W/P}`. Symbols may repeat, so plain set
//! containment is not enough to compare two costs; see
//! [`ManaCost::is_superset`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::color::{Color, ColorSet};
use crate::error::ManaCostParseError;

/// A single mana symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ManaSymbol {
    /// `{N}`
    Generic(u32),
    /// `{W}`, `{U}`, ...
    Colored(Color),
    /// `{C}`
    Colorless,
    /// `{W/U}`
    Hybrid(Color, Color),
    /// `{2/W}`
    TwoHybrid(Color),
    /// `{W/P}`
    Phyrexian(Color),
    /// `{S}`
    Snow,
    /// `{X}`, `{Y}`, `{Z}`
    Variable(char),
}

impl ManaSymbol {
    /// Parse the text between a pair of braces.
    fn parse_inner(inner: &str) -> Option<Self> {
        let inner = inner.trim().to_ascii_uppercase();
        if let Ok(n) = inner.parse::<u32>() {
            return Some(ManaSymbol::Generic(n));
        }
        match inner.split_once('/') {
            None => {
                let mut chars = inner.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                match c {
                    'C' => Some(ManaSymbol::Colorless),
                    'S' => Some(ManaSymbol::Snow),
                    'X' | 'Y' | 'Z' => Some(ManaSymbol::Variable(c)),
                    _ => Color::from_symbol(c).map(ManaSymbol::Colored),
                }
            }
            Some((left, right)) => {
                let single = |s: &str| {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Some(c),
                        _ => None,
                    }
                };
                match (left, right) {
                    ("2", r) => Color::from_symbol(single(r)?).map(ManaSymbol::TwoHybrid),
                    (l, "P") => Color::from_symbol(single(l)?).map(ManaSymbol::Phyrexian),
                    (l, r) => Some(ManaSymbol::Hybrid(
                        Color::from_symbol(single(l)?)?,
                        Color::from_symbol(single(r)?)?,
                    )),
                }
            }
        }
    }

    /// Contribution of this symbol to the mana value.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            ManaSymbol::Generic(n) => f64::from(n),
            ManaSymbol::Variable(_) => 0.0,
            ManaSymbol::TwoHybrid(_) => 2.0,
            _ => 1.0,
        }
    }

    /// Colors this symbol contributes to a card's color.
    #[must_use]
    pub fn colors(self) -> ColorSet {
        match self {
            ManaSymbol::Colored(c) | ManaSymbol::TwoHybrid(c) | ManaSymbol::Phyrexian(c) => {
                ColorSet::new().with(c)
            }
            ManaSymbol::Hybrid(a, b) => ColorSet::new().with(a).with(b),
            _ => ColorSet::new(),
        }
    }
}

impl fmt::Display for ManaSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManaSymbol::Generic(n) => write!(f, "{{{n}}}"),
            ManaSymbol::Colored(c) => write!(f, "{{{}}}", c.symbol()),
            ManaSymbol::Colorless => f.write_str("{C}"),
            ManaSymbol::Hybrid(a, b) => write!(f, "{{{}/{}}}", a.symbol(), b.symbol()),
            ManaSymbol::TwoHybrid(c) => write!(f, "{{2/{}}}", c.symbol()),
            ManaSymbol::Phyrexian(c) => write!(f, "{{{}/P}}", c.symbol()),
            ManaSymbol::Snow => f.write_str("{S}"),
            ManaSymbol::Variable(v) => write!(f, "{{{v}}}"),
        }
    }
}

/// A mana cost as written on a card face.
///
/// Equality is multiset equality: `{1}{R}` equals `{R}{1}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ManaCost {
    symbols: Vec<ManaSymbol>,
}

impl ManaCost {
    /// The empty cost (lands, most tokens).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            symbols: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_symbols(symbols: impl IntoIterator<Item = ManaSymbol>) -> Self {
        Self {
            symbols: symbols.into_iter().collect(),
        }
    }

    /// Symbols in written order.
    #[must_use]
    pub fn symbols(&self) -> &[ManaSymbol] {
        &self.symbols
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Total generic mana.
    #[must_use]
    pub fn generic(&self) -> u64 {
        self.symbols
            .iter()
            .map(|s| match s {
                ManaSymbol::Generic(n) => u64::from(*n),
                _ => 0,
            })
            .sum()
    }

    /// Number of occurrences of a symbol.
    #[must_use]
    pub fn count(&self, symbol: ManaSymbol) -> usize {
        self.symbols.iter().filter(|s| **s == symbol).count()
    }

    #[must_use]
    pub fn mana_value(&self) -> f64 {
        self.symbols.iter().map(|s| s.value()).sum()
    }

    #[must_use]
    pub fn colors(&self) -> ColorSet {
        self.symbols
            .iter()
            .flat_map(|s| s.colors().iter())
            .collect()
    }

    /// Whether this cost contains at least every symbol of `other`,
    /// counting repeats. Generic mana is compared by total amount.
    #[must_use]
    pub fn is_superset(&self, other: &ManaCost) -> bool {
        if self.generic() < other.generic() {
            return false;
        }
        other
            .symbols
            .iter()
            .filter(|s| !matches!(s, ManaSymbol::Generic(_)))
            .all(|s| self.count(*s) >= other.count(*s))
    }

    fn sorted(&self) -> Vec<ManaSymbol> {
        let mut symbols = self.symbols.clone();
        symbols.sort();
        symbols
    }
}

impl PartialEq for ManaCost {
    fn eq(&self, other: &Self) -> bool {
        self.symbols.len() == other.symbols.len() && self.sorted() == other.sorted()
    }
}

impl Eq for ManaCost {}

impl FromStr for ManaCost {
    type Err = ManaCostParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = |reason: &str| ManaCostParseError {
            cost: s.to_string(),
            reason: reason.to_string(),
        };

        let mut symbols = Vec::new();
        let mut rest = s.trim();
        while !rest.is_empty() {
            let Some(after_open) = rest.strip_prefix('{') else {
                return Err(error("expected '{'"));
            };
            let Some(close) = after_open.find('}') else {
                return Err(error("missing '}'"));
            };
            let inner = &after_open[..close];
            let symbol = ManaSymbol::parse_inner(inner)
                .ok_or_else(|| error(&format!("unknown symbol {{{inner}}}")))?;
            symbols.push(symbol);
            rest = after_open[close + 1..].trim_start();
        }
        Ok(Self { symbols })
    }
}

impl fmt::Display for ManaCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

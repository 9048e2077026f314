//! Colors and color sets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five colors of mana.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    /// All colors in canonical WUBRG order.
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    /// Single-letter symbol used in mana costs and filter text.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    /// Parse a color symbol, ignoring case.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::White => "White",
            Color::Blue => "Blue",
            Color::Black => "Black",
            Color::Red => "Red",
            Color::Green => "Green",
        };
        f.write_str(name)
    }
}

/// A set of colors stored as a bit mask.
///
/// Iteration and display always follow WUBRG order, so two equal sets
/// always print the same symbols.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorSet(u8);

impl ColorSet {
    /// The empty (colorless) set.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Parse a string of color symbols such as `"WUR"`.
    ///
    /// Returns `None` on any character that is not a color symbol.
    #[must_use]
    pub fn parse(symbols: &str) -> Option<Self> {
        symbols
            .chars()
            .map(Color::from_symbol)
            .collect::<Option<ColorSet>>()
    }

    pub fn insert(&mut self, color: Color) -> bool {
        let added = !self.contains(color);
        self.0 |= color.bit();
        added
    }

    pub fn remove(&mut self, color: Color) -> bool {
        let removed = self.contains(color);
        self.0 &= !color.bit();
        removed
    }

    /// Add a color (builder pattern).
    #[must_use]
    pub fn with(mut self, color: Color) -> Self {
        self.insert(color);
        self
    }

    #[must_use]
    pub const fn contains(self, color: Color) -> bool {
        self.0 & color.bit() != 0
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the colors in WUBRG order.
    pub fn iter(self) -> impl Iterator<Item = Color> {
        Color::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        let mut set = ColorSet::new();
        for color in iter {
            set.insert(color);
        }
        set
    }
}

impl fmt::Display for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for color in self.iter() {
            write!(f, "{}", color.symbol())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive_and_ordered() {
        let set = ColorSet::parse("rgw").unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.to_string(), "WRG");
    }

    #[test]
    fn test_parse_rejects_unknown_symbol() {
        assert_eq!(ColorSet::parse("WQ"), None);
        assert_eq!(ColorSet::parse(""), Some(ColorSet::new()));
    }

    #[test]
    fn test_insert_remove() {
        let mut set = ColorSet::new();
        assert!(set.insert(Color::Blue));
        assert!(!set.insert(Color::Blue));
        assert!(set.contains(Color::Blue));
        assert!(set.remove(Color::Blue));
        assert!(set.is_empty());
    }
}

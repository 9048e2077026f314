//! Numeric relations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ComparisonParseError;

/// Relational operator between a card value and an operand.
///
/// NaN stands for "no value". Equality treats two missing values as
/// equal; the ordering operators never match a missing value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    #[default]
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
}

impl Comparison {
    pub const ALL: [Comparison; 6] = [
        Comparison::Eq,
        Comparison::Ne,
        Comparison::Ge,
        Comparison::Le,
        Comparison::Gt,
        Comparison::Lt,
    ];

    /// Single-character code of the binary form.
    #[must_use]
    pub const fn wire(self) -> char {
        match self {
            Comparison::Eq => '=',
            Comparison::Ne => '≠',
            Comparison::Ge => '≥',
            Comparison::Le => '≤',
            Comparison::Gt => '>',
            Comparison::Lt => '<',
        }
    }

    /// ASCII operator of the text form.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "!=",
            Comparison::Ge => ">=",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Lt => "<",
        }
    }

    pub fn from_wire(code: char) -> Result<Self, ComparisonParseError> {
        Comparison::ALL
            .into_iter()
            .find(|c| c.wire() == code)
            .ok_or_else(|| ComparisonParseError(code.to_string()))
    }

    /// Compare `value` against `operand`.
    #[must_use]
    pub fn test(self, value: f64, operand: f64) -> bool {
        let same = (value.is_nan() && operand.is_nan()) || value == operand;
        match self {
            Comparison::Eq => same,
            Comparison::Ne => !same,
            _ if value.is_nan() || operand.is_nan() => false,
            Comparison::Ge => value >= operand,
            Comparison::Le => value <= operand,
            Comparison::Gt => value > operand,
            Comparison::Lt => value < operand,
        }
    }

    /// `test` over optional values; `None` behaves like NaN.
    #[must_use]
    pub fn test_opt(self, value: Option<f64>, operand: Option<f64>) -> bool {
        self.test(value.unwrap_or(f64::NAN), operand.unwrap_or(f64::NAN))
    }

    /// Split a leading operator off a text body such as `>=3`.
    pub(crate) fn split_prefix(body: &str) -> Result<(Comparison, &str), ComparisonParseError> {
        const TOKENS: [(&str, Comparison); 10] = [
            (">=", Comparison::Ge),
            ("<=", Comparison::Le),
            ("!=", Comparison::Ne),
            ("==", Comparison::Eq),
            ("≥", Comparison::Ge),
            ("≤", Comparison::Le),
            ("≠", Comparison::Ne),
            ("=", Comparison::Eq),
            (">", Comparison::Gt),
            ("<", Comparison::Lt),
        ];
        TOKENS
            .iter()
            .find_map(|(token, op)| body.strip_prefix(token).map(|rest| (*op, rest)))
            .ok_or_else(|| {
                let token: String = body.chars().take_while(|c| !c.is_ascii_digit()).collect();
                ComparisonParseError(token)
            })
    }
}

impl FromStr for Comparison {
    type Err = ComparisonParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match Comparison::split_prefix(s) {
            Ok((op, "")) => Ok(op),
            _ => Err(ComparisonParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Comparison::Ge.test(3.0, 3.0));
        assert!(Comparison::Gt.test(4.0, 3.0));
        assert!(!Comparison::Lt.test(4.0, 3.0));
        assert!(Comparison::Le.test(2.5, 3.0));
    }

    #[test]
    fn test_missing_values() {
        let nan = f64::NAN;
        assert!(Comparison::Eq.test(nan, nan));
        assert!(!Comparison::Ne.test(nan, nan));
        assert!(!Comparison::Eq.test(nan, 1.0));
        assert!(Comparison::Ne.test(1.0, nan));
        for op in [Comparison::Ge, Comparison::Le, Comparison::Gt, Comparison::Lt] {
            assert!(!op.test(nan, 1.0));
            assert!(!op.test(1.0, nan));
        }
        assert!(Comparison::Eq.test_opt(None, None));
        assert!(!Comparison::Ge.test_opt(None, Some(0.0)));
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!("=".parse::<Comparison>().unwrap(), Comparison::Eq);
        assert_eq!("!=".parse::<Comparison>().unwrap(), Comparison::Ne);
        assert_eq!("≥".parse::<Comparison>().unwrap(), Comparison::Ge);
        assert_eq!("<".parse::<Comparison>().unwrap(), Comparison::Lt);
        assert!("~".parse::<Comparison>().is_err());
        assert!("=>".parse::<Comparison>().is_err());
    }

    #[test]
    fn test_wire_codes_are_distinct() {
        for op in Comparison::ALL {
            assert_eq!(Comparison::from_wire(op.wire()).unwrap(), op);
        }
        assert!(Comparison::from_wire('?').is_err());
    }

    #[test]
    fn test_split_prefix() {
        assert_eq!(Comparison::split_prefix(">=3").unwrap(), (Comparison::Ge, "3"));
        assert_eq!(Comparison::split_prefix(">3").unwrap(), (Comparison::Gt, "3"));
        assert_eq!(Comparison::split_prefix("=1.5").unwrap(), (Comparison::Eq, "1.5"));
    }
}

//! Parsing of free-text numeric fields
//!
//! Panel inputs arrive as optional strings. A blank field is "not entered"
//! and skips range checks; a non-numeric field fails them.

use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_NUMBER: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\s*-?\d+(\.\d+)?").ok());

/// A parsed input field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// Absent or whitespace only
    Blank,
    /// Finite number
    Number(f64),
    /// Present but not a finite number
    NotNumeric,
}

impl FieldValue {
    /// Parse an optional text field
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Blank,
            Some(text) => match text.parse::<f64>() {
                Ok(n) if n.is_finite() => Self::Number(n),
                _ => Self::NotNumeric,
            },
        }
    }

    /// Numeric value, if any
    #[inline]
    #[must_use]
    pub fn number(self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Check if blank
    #[inline]
    #[must_use]
    pub fn is_blank(self) -> bool {
        matches!(self, Self::Blank)
    }

    /// Inclusive range check where blank passes and non-numeric fails
    #[must_use]
    pub fn within(self, min: f64, max: f64) -> bool {
        match self {
            Self::Blank => true,
            Self::Number(n) => n >= min && n <= max,
            Self::NotNumeric => false,
        }
    }

    /// Present and different from zero
    #[inline]
    #[must_use]
    pub fn is_filled_non_zero(self) -> bool {
        match self {
            Self::Blank => false,
            Self::Number(n) => n != 0.0,
            Self::NotNumeric => true,
        }
    }
}

/// Parse an optional text field to a number, blank or invalid giving `None`
#[inline]
#[must_use]
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
    FieldValue::parse(raw).number()
}

/// Leading number of a label such as `"7.5 cm+"`
#[must_use]
pub fn leading_number(label: &str) -> Option<f64> {
    LEADING_NUMBER
        .as_ref()?
        .find(label)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_classifies_input() {
        assert_eq!(FieldValue::parse(None), FieldValue::Blank);
        assert_eq!(FieldValue::parse(Some("  ")), FieldValue::Blank);
        assert_eq!(FieldValue::parse(Some(" 12.5 ")), FieldValue::Number(12.5));
        assert_eq!(FieldValue::parse(Some("abc")), FieldValue::NotNumeric);
        assert_eq!(FieldValue::parse(Some("NaN")), FieldValue::NotNumeric);
    }

    #[test]
    fn within_treats_blank_as_valid() {
        assert!(FieldValue::Blank.within(0.0, 1.0));
        assert!(!FieldValue::NotNumeric.within(0.0, 1.0));
        assert!(FieldValue::Number(1.0).within(0.0, 1.0));
        assert!(!FieldValue::Number(1.01).within(0.0, 1.0));
    }

    #[test]
    fn leading_number_reads_labels() {
        assert_eq!(leading_number("7.5 cm+"), Some(7.5));
        assert_eq!(leading_number("7.5cm+"), Some(7.5));
        assert_eq!(leading_number(" 12 cm+"), Some(12.0));
        assert_eq!(leading_number("cm+"), None);
    }
}

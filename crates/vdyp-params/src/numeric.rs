//! Lenient number reading for form values
//!
//! Both readers take the longest numeric prefix after leading whitespace
//! and ignore whatever follows (`"12.7 cm"` reads as `12.7`, or `12` as an
//! integer). Blank or non-numeric input reads as `None`.

/// Length of the optionally signed digit prefix, with an optional fraction
fn numeric_prefix(s: &str, allow_fraction: bool) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if allow_fraction && bytes.get(end) == Some(&b'.') {
        let mut frac_end = end + 1;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if frac_end > end + 1 {
            digits += frac_end - end - 1;
            end = frac_end;
        }
    }
    if digits == 0 {
        ""
    } else {
        &s[..end]
    }
}

/// Integer prefix of a form value
#[must_use]
pub fn parse_int(value: Option<&str>) -> Option<i64> {
    let prefix = numeric_prefix(value?.trim_start(), false);
    if prefix.is_empty() {
        return None;
    }
    prefix.parse().ok()
}

/// Decimal prefix of a form value
#[must_use]
pub fn parse_float(value: Option<&str>) -> Option<f64> {
    let prefix = numeric_prefix(value?.trim_start(), true);
    if prefix.is_empty() {
        return None;
    }
    prefix.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_reads_leading_digits() {
        assert_eq!(parse_int(Some("42")), Some(42));
        assert_eq!(parse_int(Some("  12.9")), Some(12));
        assert_eq!(parse_int(Some("-7 years")), Some(-7));
        assert_eq!(parse_int(Some("abc")), None);
        assert_eq!(parse_int(Some("")), None);
        assert_eq!(parse_int(Some("-")), None);
        assert_eq!(parse_int(None), None);
    }

    #[test]
    fn float_reads_fraction() {
        assert_eq!(parse_float(Some("30.5")), Some(30.5));
        assert_eq!(parse_float(Some("7.5 cm+")), Some(7.5));
        assert_eq!(parse_float(Some("12.")), Some(12.0));
        assert_eq!(parse_float(Some(".5")), Some(0.5));
        assert_eq!(parse_float(Some("n/a")), None);
    }
}

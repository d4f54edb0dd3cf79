//! Species composition panel

use crate::error::ValidationError;
use crate::numeric::FieldValue;
use std::collections::HashSet;
use vdyp_tables::limits::{truncate_species_total, SPECIES_PERCENT, TOTAL_SPECIES_PERCENT};
use vdyp_tables::DerivedBy;

/// One species row as entered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeciesSlot<'a> {
    /// Species code
    pub code: Option<&'a str>,
    /// Percent text
    pub percent: Option<&'a str>,
}

impl<'a> SpeciesSlot<'a> {
    /// Create slot
    #[must_use]
    pub fn new(code: Option<&'a str>, percent: Option<&'a str>) -> Self {
        Self { code, percent }
    }
}

/// Sum of entered percents, truncated to one decimal
///
/// Blank and non-numeric percents count as zero.
#[must_use]
pub fn total_percent(slots: &[SpeciesSlot<'_>]) -> f64 {
    let sum: f64 = slots
        .iter()
        .filter_map(|s| FieldValue::parse(s.percent).number())
        .sum();
    truncate_species_total(sum)
}

/// Species panel validator
#[derive(Debug, Clone, Copy)]
pub struct SpeciesValidator;

impl SpeciesValidator {
    /// Create validator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Percentages must total exactly 100.0
    pub fn validate_total_percent(&self, slots: &[SpeciesSlot<'_>]) -> Result<(), ValidationError> {
        let total = total_percent(slots);
        if (total - TOTAL_SPECIES_PERCENT).abs() < f64::EPSILON {
            Ok(())
        } else {
            Err(ValidationError::TotalPercentNot100 {
                total: format!("{total:.1}"),
            })
        }
    }

    /// No species code may appear twice
    pub fn validate_duplicates(&self, slots: &[SpeciesSlot<'_>]) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for code in slots.iter().filter_map(|s| s.code.map(str::trim)) {
            if code.is_empty() {
                continue;
            }
            if !seen.insert(code.to_ascii_uppercase()) {
                return Err(ValidationError::DuplicateSpecies { code: code.to_string() });
            }
        }
        Ok(())
    }

    /// Each percent lies within 0..=100
    pub fn validate_percent_ranges(&self, slots: &[SpeciesSlot<'_>]) -> Result<(), ValidationError> {
        for (slot, entry) in slots.iter().enumerate() {
            if !FieldValue::parse(entry.percent).within(SPECIES_PERCENT.min, SPECIES_PERCENT.max) {
                return Err(ValidationError::SpeciesPercentOutOfRange {
                    slot,
                    min: SPECIES_PERCENT.min,
                    max: SPECIES_PERCENT.max,
                });
            }
        }
        Ok(())
    }

    /// A derivation method must be chosen
    pub fn validate_derived_by(&self, derived_by: Option<DerivedBy>) -> Result<(), ValidationError> {
        derived_by.map(|_| ()).ok_or(ValidationError::MissingDerivedBy)
    }

    /// Run every check in confirmation order
    pub fn validate(&self, derived_by: Option<DerivedBy>, slots: &[SpeciesSlot<'_>]) -> Result<(), ValidationError> {
        self.validate_derived_by(derived_by)?;
        self.validate_percent_ranges(slots)?;
        self.validate_duplicates(slots)?;
        self.validate_total_percent(slots)
    }
}

impl Default for SpeciesValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots<'a>(entries: &[(&'a str, &'a str)]) -> Vec<SpeciesSlot<'a>> {
        entries
            .iter()
            .map(|(c, p)| SpeciesSlot::new(Some(c), Some(p)))
            .collect()
    }

    #[test]
    fn total_truncates_to_one_decimal() {
        let s = slots(&[("PL", "33.33"), ("AC", "33.33"), ("H", "33.34")]);
        assert!((total_percent(&s) - 100.0).abs() < f64::EPSILON);

        let s = slots(&[("PL", "99.99")]);
        assert!((total_percent(&s) - 99.9).abs() < 1e-9);

        let s = slots(&[("PL", "33.33"), ("AC", "66.66")]);
        let err = SpeciesValidator::new().validate_total_percent(&s).unwrap_err();
        assert_eq!(err, ValidationError::TotalPercentNot100 { total: "99.9".into() });
    }

    #[test]
    fn total_must_be_100() {
        let v = SpeciesValidator::new();
        assert!(v.validate_total_percent(&slots(&[("PL", "30"), ("AC", "70")])).is_ok());
        let err = v.validate_total_percent(&slots(&[("PL", "30"), ("AC", "60")])).unwrap_err();
        assert_eq!(err, ValidationError::TotalPercentNot100 { total: "90.0".into() });
    }

    #[test]
    fn duplicate_named_in_message() {
        let v = SpeciesValidator::new();
        let err = v
            .validate_duplicates(&slots(&[("PL", "50"), ("AC", "25"), ("PL", "25")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Species 'PL' already specified");
    }

    #[test]
    fn blank_codes_are_not_duplicates() {
        let v = SpeciesValidator::new();
        let s = vec![SpeciesSlot::default(), SpeciesSlot::default(), SpeciesSlot::new(Some("PL"), Some("100"))];
        assert!(v.validate_duplicates(&s).is_ok());
    }

    #[test]
    fn percent_range() {
        let v = SpeciesValidator::new();
        let err = v.validate_percent_ranges(&slots(&[("PL", "50"), ("AC", "101")])).unwrap_err();
        assert!(matches!(err, ValidationError::SpeciesPercentOutOfRange { slot: 1, .. }));
        assert_eq!(err.to_string(), "Please enter a value between 0 and 100");
    }

    #[test]
    fn derived_by_required_first() {
        let v = SpeciesValidator::new();
        assert_eq!(
            v.validate(None, &slots(&[("PL", "100")])),
            Err(ValidationError::MissingDerivedBy)
        );
        assert!(v.validate(Some(DerivedBy::Volume), &slots(&[("PL", "100")])).is_ok());
    }
}

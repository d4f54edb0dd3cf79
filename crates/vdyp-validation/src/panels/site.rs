//! Site conditions panel

use crate::error::ValidationError;
use crate::numeric::FieldValue;
use vdyp_tables::limits::{BHA50_SITE_INDEX, SPZ_AGE, SPZ_HEIGHT};
use vdyp_tables::SiteSpeciesValues;

/// Site panel fields as entered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiteInput<'a> {
    /// Supplied or computed site index
    pub site_species_values: Option<SiteSpeciesValues>,
    /// BEC zone code
    pub bec_zone: Option<&'a str>,
    /// Site species, for messages
    pub site_species: Option<&'a str>,
    /// Age (years)
    pub age: Option<&'a str>,
    /// Height (m)
    pub height: Option<&'a str>,
    /// BHA 50 site index
    pub site_index: Option<&'a str>,
}

/// Site panel validator
#[derive(Debug, Clone, Copy)]
pub struct SiteValidator;

impl SiteValidator {
    /// Create validator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Site-index option and BEC zone must both be chosen
    pub fn validate_pre_confirm_fields(
        &self,
        site_species_values: Option<SiteSpeciesValues>,
        bec_zone: Option<&str>,
    ) -> Result<(), ValidationError> {
        if site_species_values.is_none() {
            return Err(ValidationError::SiteIndexOptionRequired);
        }
        if bec_zone.map_or(true, |z| z.trim().is_empty()) {
            return Err(ValidationError::BecZoneRequired);
        }
        Ok(())
    }

    /// Fields required by the chosen site-index option
    ///
    /// Computed needs age, height and site index all present and non-zero;
    /// supplied needs a site index. No option means nothing is required.
    pub fn validate_required_fields(
        &self,
        site_species_values: Option<SiteSpeciesValues>,
        site_species: Option<&str>,
        age: Option<&str>,
        height: Option<&str>,
        site_index: Option<&str>,
    ) -> Result<(), ValidationError> {
        let species = site_species.unwrap_or_default().to_string();
        match site_species_values {
            Some(SiteSpeciesValues::Computed) => {
                let filled = [age, height, site_index]
                    .into_iter()
                    .all(|f| FieldValue::parse(f).is_filled_non_zero());
                if filled {
                    Ok(())
                } else {
                    Err(ValidationError::SiteValuesRequired { species })
                }
            }
            Some(SiteSpeciesValues::Supplied) => {
                if FieldValue::parse(site_index).is_blank() {
                    Err(ValidationError::SiteIndexValueRequired { species })
                } else {
                    Ok(())
                }
            }
            None => Ok(()),
        }
    }

    /// Age, height and site index within their bounds
    pub fn validate_range(
        &self,
        age: Option<&str>,
        height: Option<&str>,
        site_index: Option<&str>,
    ) -> Result<(), ValidationError> {
        if !FieldValue::parse(age).within(SPZ_AGE.min, SPZ_AGE.max) {
            return Err(ValidationError::SpzAgeOutOfRange);
        }
        if !FieldValue::parse(height).within(SPZ_HEIGHT.min, SPZ_HEIGHT.max) {
            return Err(ValidationError::SpzHeightOutOfRange);
        }
        if !FieldValue::parse(site_index).within(BHA50_SITE_INDEX.min, BHA50_SITE_INDEX.max) {
            return Err(ValidationError::SiteIndexOutOfRange);
        }
        Ok(())
    }

    /// Run every check in confirmation order
    pub fn validate(&self, input: &SiteInput<'_>) -> Result<(), ValidationError> {
        self.validate_pre_confirm_fields(input.site_species_values, input.bec_zone)?;
        self.validate_required_fields(
            input.site_species_values,
            input.site_species,
            input.age,
            input.height,
            input.site_index,
        )?;
        self.validate_range(input.age, input.height, input.site_index)
    }
}

impl Default for SiteValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_confirm_order() {
        let v = SiteValidator::new();
        assert_eq!(
            v.validate_pre_confirm_fields(None, None),
            Err(ValidationError::SiteIndexOptionRequired)
        );
        assert_eq!(
            v.validate_pre_confirm_fields(Some(SiteSpeciesValues::Computed), Some(" ")),
            Err(ValidationError::BecZoneRequired)
        );
        assert!(v
            .validate_pre_confirm_fields(Some(SiteSpeciesValues::Computed), Some("IDF"))
            .is_ok());
    }

    #[test]
    fn computed_requires_non_zero_values() {
        let v = SiteValidator::new();
        let computed = Some(SiteSpeciesValues::Computed);
        assert!(v
            .validate_required_fields(computed, Some("PL"), Some("60"), Some("17"), Some("16.3"))
            .is_ok());
        let err = v
            .validate_required_fields(computed, Some("PL"), Some("0"), Some("17"), Some("16.3"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The species 'PL' must have Years/Height in Meters values supplied"
        );
    }

    #[test]
    fn supplied_requires_site_index() {
        let v = SiteValidator::new();
        let supplied = Some(SiteSpeciesValues::Supplied);
        assert!(v.validate_required_fields(supplied, Some("H"), None, None, Some("20")).is_ok());
        assert!(matches!(
            v.validate_required_fields(supplied, Some("H"), None, None, None),
            Err(ValidationError::SiteIndexValueRequired { .. })
        ));
        assert!(v.validate_required_fields(None, None, None, None, None).is_ok());
    }

    #[test]
    fn range_checks_each_field() {
        let v = SiteValidator::new();
        assert_eq!(v.validate_range(Some("501"), None, None), Err(ValidationError::SpzAgeOutOfRange));
        assert_eq!(v.validate_range(None, Some("99.95"), None), Err(ValidationError::SpzHeightOutOfRange));
        assert_eq!(v.validate_range(None, None, Some("abc")), Err(ValidationError::SiteIndexOutOfRange));
        assert!(v.validate_range(Some("60"), Some("17.0"), Some("16.3")).is_ok());
    }
}

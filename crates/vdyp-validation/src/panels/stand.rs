//! Stand density panel
//!
//! Range failures block confirmation. Density checks against the
//! species curves only produce advisories.

use crate::engine::{
    basal_area_advisory, is_coastal_zone, validate_quadratic_mean_diameter, validate_trees_per_hectare_against_limits,
};
use crate::error::{Advisory, ValidationError};
use crate::numeric::FieldValue;
use vdyp_tables::limits::{BASAL_AREA, CROWN_CLOSURE, PERCENT_STOCKABLE_AREA, TREES_PER_HECTARE};

/// Stand panel fields as entered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandInput<'a> {
    /// Highest-percent species, selects the coefficient group
    pub species: Option<&'a str>,
    /// BEC zone, selects the coefficient region
    pub bec_zone: Option<&'a str>,
    /// Site height (m)
    pub height: Option<&'a str>,
    /// Percent stockable area
    pub percent_stockable_area: Option<&'a str>,
    /// Basal area (m²/ha)
    pub basal_area: Option<&'a str>,
    /// Trees per hectare
    pub trees_per_hectare: Option<&'a str>,
    /// Crown closure (%)
    pub crown_closure: Option<&'a str>,
    /// Minimum DBH label, e.g. `"7.5 cm+"`
    pub min_dbh_limit: Option<&'a str>,
}

/// Blocking and advisory findings of the stand panel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandValidation {
    /// Failures that prevent confirmation
    pub blocking: Vec<ValidationError>,
    /// Warnings the user may accept
    pub advisories: Vec<Advisory>,
}

impl StandValidation {
    /// Check if any finding blocks confirmation
    #[inline]
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        !self.blocking.is_empty()
    }

    /// Check if there are no findings at all
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.blocking.is_empty() && self.advisories.is_empty()
    }
}

/// Stand panel validator
#[derive(Debug, Clone, Copy)]
pub struct StandValidator;

impl StandValidator {
    /// Create validator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Percent stockable area, basal area, density and crown closure bounds
    pub fn validate_range(
        &self,
        percent_stockable_area: Option<&str>,
        basal_area: Option<&str>,
        trees_per_hectare: Option<&str>,
        crown_closure: Option<&str>,
    ) -> Result<(), ValidationError> {
        let checks = [
            (percent_stockable_area, PERCENT_STOCKABLE_AREA, ValidationError::PercentStockableAreaOutOfRange),
            (basal_area, BASAL_AREA, ValidationError::BasalAreaOutOfRange),
            (trees_per_hectare, TREES_PER_HECTARE, ValidationError::TreesPerHectareOutOfRange),
            (crown_closure, CROWN_CLOSURE, ValidationError::CrownClosureOutOfRange),
        ];
        for (value, limit, err) in checks {
            if !FieldValue::parse(value).within(limit.min, limit.max) {
                return Err(err);
            }
        }
        Ok(())
    }

    /// Density advisories: basal area limit, trees-per-hectare bounds, diameter
    #[must_use]
    pub fn advisories(&self, input: &StandInput<'_>) -> Vec<Advisory> {
        let ba = FieldValue::parse(input.basal_area).number();
        let tph = FieldValue::parse(input.trees_per_hectare).number();
        let height = FieldValue::parse(input.height).number();
        let is_coastal = input.bec_zone.is_some_and(is_coastal_zone);

        let mut found = Vec::new();
        if let Some(species) = input.species.filter(|s| !s.trim().is_empty()) {
            found.extend(basal_area_advisory(species, is_coastal, ba, height));
            found.extend(validate_trees_per_hectare_against_limits(species, is_coastal, ba, tph, height));
        }
        found.extend(validate_quadratic_mean_diameter(ba, tph, input.min_dbh_limit));
        found
    }

    /// Range checks, then advisories when the ranges pass
    #[must_use]
    pub fn validate(&self, input: &StandInput<'_>) -> StandValidation {
        match self.validate_range(
            input.percent_stockable_area,
            input.basal_area,
            input.trees_per_hectare,
            input.crown_closure,
        ) {
            Err(err) => StandValidation {
                blocking: vec![err],
                advisories: Vec::new(),
            },
            Ok(()) => StandValidation {
                blocking: Vec::new(),
                advisories: self.advisories(input),
            },
        }
    }
}

impl Default for StandValidator {
    fn default() -> Self {
        Self::new()
    }
}

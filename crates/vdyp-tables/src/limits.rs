//! Inclusive numeric input limits for every panel field

/// Inclusive `[min, max]` bound for a numeric field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericLimit {
    /// Smallest accepted value
    pub min: f64,
    /// Largest accepted value
    pub max: f64,
}

impl NumericLimit {
    /// Create limit
    #[inline]
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Check if the value lies within the bound
    #[inline]
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Per-species percent
pub const SPECIES_PERCENT: NumericLimit = NumericLimit::new(0.0, 100.0);
/// Required total of all species percents
pub const TOTAL_SPECIES_PERCENT: f64 = 100.0;
/// Decimal places kept on species percents
pub const SPECIES_PERCENT_DECIMALS: usize = 1;

/// Species percent total truncated to one decimal
///
/// Float noise such as `99.99999` still truncates to `100.0`.
#[inline]
#[must_use]
pub fn truncate_species_total(sum: f64) -> f64 {
    ((sum * 10.0) + 1e-9).floor() / 10.0
}

/// Site species age (years)
pub const SPZ_AGE: NumericLimit = NumericLimit::new(0.0, 500.0);
/// Site species height (m)
pub const SPZ_HEIGHT: NumericLimit = NumericLimit::new(0.0, 99.9);
/// BHA 50 site index
pub const BHA50_SITE_INDEX: NumericLimit = NumericLimit::new(0.0, 60.0);

/// Percent stockable area
pub const PERCENT_STOCKABLE_AREA: NumericLimit = NumericLimit::new(0.0, 100.0);
/// Crown closure (%)
pub const CROWN_CLOSURE: NumericLimit = NumericLimit::new(0.0, 100.0);
/// Trees per hectare
pub const TREES_PER_HECTARE: NumericLimit = NumericLimit::new(0.1, 9999.9);
/// Basal area (m²/ha)
pub const BASAL_AREA: NumericLimit = NumericLimit::new(0.1, 250.0);

/// Report starting age
pub const STARTING_AGE: NumericLimit = NumericLimit::new(0.0, 500.0);
/// Report finishing age
pub const FINISHING_AGE: NumericLimit = NumericLimit::new(1.0, 450.0);
/// Report age increment
pub const AGE_INCREMENT: NumericLimit = NumericLimit::new(1.0, 350.0);
/// Report start year
pub const START_YEAR: NumericLimit = NumericLimit::new(1400.0, 2500.0);
/// Report end year
pub const END_YEAR: NumericLimit = NumericLimit::new(1400.0, 2500.0);
/// Report year increment
pub const YEAR_INCREMENT: NumericLimit = NumericLimit::new(1.0, 350.0);
/// Forced specific year
pub const SPECIFIC_YEAR: NumericLimit = NumericLimit::new(1400.0, 2500.0);

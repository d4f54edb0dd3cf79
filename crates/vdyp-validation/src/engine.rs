//! Field and cross-field validation primitives
//!
//! Pure functions over already-parsed values. When a rule cannot be
//! evaluated (unknown species, missing coefficients, non-positive input)
//! the value is treated as valid and the reason is logged.

use crate::error::Advisory;
use crate::numeric::leading_number;
use tracing::{debug, warn};
use vdyp_tables::coefficients::BASAL_AREA_PER_DQ_SQUARED;
use vdyp_tables::{basal_area_coefficients, group_or_self, region_of, trees_per_hectare_coefficients, Region};

/// Inclusive range check
///
/// An absent or NaN value cannot be checked and counts as valid.
#[inline]
#[must_use]
pub fn validate_range(value: Option<f64>, min: f64, max: f64) -> bool {
    match value {
        Some(v) if !v.is_nan() => v >= min && v <= max,
        _ => true,
    }
}

/// Whether a BEC zone uses the coastal coefficient set
///
/// Unknown zones are interior.
#[must_use]
pub fn is_coastal_zone(bec_zone: &str) -> bool {
    match region_of(bec_zone) {
        Some(region) => region == Region::Coastal,
        None => {
            warn!(bec_zone, "unknown bec zone, using interior coefficients");
            false
        }
    }
}

/// Likely maximum basal area (m²/ha) for a species at a height
///
/// `None` when the limit cannot be evaluated.
#[must_use]
pub fn basal_area_limit(species: &str, is_coastal: bool, height: f64) -> Option<f64> {
    let group = group_or_self(species);
    let region = Region::from_coastal(is_coastal);

    let Some(coeffs) = basal_area_coefficients(&group, region) else {
        warn!(species, group = %group, ?region, "no basal area coefficients");
        return None;
    };
    if !coeffs.is_available() {
        debug!(group = %group, ?region, "basal area limit not calibrated");
        return None;
    }
    if !height.is_finite() || height <= 0.0 {
        debug!(height, "height not usable for basal area limit");
        return None;
    }

    let limit = coeffs.limit_at(height);
    limit.is_finite().then_some(limit)
}

/// Check basal area against the species/region limit curve
///
/// Returns `true` (valid) whenever the limit cannot be evaluated.
#[must_use]
pub fn validate_basal_area_against_limit(
    species: &str,
    is_coastal: bool,
    basal_area: Option<f64>,
    height: Option<f64>,
) -> bool {
    let (Some(ba), Some(height)) = (basal_area, height) else {
        return true;
    };
    if !ba.is_finite() {
        debug!(ba, "basal area not numeric");
        return true;
    }
    match basal_area_limit(species, is_coastal, height) {
        Some(limit) => ba <= limit,
        None => true,
    }
}

/// Basal area check producing an advisory
#[must_use]
pub fn basal_area_advisory(
    species: &str,
    is_coastal: bool,
    basal_area: Option<f64>,
    height: Option<f64>,
) -> Option<Advisory> {
    if validate_basal_area_against_limit(species, is_coastal, basal_area, height) {
        return None;
    }
    let limit = basal_area_limit(species, is_coastal, height?)?;
    Some(Advisory::BasalAreaAboveMaximum { limit })
}

/// Likely `(minimum, maximum)` trees per hectare for a stand
#[must_use]
pub fn trees_per_hectare_bounds(species: &str, is_coastal: bool, basal_area: f64, height: f64) -> Option<(f64, f64)> {
    let group = group_or_self(species);
    let region = Region::from_coastal(is_coastal);

    let Some(coeffs) = trees_per_hectare_coefficients(&group, region).filter(|c| c.is_available()) else {
        warn!(species, group = %group, ?region, "no trees per hectare coefficients");
        return None;
    };

    let dq_min = coeffs.p10.diameter_at(height);
    let dq_max = coeffs.p90.diameter_at(height);
    if dq_min <= 0.0 || dq_max <= 0.0 {
        debug!(dq_min, dq_max, height, "diameter curve non-positive");
        return None;
    }

    let tph_min = basal_area / (BASAL_AREA_PER_DQ_SQUARED * dq_max * dq_max);
    let tph_max = basal_area / (BASAL_AREA_PER_DQ_SQUARED * dq_min * dq_min);
    Some((tph_min, tph_max))
}

/// Check trees per hectare against the P10/P90 diameter curves
///
/// Returns `None` when the stand is within bounds or the check cannot
/// be evaluated.
#[must_use]
pub fn validate_trees_per_hectare_against_limits(
    species: &str,
    is_coastal: bool,
    basal_area: Option<f64>,
    trees_per_hectare: Option<f64>,
    height: Option<f64>,
) -> Option<Advisory> {
    let ba = basal_area.filter(|v| v.is_finite() && *v > 0.0)?;
    let tph = trees_per_hectare.filter(|v| v.is_finite() && *v > 0.0)?;
    let height = height.filter(|v| v.is_finite() && *v > 0.0)?;

    let (minimum, maximum) = trees_per_hectare_bounds(species, is_coastal, ba, height)?;
    if tph < minimum {
        Some(Advisory::TreesPerHectareBelowMinimum { minimum })
    } else if tph > maximum {
        Some(Advisory::TreesPerHectareAboveMaximum { maximum })
    } else {
        None
    }
}

/// Quadratic mean diameter (cm) implied by basal area and density
#[must_use]
pub fn quadratic_mean_diameter(basal_area: f64, trees_per_hectare: f64) -> Option<f64> {
    if basal_area <= 0.0 || trees_per_hectare <= 0.0 {
        return None;
    }
    let diameter = (basal_area / trees_per_hectare / BASAL_AREA_PER_DQ_SQUARED).sqrt();
    diameter.is_finite().then_some(diameter)
}

/// Check the implied diameter against a minimum-DBH label such as `"7.5 cm+"`
#[must_use]
pub fn validate_quadratic_mean_diameter(
    basal_area: Option<f64>,
    trees_per_hectare: Option<f64>,
    min_dbh_limit: Option<&str>,
) -> Option<Advisory> {
    let threshold = leading_number(min_dbh_limit?)?;
    let diameter = quadratic_mean_diameter(basal_area?, trees_per_hectare?)?;
    (diameter < threshold).then_some(Advisory::QuadraticMeanDiameterBelowLimit { diameter, threshold })
}

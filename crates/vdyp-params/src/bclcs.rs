//! BC Land Cover Classification System levels for generated polygons

use crate::state::SpeciesEntry;
use crate::numeric::parse_float;
use vdyp_tables::bclcs::{
    LEVEL1_NON_VEGETATED, LEVEL1_THRESHOLD, LEVEL1_VEGETATED, LEVEL2_NON_TREED, LEVEL2_THRESHOLD, LEVEL2_TREED,
    LEVEL3_ALPINE, LEVEL3_ALPINE_ZONE, LEVEL3_UPLAND, LEVEL4_BROADLEAF, LEVEL4_CONIFEROUS, LEVEL4_MAJORITY_PERCENT,
    LEVEL4_MIXED, LEVEL5_DENSE, LEVEL5_DENSE_THRESHOLD, LEVEL5_OPEN, LEVEL5_OPEN_THRESHOLD, LEVEL5_SPARSE,
};
use vdyp_tables::{group_or_self, is_broadleaf, is_coniferous};

/// The five BCLCS codes of a polygon record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BclcsLevels {
    /// Vegetated / non-vegetated
    pub level1: &'static str,
    /// Treed / non-treed
    pub level2: &'static str,
    /// Alpine / upland
    pub level3: &'static str,
    /// Coniferous / broadleaf / mixed
    pub level4: &'static str,
    /// Dense / open / sparse
    pub level5: &'static str,
}

impl BclcsLevels {
    /// Classify a stand
    #[must_use]
    pub fn classify(percent_stockable_area: Option<f64>, bec_zone: Option<&str>, species: &[SpeciesEntry]) -> Self {
        Self {
            level1: level1(percent_stockable_area),
            level2: level2(percent_stockable_area),
            level3: level3(bec_zone),
            level4: level4(species),
            level5: level5(percent_stockable_area),
        }
    }

    /// Codes in column order
    #[must_use]
    pub fn as_array(&self) -> [&'static str; 5] {
        [self.level1, self.level2, self.level3, self.level4, self.level5]
    }
}

/// `V` at or above the stockable-area threshold, `N` below (a missing area counts as the threshold)
#[must_use]
pub fn level1(percent_stockable_area: Option<f64>) -> &'static str {
    if percent_stockable_area.unwrap_or(LEVEL1_THRESHOLD) < LEVEL1_THRESHOLD {
        LEVEL1_NON_VEGETATED
    } else {
        LEVEL1_VEGETATED
    }
}

/// `T` at or above the treed threshold, `N` below
#[must_use]
pub fn level2(percent_stockable_area: Option<f64>) -> &'static str {
    if percent_stockable_area.unwrap_or(LEVEL2_THRESHOLD) < LEVEL2_THRESHOLD {
        LEVEL2_NON_TREED
    } else {
        LEVEL2_TREED
    }
}

/// `A` in the alpine tundra zone, `U` elsewhere
#[must_use]
pub fn level3(bec_zone: Option<&str>) -> &'static str {
    match bec_zone {
        Some(zone) if zone.trim().eq_ignore_ascii_case(LEVEL3_ALPINE_ZONE) => LEVEL3_ALPINE,
        _ => LEVEL3_UPLAND,
    }
}

/// Coniferous or broadleaf when one side holds the majority share, mixed otherwise
#[must_use]
pub fn level4(species: &[SpeciesEntry]) -> &'static str {
    let (mut coniferous, mut broadleaf) = (0.0, 0.0);
    for entry in species {
        let Some(code) = entry.species.as_deref().filter(|c| !c.trim().is_empty()) else {
            continue;
        };
        let percent = parse_float(entry.percent.as_deref()).unwrap_or(0.0);
        let group = group_or_self(code);
        if is_coniferous(&group) {
            coniferous += percent;
        } else if is_broadleaf(&group) {
            broadleaf += percent;
        }
    }

    if coniferous >= LEVEL4_MAJORITY_PERCENT {
        LEVEL4_CONIFEROUS
    } else if broadleaf >= LEVEL4_MAJORITY_PERCENT {
        LEVEL4_BROADLEAF
    } else {
        LEVEL4_MIXED
    }
}

/// Crown density class from the stockable area
#[must_use]
pub fn level5(percent_stockable_area: Option<f64>) -> &'static str {
    match percent_stockable_area {
        Some(psa) if psa >= LEVEL5_DENSE_THRESHOLD => LEVEL5_DENSE,
        Some(psa) if psa >= LEVEL5_OPEN_THRESHOLD => LEVEL5_OPEN,
        _ => LEVEL5_SPARSE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, &str)]) -> Vec<SpeciesEntry> {
        pairs.iter().map(|(c, p)| SpeciesEntry::new(*c, *p)).collect()
    }

    #[test]
    fn thresholds() {
        assert_eq!(level1(Some(4.9)), "N");
        assert_eq!(level1(Some(5.0)), "V");
        assert_eq!(level1(None), "V");
        assert_eq!(level2(Some(9.9)), "N");
        assert_eq!(level2(None), "T");
        assert_eq!(level5(Some(61.0)), "DE");
        assert_eq!(level5(Some(26.0)), "OP");
        assert_eq!(level5(Some(25.9)), "SP");
        assert_eq!(level5(None), "SP");
    }

    #[test]
    fn alpine_zone() {
        assert_eq!(level3(Some("AT")), "A");
        assert_eq!(level3(Some("IDF")), "U");
        assert_eq!(level3(None), "U");
    }

    #[test]
    fn majority_rule() {
        assert_eq!(level4(&entries(&[("FDI", "80"), ("AC", "20")])), "TC");
        assert_eq!(level4(&entries(&[("AC", "75"), ("PL", "25")])), "TB");
        assert_eq!(level4(&entries(&[("PL", "30"), ("AC", "30"), ("H", "30"), ("S", "10")])), "TM");
        assert_eq!(level4(&[]), "TM");
    }

    #[test]
    fn classify_demonstration_stand() {
        let species = entries(&[("PL", "30"), ("AC", "30"), ("H", "30"), ("S", "10")]);
        let levels = BclcsLevels::classify(Some(55.0), Some("IDF"), &species);
        assert_eq!(levels.as_array(), ["V", "T", "U", "TM", "OP"]);
    }
}

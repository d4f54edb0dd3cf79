//! Biogeoclimatic Ecosystem Classification (BEC) zones

use serde::{Deserialize, Serialize};

/// Coefficient region selected by the BEC zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Coastal zones (CDF, CWH, MH)
    Coastal,
    /// Every other zone
    Interior,
}

impl Region {
    /// Region from the coastal flag
    #[inline]
    #[must_use]
    pub fn from_coastal(is_coastal: bool) -> Self {
        if is_coastal {
            Self::Coastal
        } else {
            Self::Interior
        }
    }
}

/// Coastal BEC zones
pub const COASTAL_ZONES: [&str; 3] = ["CDF", "CWH", "MH"];

/// Interior BEC zones
pub const INTERIOR_ZONES: [&str; 11] = [
    "AT", "BG", "BWBS", "ESSF", "ICH", "IDF", "MS", "PP", "SBPS", "SBS", "SWB",
];

/// BEC zone selected by default in the site panel
pub const DEFAULT_BEC_ZONE: &str = "IDF";

/// Region of a BEC zone, `None` for codes outside both tables
#[must_use]
pub fn region_of(bec_zone: &str) -> Option<Region> {
    let code = bec_zone.trim().to_ascii_uppercase();
    if COASTAL_ZONES.contains(&code.as_str()) {
        Some(Region::Coastal)
    } else if INTERIOR_ZONES.contains(&code.as_str()) {
        Some(Region::Interior)
    } else {
        None
    }
}

/// Every known zone, coastal first
#[must_use]
pub fn all_zones() -> Vec<&'static str> {
    COASTAL_ZONES.iter().chain(INTERIOR_ZONES.iter()).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions() {
        assert_eq!(region_of("CWH"), Some(Region::Coastal));
        assert_eq!(region_of("mh"), Some(Region::Coastal));
        assert_eq!(region_of("IDF"), Some(Region::Interior));
        assert_eq!(region_of("XX"), None);
        assert_eq!(all_zones().len(), 14);
    }
}

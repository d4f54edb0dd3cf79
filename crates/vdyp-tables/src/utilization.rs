//! Utilization classes (minimum DBH limits)

use crate::codes::ProjectionType;
use crate::error::TableError;
use crate::species::is_group;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum diameter at breast height applied when tabulating yield
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UtilizationClass {
    /// 4.0 cm and up
    #[serde(rename = "4.0 cm+")]
    Cm4_0,
    /// 7.5 cm and up
    #[serde(rename = "7.5 cm+")]
    Cm7_5,
    /// 12.5 cm and up
    #[serde(rename = "12.5 cm+")]
    Cm12_5,
    /// 17.5 cm and up
    #[serde(rename = "17.5 cm+")]
    Cm17_5,
    /// 22.5 cm and up
    #[serde(rename = "22.5 cm+")]
    Cm22_5,
}

impl UtilizationClass {
    /// Every class, smallest first
    pub const ALL: [Self; 5] = [Self::Cm4_0, Self::Cm7_5, Self::Cm12_5, Self::Cm17_5, Self::Cm22_5];

    /// Display label, e.g. `"7.5 cm+"`
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Cm4_0 => "4.0 cm+",
            Self::Cm7_5 => "7.5 cm+",
            Self::Cm12_5 => "12.5 cm+",
            Self::Cm17_5 => "17.5 cm+",
            Self::Cm22_5 => "22.5 cm+",
        }
    }

    /// Diameter threshold in centimetres
    #[inline]
    #[must_use]
    pub fn threshold_cm(self) -> f64 {
        match self {
            Self::Cm4_0 => 4.0,
            Self::Cm7_5 => 7.5,
            Self::Cm12_5 => 12.5,
            Self::Cm17_5 => 17.5,
            Self::Cm22_5 => 22.5,
        }
    }
}

impl FromStr for UtilizationClass {
    type Err = TableError;

    /// Accepts `"7.5 cm+"`, `"7.5cm+"` or a bare `"7.5"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let numeric = compact
            .trim_end_matches('+')
            .trim_end_matches("cm")
            .parse::<f64>()
            .map_err(|_| TableError::InvalidUtilizationLabel(s.to_string()))?;

        Self::ALL
            .iter()
            .copied()
            .find(|c| (c.threshold_cm() - numeric).abs() < 1e-9)
            .ok_or_else(|| TableError::InvalidUtilizationLabel(s.to_string()))
    }
}

impl fmt::Display for UtilizationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Default utilization class for an SP0 group, `None` for unknown groups
#[must_use]
pub fn default_utilization(group: &str, projection_type: ProjectionType) -> Option<UtilizationClass> {
    if !is_group(group) {
        return None;
    }
    Some(match projection_type {
        ProjectionType::Volume => UtilizationClass::Cm12_5,
        ProjectionType::CfsBiomass => UtilizationClass::Cm7_5,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_label_variants() {
        assert_eq!("7.5 cm+".parse::<UtilizationClass>().unwrap(), UtilizationClass::Cm7_5);
        assert_eq!("7.5cm+".parse::<UtilizationClass>().unwrap(), UtilizationClass::Cm7_5);
        assert_eq!("22.5".parse::<UtilizationClass>().unwrap(), UtilizationClass::Cm22_5);
        assert!("9.0 cm+".parse::<UtilizationClass>().is_err());
        assert!("abc".parse::<UtilizationClass>().is_err());
    }

    #[test]
    fn defaults_follow_projection_type() {
        assert_eq!(default_utilization("PL", ProjectionType::Volume), Some(UtilizationClass::Cm12_5));
        assert_eq!(default_utilization("PL", ProjectionType::CfsBiomass), Some(UtilizationClass::Cm7_5));
        assert_eq!(default_utilization("XX", ProjectionType::Volume), None);
    }
}

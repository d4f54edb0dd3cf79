//! Domain vocabulary shared by every panel
//!
//! Each enum serializes to the exact label exchanged with the
//! projection service and shown in the input panels.

use crate::error::TableError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire and display label
            #[inline]
            #[must_use]
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = TableError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| TableError::unknown($kind, trimmed))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

coded_enum! {
    /// How species percentages (and so stand density) were derived
    DerivedBy, "derived-by" {
        /// Volume-based inventory (FIP)
        Volume => "Volume",
        /// Basal-area based inventory (VRI)
        BasalArea => "Basal Area",
    }
}

impl DerivedBy {
    /// Inventory standard code written to the polygon record
    #[inline]
    #[must_use]
    pub fn inventory_code(self) -> &'static str {
        match self {
            Self::Volume => crate::csv_layout::INVENTORY_CODE_FIP,
            Self::BasalArea => crate::csv_layout::INVENTORY_CODE_VRI,
        }
    }

    /// Reverse lookup from an inventory standard code
    #[must_use]
    pub fn from_inventory_code(code: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.inventory_code() == code.trim())
    }
}

coded_enum! {
    /// Whether site-species values are entered by the user or computed
    SiteSpeciesValues, "site-species-values" {
        /// User supplies the BHA 50 site index
        Supplied => "Supplied",
        /// Site index computed from age and height
        Computed => "Computed",
    }
}

coded_enum! {
    /// Age measurement basis
    AgeType, "age-type" {
        /// Total age
        Total => "Total",
        /// Breast-height age
        Breast => "Breast",
    }
}

coded_enum! {
    /// Discriminator choosing the reporting range
    AgeYearRange, "age-year-range" {
        /// Start/finish age with increment
        Age => "age",
        /// Start/end calendar year with increment
        Year => "year",
    }
}

coded_enum! {
    /// What the projection reports
    ProjectionType, "projection-type" {
        /// MoF volumes
        Volume => "Volume",
        /// CFS biomass
        CfsBiomass => "CFS Biomass",
    }
}

coded_enum! {
    /// How age and year ranges combine when both are present
    CombineAgeYearRange, "combine-age-year-range" {
        /// Union of both ranges
        Union => "union",
        /// Intersection of both ranges
        Intersect => "intersect",
        /// Difference of both ranges
        Difference => "difference",
    }
}

coded_enum! {
    /// Amount of metadata written to the yield table
    MetadataToOutput, "metadata-to-output" {
        /// All metadata
        All => "ALL",
        /// Main metadata
        Main => "MAIN",
        /// Version metadata only
        Version => "VERSION",
        /// Minimal identification
        MinIdent => "MIN_IDENT",
        /// No metadata
        None => "NONE",
    }
}

coded_enum! {
    /// Projection output format
    OutputFormat, "output-format" {
        /// Fixed-width yield table
        YieldTable => "YieldTable",
        /// CSV yield table
        CsvYieldTable => "CSVYieldTable",
        /// DCSV
        Dcsv => "DCSV",
        /// Text report
        TextReport => "TextReport",
    }
}

coded_enum! {
    /// Input files for the file-upload workflow
    FileKind, "file-kind" {
        /// Polygon file
        Polygon => "Polygon",
        /// Layer file
        Layer => "Layer",
    }
}

impl FileKind {
    /// File name of the generated record set
    #[inline]
    #[must_use]
    pub fn generated_file_name(self) -> &'static str {
        match self {
            Self::Polygon => crate::csv_layout::INPUT_POLY_CSV,
            Self::Layer => crate::csv_layout::INPUT_LAYER_CSV,
        }
    }
}

impl Default for AgeYearRange {
    fn default() -> Self {
        Self::Age
    }
}

impl Default for CombineAgeYearRange {
    fn default() -> Self {
        Self::Intersect
    }
}

impl Default for MetadataToOutput {
    fn default() -> Self {
        Self::Version
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::CsvYieldTable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_back() {
        for d in DerivedBy::ALL {
            assert_eq!(d.label().parse::<DerivedBy>().unwrap(), *d);
        }
        assert_eq!("cfs biomass".parse::<ProjectionType>().unwrap(), ProjectionType::CfsBiomass);
    }

    #[test]
    fn unknown_label_rejected() {
        assert!("Weight".parse::<DerivedBy>().is_err());
    }

    #[test]
    fn inventory_codes() {
        assert_eq!(DerivedBy::Volume.inventory_code(), "F");
        assert_eq!(DerivedBy::BasalArea.inventory_code(), "V");
        assert_eq!(DerivedBy::from_inventory_code("V"), Some(DerivedBy::BasalArea));
        assert_eq!(DerivedBy::from_inventory_code("X"), None);
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&MetadataToOutput::MinIdent).unwrap();
        assert_eq!(json, "\"MIN_IDENT\"");
        let parsed: AgeYearRange = serde_json::from_str("\"year\"").unwrap();
        assert_eq!(parsed, AgeYearRange::Year);
    }
}

//! VDYP Coefficient Tables
//!
//! Static lookup data for projection input.
//!
//! # Overview
//!
//! - **Species**: SP64 species code to SP0 group, coniferous/broadleaf sets
//! - **Zones**: BEC zone to coastal/interior [`Region`]
//! - **Coefficients**: basal-area and trees-per-hectare limit curves
//! - **Utilization**: minimum-DBH classes and per-group defaults
//! - **Limits**: inclusive numeric bounds for every input field
//! - **CSV layout**: polygon/layer column order and fixed record values
//!
//! # Example
//!
//! ```rust
//! use vdyp_tables::{basal_area_coefficients, group_for, region_of, Region};
//!
//! let group = group_for("HW").unwrap();
//! assert_eq!(group, "H");
//! assert_eq!(region_of("CWH"), Some(Region::Coastal));
//!
//! let coeffs = basal_area_coefficients(group, Region::Coastal).unwrap();
//! assert!(coeffs.limit_at(8.0) > 5.0);
//! ```

pub mod bclcs;
pub mod codes;
pub mod coefficients;
pub mod csv_layout;
pub mod error;
pub mod limits;
pub mod species;
pub mod utilization;
pub mod zones;

// Re-exports
pub use codes::{
    AgeType, AgeYearRange, CombineAgeYearRange, DerivedBy, FileKind, MetadataToOutput, OutputFormat,
    ProjectionType, SiteSpeciesValues,
};
pub use coefficients::{
    basal_area_coefficients, trees_per_hectare_coefficients, BasalAreaCoefficients, DiameterCurve,
    TreesPerHectareCoefficients, UNAVAILABLE,
};
pub use error::TableError;
pub use limits::NumericLimit;
pub use species::{group_for, group_or_self, is_broadleaf, is_coniferous, SPECIES_GROUPS, SPECIES_SLOTS};
pub use utilization::{default_utilization, UtilizationClass};
pub use zones::{region_of, Region};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for table lookups
    pub use crate::{
        basal_area_coefficients, group_for, region_of, trees_per_hectare_coefficients, DerivedBy,
        NumericLimit, ProjectionType, Region, SiteSpeciesValues, UtilizationClass,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

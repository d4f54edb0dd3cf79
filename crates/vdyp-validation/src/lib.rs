//! VDYP Input Validation
//!
//! Field, cross-field and panel-level checks for projection input.
//!
//! # Overview
//!
//! - **Engine**: range checks and the stand-density models (basal-area
//!   limit, trees-per-hectare bounds, quadratic mean diameter)
//! - **Panels**: one validator per input panel, returning the titled
//!   message the user sees
//! - **Findings**: blocking [`ValidationError`]s and non-blocking
//!   [`Advisory`] warnings
//!
//! Checks that cannot be evaluated (unknown species, uncalibrated
//! coefficients, blank input) pass and log the reason.
//!
//! # Example
//!
//! ```rust
//! use vdyp_validation::{validate_basal_area_against_limit, validate_quadratic_mean_diameter};
//!
//! assert!(!validate_basal_area_against_limit("H", true, Some(50.0), Some(8.0)));
//!
//! let advisory = validate_quadratic_mean_diameter(Some(4.0), Some(1000.0), Some("7.5 cm+"));
//! assert!(advisory.is_some());
//! ```

pub mod engine;
pub mod error;
pub mod numeric;
pub mod panels;

// Re-exports
pub use engine::{
    basal_area_advisory, basal_area_limit, is_coastal_zone, quadratic_mean_diameter, trees_per_hectare_bounds,
    validate_basal_area_against_limit, validate_quadratic_mean_diameter, validate_range,
    validate_trees_per_hectare_against_limits,
};
pub use error::{Advisory, DialogTitle, Finding, ValidationError};
pub use numeric::{leading_number, parse_number, FieldValue};
pub use panels::{
    FileUploadValidator, HeaderReport, ReportInput, ReportValidator, SiteInput, SiteValidator, SpeciesSlot,
    SpeciesValidator, StandInput, StandValidation, StandValidator, ValidationResult,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for validation
    pub use crate::{
        Advisory, DialogTitle, FieldValue, FileUploadValidator, ReportValidator, SiteValidator, SpeciesValidator,
        StandValidator, ValidationError, ValidationResult,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

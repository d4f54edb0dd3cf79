//! Per-panel validators
//!
//! Each panel has a unit-struct validator bundling the checks run before
//! the panel may be confirmed. Validators stop at the first blocking
//! failure; advisory findings are collected separately where they apply.

pub mod files;
pub mod report;
pub mod site;
pub mod species;
pub mod stand;

use crate::error::ValidationError;
use serde::Serialize;

pub use files::{FileUploadValidator, HeaderReport};
pub use report::{ReportInput, ReportValidator};
pub use site::{SiteInput, SiteValidator};
pub use species::{SpeciesSlot, SpeciesValidator};
pub use stand::{StandInput, StandValidation, StandValidator};

/// Flat outcome of a panel check
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Whether the check passed
    pub is_valid: bool,
    /// Field identifier of the failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<&'static str>,
    /// User-facing message of the failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResult {
    /// Passing result
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_type: None,
            message: None,
        }
    }
}

impl From<Result<(), ValidationError>> for ValidationResult {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self::valid(),
            Err(err) => Self {
                is_valid: false,
                error_type: Some(err.error_type()),
                message: Some(err.to_string()),
            },
        }
    }
}

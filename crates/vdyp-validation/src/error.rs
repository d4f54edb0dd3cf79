//! Validation findings
//!
//! Two kinds of finding come out of this crate:
//! - [`ValidationError`]: hard failures that block a panel confirmation
//! - [`Advisory`]: likely-out-of-range warnings the user may override
//!
//! Both carry the dialog title and message shown to the user. Neither is
//! raised as a panic; callers receive them as values.

use crate::panels::files::HeaderReport;
use serde::Serialize;
use vdyp_tables::FileKind;

/// Dialog title shown with a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DialogTitle {
    /// Out-of-range or malformed input
    #[serde(rename = "Invalid Input!")]
    InvalidInput,
    /// Required input not provided
    #[serde(rename = "Missing Information")]
    MissingInformation,
    /// Inputs do not form a complete record
    #[serde(rename = "Data Incomplete!")]
    DataIncomplete,
    /// Same value entered twice
    #[serde(rename = "Data Duplicated!")]
    DataDuplicated,
    /// Proceed/cancel confirmation
    #[serde(rename = "Confirm")]
    Confirm,
    /// Required upload missing
    #[serde(rename = "Missing File")]
    MissingFile,
    /// Upload in the wrong format
    #[serde(rename = "Invalid File!")]
    InvalidFile,
    /// Polygon header does not match the expected layout
    #[serde(rename = "Polygon File Header Mismatch!")]
    PolygonFileHeaderMismatch,
    /// Layer header does not match the expected layout
    #[serde(rename = "Layer File Header Mismatch!")]
    LayerFileHeaderMismatch,
    /// Polygon header repeats a column
    #[serde(rename = "Polygon File Duplicate Columns!")]
    PolygonFileDuplicateColumns,
    /// Layer header repeats a column
    #[serde(rename = "Layer File Duplicate Columns!")]
    LayerFileDuplicateColumns,
}

impl DialogTitle {
    /// Title text
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::InvalidInput => "Invalid Input!",
            Self::MissingInformation => "Missing Information",
            Self::DataIncomplete => "Data Incomplete!",
            Self::DataDuplicated => "Data Duplicated!",
            Self::Confirm => "Confirm",
            Self::MissingFile => "Missing File",
            Self::InvalidFile => "Invalid File!",
            Self::PolygonFileHeaderMismatch => "Polygon File Header Mismatch!",
            Self::LayerFileHeaderMismatch => "Layer File Header Mismatch!",
            Self::PolygonFileDuplicateColumns => "Polygon File Duplicate Columns!",
            Self::LayerFileDuplicateColumns => "Layer File Duplicate Columns!",
        }
    }
}

/// Hard validation failures
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    // Species panel
    /// Species percentages do not add up to 100
    #[error("Species percentage must add up to a total of 100.0% in order to run a valid model")]
    TotalPercentNot100 {
        /// Total as displayed (one decimal)
        total: String,
    },

    /// The same species code appears in two slots
    #[error("Species '{code}' already specified")]
    DuplicateSpecies {
        /// Repeated code
        code: String,
    },

    /// A species percent outside 0..=100
    #[error("Please enter a value between {min} and {max}")]
    SpeciesPercentOutOfRange {
        /// Zero-based slot
        slot: usize,
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// No derived-by option chosen
    #[error(
        "Input field - 'Species % derived by' - is missing essential information which must be filled in order to confirm and continue"
    )]
    MissingDerivedBy,

    // Site panel
    /// No site-index option chosen
    #[error("Please select a Site Index option ('Supplied' or 'Computed')")]
    SiteIndexOptionRequired,

    /// No BEC zone chosen
    #[error("Please select a BEC Zone")]
    BecZoneRequired,

    /// Computed site values need age, height and site index
    #[error("The species '{species}' must have Years/Height in Meters values supplied")]
    SiteValuesRequired {
        /// Site species
        species: String,
    },

    /// Supplied site values need a site index
    #[error("The species '{species}' must have an BHA 50 Site Index value supplied")]
    SiteIndexValueRequired {
        /// Site species
        species: String,
    },

    /// Age outside its range
    #[error("'Years' must range from 0 and 500")]
    SpzAgeOutOfRange,

    /// Height outside its range
    #[error("'Height in Meters' must range from 0.00 and 99.90")]
    SpzHeightOutOfRange,

    /// Site index outside its range
    #[error("'BHA 50 Site Index' must range from 0.00 and 60.00")]
    SiteIndexOutOfRange,

    // Stand panel
    /// Percent stockable area outside its range
    #[error("'Percent Stockable Area' must range from 0 and 100")]
    PercentStockableAreaOutOfRange,

    /// Basal area outside its range
    #[error("'Basal Area' must range from 0.1000 and 250.0000")]
    BasalAreaOutOfRange,

    /// Trees per hectare outside its range
    #[error("'Trees per Hectare' must range from 0.10 and 9999.90")]
    TreesPerHectareOutOfRange,

    /// Crown closure outside its range
    #[error("'Crown Closure' must range from 0 and 100")]
    CrownClosureOutOfRange,

    // Report panel
    /// Finish age earlier than start age
    #[error("'Finish Age' must be at least as great as the 'Start Age'")]
    FinishAgeBeforeStartAge,

    /// End year earlier than start year
    #[error("'End Year' must be at least as great as the 'Start Year'")]
    EndYearBeforeStartYear,

    /// Starting age outside its range
    #[error("'Starting Age' must range from {min} and {max}")]
    StartingAgeOutOfRange {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// Finishing age outside its range
    #[error("'Finishing Age' must range from {min} and {max}")]
    FinishingAgeOutOfRange {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// Age increment outside its range
    #[error("'Increment' must range from {min} and {max}")]
    AgeIncrementOutOfRange {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// Start year outside its range
    #[error("'Start Year' must range from {min} and {max}")]
    StartYearOutOfRange {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// End year outside its range
    #[error("'End Year' must range from {min} and {max}")]
    EndYearOutOfRange {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// Year increment outside its range
    #[error("'Increment' must range from {min} and {max}")]
    YearIncrementOutOfRange {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// Age range fields incomplete
    #[error("All required fields (Starting Age, Finishing Age, Increment) must be filled.")]
    AgeFieldsRequired,

    /// Year range fields incomplete
    #[error("All required fields (Start Year, End Year, Increment) must be filled.")]
    YearFieldsRequired,

    /// Report title blank
    #[error("Please enter a Report Title.")]
    ReportTitleRequired,

    /// Projection type blank
    #[error("Please select a Projection Type.")]
    ProjectionTypeRequired,

    // File upload
    /// Required upload missing
    #[error("{file} file is missing. Please upload the required file.")]
    FileMissing {
        /// Which file
        file: FileKind,
    },

    /// Upload without a `.csv` name
    #[error("The uploaded {file} file is not in CSV format. Please upload a valid CSV file.")]
    FileNotCsv {
        /// Which file
        file: FileKind,
    },

    /// Header columns missing, extra or out of order
    #[error("The {file} file header does not match the expected columns: {report}")]
    HeaderMismatch {
        /// Which file
        file: FileKind,
        /// Column-level details
        report: HeaderReport,
    },

    /// Header repeats column names
    #[error(
        "The {file} file contains duplicate column names. Each column must have a unique name. Please fix the file and try again."
    )]
    DuplicateColumns {
        /// Which file
        file: FileKind,
        /// Repeated names
        columns: Vec<String>,
    },
}

impl ValidationError {
    /// Field identifier the UI uses to focus the offending input
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::TotalPercentNot100 { .. } => "totalPercent",
            Self::DuplicateSpecies { .. } => "duplicateSpecies",
            Self::SpeciesPercentOutOfRange { .. } => "speciesPercent",
            Self::MissingDerivedBy => "derivedBy",
            Self::SiteIndexOptionRequired => "siteIndex",
            Self::BecZoneRequired => "becZone",
            Self::SiteValuesRequired { .. } => "siteSpeciesValues",
            Self::SiteIndexValueRequired { .. } | Self::SiteIndexOutOfRange => "bha50SiteIndex",
            Self::SpzAgeOutOfRange => "spzAge",
            Self::SpzHeightOutOfRange => "spzHeight",
            Self::PercentStockableAreaOutOfRange => "percentStockableArea",
            Self::BasalAreaOutOfRange => "basalArea",
            Self::TreesPerHectareOutOfRange => "treesPerHectare",
            Self::CrownClosureOutOfRange => "crownClosure",
            Self::FinishAgeBeforeStartAge | Self::FinishingAgeOutOfRange { .. } => "finishingAge",
            Self::EndYearBeforeStartYear | Self::EndYearOutOfRange { .. } => "endYear",
            Self::StartingAgeOutOfRange { .. } => "startingAge",
            Self::AgeIncrementOutOfRange { .. } => "ageIncrement",
            Self::StartYearOutOfRange { .. } => "startYear",
            Self::YearIncrementOutOfRange { .. } => "yearIncrement",
            Self::AgeFieldsRequired | Self::YearFieldsRequired => "requiredFields",
            Self::ReportTitleRequired => "reportTitle",
            Self::ProjectionTypeRequired => "projectionType",
            Self::FileMissing { file: FileKind::Polygon } => "polygonFileMissing",
            Self::FileMissing { file: FileKind::Layer } => "layerFileMissing",
            Self::FileNotCsv { file: FileKind::Polygon } => "polygonFileNotCSVFormat",
            Self::FileNotCsv { file: FileKind::Layer } => "layerFileNotCSVFormat",
            Self::HeaderMismatch { file: FileKind::Polygon, .. } => "polygonFileHeaderMismatch",
            Self::HeaderMismatch { file: FileKind::Layer, .. } => "layerFileHeaderMismatch",
            Self::DuplicateColumns { file: FileKind::Polygon, .. } => "polygonFileDuplicateColumns",
            Self::DuplicateColumns { file: FileKind::Layer, .. } => "layerFileDuplicateColumns",
        }
    }

    /// Dialog title for this failure
    #[must_use]
    pub fn title(&self) -> DialogTitle {
        match self {
            Self::TotalPercentNot100 { .. } => DialogTitle::DataIncomplete,
            Self::DuplicateSpecies { .. } => DialogTitle::DataDuplicated,
            Self::MissingDerivedBy
            | Self::SiteIndexOptionRequired
            | Self::BecZoneRequired
            | Self::SiteValuesRequired { .. }
            | Self::SiteIndexValueRequired { .. }
            | Self::AgeFieldsRequired
            | Self::YearFieldsRequired
            | Self::ReportTitleRequired
            | Self::ProjectionTypeRequired => DialogTitle::MissingInformation,
            Self::FileMissing { .. } => DialogTitle::MissingFile,
            Self::FileNotCsv { .. } => DialogTitle::InvalidFile,
            Self::HeaderMismatch { file: FileKind::Polygon, .. } => DialogTitle::PolygonFileHeaderMismatch,
            Self::HeaderMismatch { file: FileKind::Layer, .. } => DialogTitle::LayerFileHeaderMismatch,
            Self::DuplicateColumns { file: FileKind::Polygon, .. } => DialogTitle::PolygonFileDuplicateColumns,
            Self::DuplicateColumns { file: FileKind::Layer, .. } => DialogTitle::LayerFileDuplicateColumns,
            _ => DialogTitle::InvalidInput,
        }
    }
}

/// Non-blocking density warnings
///
/// The `Display` text asks the user whether to proceed.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Advisory {
    /// Basal area above the species/region curve
    #[error("Basal Area is above a likely maximum for the entered height. Do you wish to proceed?")]
    BasalAreaAboveMaximum {
        /// Curve value at the entered height
        limit: f64,
    },

    /// Stand density below the P90 diameter bound
    #[error("Trees/ha is less than a likely minimum for the entered height. Do you wish to proceed?")]
    TreesPerHectareBelowMinimum {
        /// Lowest likely trees/ha
        minimum: f64,
    },

    /// Stand density above the P10 diameter bound
    #[error("Trees/ha is above a likely maximum for the entered height. Do you wish to proceed?")]
    TreesPerHectareAboveMaximum {
        /// Highest likely trees/ha
        maximum: f64,
    },

    /// Implied mean diameter below the utilization threshold
    #[error(
        "Quadratic Mean Diameter of {diameter:.1} cm is less than the required diameter of {threshold:.1} cm for the selected Minimum DBH Limit. Do you wish to proceed?"
    )]
    QuadraticMeanDiameterBelowLimit {
        /// Computed diameter (cm)
        diameter: f64,
        /// Threshold parsed from the minimum-DBH label (cm)
        threshold: f64,
    },
}

impl Advisory {
    /// Dialog title for advisories
    #[inline]
    #[must_use]
    pub fn title(&self) -> DialogTitle {
        DialogTitle::Confirm
    }

    /// Field identifier the advisory concerns
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::BasalAreaAboveMaximum { .. } => "basalArea",
            Self::TreesPerHectareBelowMinimum { .. } | Self::TreesPerHectareAboveMaximum { .. } => "treesPerHectare",
            Self::QuadraticMeanDiameterBelowLimit { .. } => "minDBHLimit",
        }
    }
}

/// Either kind of finding, for callers that report both uniformly
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Whether the finding blocks confirmation
    pub blocking: bool,
    /// Dialog title
    pub title: DialogTitle,
    /// Field identifier
    pub error_type: &'static str,
    /// User-facing message
    pub message: String,
}

impl From<&ValidationError> for Finding {
    fn from(err: &ValidationError) -> Self {
        Self {
            blocking: true,
            title: err.title(),
            error_type: err.error_type(),
            message: err.to_string(),
        }
    }
}

impl From<&Advisory> for Finding {
    fn from(advisory: &Advisory) -> Self {
        Self {
            blocking: false,
            title: advisory.title(),
            error_type: advisory.error_type(),
            message: advisory.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_messages_render_bounds() {
        let err = ValidationError::StartingAgeOutOfRange { min: 0.0, max: 500.0 };
        assert_eq!(err.to_string(), "'Starting Age' must range from 0 and 500");
        assert_eq!(err.error_type(), "startingAge");
        assert_eq!(err.title(), DialogTitle::InvalidInput);
    }

    #[test]
    fn file_messages_name_the_file() {
        let err = ValidationError::FileMissing { file: FileKind::Layer };
        assert_eq!(err.to_string(), "Layer file is missing. Please upload the required file.");
        assert_eq!(err.error_type(), "layerFileMissing");
        assert_eq!(err.title(), DialogTitle::MissingFile);
    }

    #[test]
    fn advisories_use_confirm_title() {
        let adv = Advisory::TreesPerHectareBelowMinimum { minimum: 350.0 };
        assert!(adv.to_string().contains("Trees/ha is less than a likely minimum"));
        assert_eq!(adv.title(), DialogTitle::Confirm);

        let finding = Finding::from(&adv);
        assert!(!finding.blocking);
    }

    #[test]
    fn qmd_message_formats_diameter() {
        let adv = Advisory::QuadraticMeanDiameterBelowLimit {
            diameter: 2.2568,
            threshold: 7.5,
        };
        let text = adv.to_string();
        assert!(text.contains("Quadratic Mean Diameter of 2.3 cm"));
        assert!(text.contains("less than the required diameter of 7.5 cm"));
    }
}

//! VDYP Projection Parameters
//!
//! Turns accumulated panel input into the projection payload.
//!
//! # Overview
//!
//! - **State**: manual-entry and file-upload input, kept as entered
//! - **Species groups**: SP64 slots merged by SP0 group, highest first
//! - **Options**: base option lists plus ordered `{condition, option}` tables
//! - **Parameters**: age or year range, options, utilization overrides
//! - **CSV**: polygon/layer records with BCLCS levels and density defaults,
//!   and the reverse parser
//! - **Identifiers**: random feature id, polygon number and layer id
//!
//! # Example
//!
//! ```rust
//! use vdyp_params::{build_projection_parameters, ModelParameterState, ProjectionConfig};
//!
//! let state = ModelParameterState::with_default_values();
//! let params = build_projection_parameters(&state, &ProjectionConfig::default());
//!
//! assert_eq!(params.age_start, Some(10));
//! assert!(params.year_start.is_none());
//! assert_eq!(params.utils.len(), 4);
//! ```

pub mod bclcs;
pub mod config;
pub mod csv;
pub mod error;
pub mod identifiers;
pub mod numeric;
pub mod options;
pub mod parameters;
pub mod species_group;
pub mod state;

// Re-exports
pub use bclcs::BclcsLevels;
pub use config::ProjectionConfig;
pub use csv::{build_csv_records, convert_to_csv, parse_csv_file_content, CsvRecords, ParsedCsvFileContent};
pub use error::ParamsError;
pub use identifiers::{generate_random_number, generate_synthetic_identifiers, SyntheticIdentifiers};
pub use options::{build_debug_options, DebugOption, ExecutionOption, OptionMapping, OptionSets};
pub use parameters::{
    build_execution_options, build_projection_parameters, ProjectionInputs, ProjectionParameters,
    UtilizationParameter,
};
pub use species_group::{recompute_species_groups, total_species_percent, SpeciesGroup};
pub use state::{FileUploadSpeciesGroup, FileUploadState, ModelParameterState, ReportInfo, SpeciesEntry};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building payloads
    pub use crate::{
        build_csv_records, build_execution_options, build_projection_parameters, ExecutionOption,
        FileUploadState, ModelParameterState, ParamsError, ProjectionConfig, ProjectionInputs,
        ProjectionParameters, SpeciesEntry,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

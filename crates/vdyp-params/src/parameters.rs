//! Projection parameter payload
//!
//! Both input modes feed the same builder through [`ProjectionInputs`]:
//! each mode supplies its report fields, base option lists, option table
//! and utilization overrides.

use crate::config::ProjectionConfig;
use crate::numeric::parse_int;
use crate::options::{
    build_debug_options, DebugOption, ExecutionOption, OptionMapping, OptionSets, FILE_UPLOAD_BASE_EXCLUDED,
    FILE_UPLOAD_BASE_SELECTED, MANUAL_BASE_EXCLUDED, MANUAL_BASE_SELECTED,
};
use crate::state::{defaults, FileUploadState, ModelParameterState, ReportInfo};
use serde::{Deserialize, Serialize};
use vdyp_tables::{CombineAgeYearRange, MetadataToOutput, OutputFormat, ProjectionType, UtilizationClass};

/// Utilization override for one species group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationParameter {
    /// SP0 group code
    pub species_name: String,
    /// Minimum DBH class
    pub utilization_class: UtilizationClass,
}

/// Payload sent to the projection service
///
/// Exactly one of the age range or the year range is populated.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectionParameters {
    pub age_start: Option<i64>,
    pub age_end: Option<i64>,
    pub age_increment: Option<i64>,
    pub year_start: Option<i64>,
    pub year_end: Option<i64>,
    pub force_year: Option<i64>,
    pub output_format: OutputFormat,
    pub selected_execution_options: Vec<ExecutionOption>,
    pub excluded_execution_options: Vec<ExecutionOption>,
    pub selected_debug_options: Vec<DebugOption>,
    pub excluded_debug_options: Vec<DebugOption>,
    pub report_title: Option<String>,
    pub combine_age_year_range: Option<CombineAgeYearRange>,
    pub metadata_to_output: MetadataToOutput,
    pub utils: Vec<UtilizationParameter>,
}

impl ProjectionParameters {
    /// Check if an execution option is selected
    #[must_use]
    pub fn is_selected(&self, option: ExecutionOption) -> bool {
        self.selected_execution_options.contains(&option)
    }

    /// Check if any age range bound is set
    #[must_use]
    pub fn has_age_range(&self) -> bool {
        self.age_start.is_some() || self.age_end.is_some()
    }

    /// Check if any year range bound is set
    #[must_use]
    pub fn has_year_range(&self) -> bool {
        self.year_start.is_some() || self.year_end.is_some()
    }

    /// Serialize to JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, crate::ParamsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from JSON, absent fields taking their defaults
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON or unknown enum labels.
    pub fn from_json(json: &str) -> Result<Self, crate::ParamsError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Source of everything the parameter builder needs
pub trait ProjectionInputs {
    /// Report panel fields
    fn report(&self) -> &ReportInfo;

    /// Options selected regardless of input
    fn base_selected(&self) -> &'static [ExecutionOption];

    /// Options excluded regardless of input
    fn base_excluded(&self) -> &'static [ExecutionOption];

    /// Ordered `{condition, option}` table
    fn option_mappings(&self) -> Vec<OptionMapping>;

    /// Per-group utilization overrides
    fn utilization(&self) -> Vec<UtilizationParameter>;

    /// Report title written to the payload
    fn report_title(&self) -> Option<String> {
        self.report().report_title.clone()
    }
}

fn projection_type_mappings(report: &ReportInfo) -> [OptionMapping; 4] {
    [
        OptionMapping::new(
            report.projection_type == Some(ProjectionType::Volume),
            ExecutionOption::DoIncludeProjectedMOFVolumes,
        ),
        OptionMapping::new(
            report.projection_type == Some(ProjectionType::CfsBiomass),
            ExecutionOption::DoIncludeProjectedCFSBiomass,
        ),
        OptionMapping::new(report.is_forward_grow_enabled, ExecutionOption::ForwardGrowEnabled),
        OptionMapping::new(report.is_back_grow_enabled, ExecutionOption::BackGrowEnabled),
    ]
}

impl ProjectionInputs for ModelParameterState {
    fn report(&self) -> &ReportInfo {
        &self.report
    }

    fn base_selected(&self) -> &'static [ExecutionOption] {
        MANUAL_BASE_SELECTED
    }

    fn base_excluded(&self) -> &'static [ExecutionOption] {
        MANUAL_BASE_EXCLUDED
    }

    fn option_mappings(&self) -> Vec<OptionMapping> {
        let r = &self.report;
        let mut mappings = projection_type_mappings(r).to_vec();
        mappings.extend([
            OptionMapping::new(r.is_compute_mai_enabled, ExecutionOption::ReportIncludeVolumeMAI),
            OptionMapping::new(r.is_culmination_values_enabled, ExecutionOption::ReportIncludeCulminationValues),
            OptionMapping::new(r.is_by_species_enabled, ExecutionOption::DoIncludeSpeciesProjection),
            OptionMapping::new(
                r.incl_secondary_dominant_height,
                ExecutionOption::DoIncludeSecondarySpeciesDominantHeightInYieldTable,
            ),
        ]);
        mappings
    }

    fn utilization(&self) -> Vec<UtilizationParameter> {
        self.species_groups
            .iter()
            .filter_map(|g| {
                g.minimum_dbh_limit.map(|utilization_class| UtilizationParameter {
                    species_name: g.group.clone(),
                    utilization_class,
                })
            })
            .collect()
    }

    fn report_title(&self) -> Option<String> {
        let title = self.report.report_title.as_deref().filter(|t| !t.trim().is_empty());
        Some(title.unwrap_or(defaults::REPORT_TITLE).to_string())
    }
}

impl ProjectionInputs for FileUploadState {
    fn report(&self) -> &ReportInfo {
        &self.report
    }

    fn base_selected(&self) -> &'static [ExecutionOption] {
        FILE_UPLOAD_BASE_SELECTED
    }

    fn base_excluded(&self) -> &'static [ExecutionOption] {
        FILE_UPLOAD_BASE_EXCLUDED
    }

    fn option_mappings(&self) -> Vec<OptionMapping> {
        let r = &self.report;
        let mut mappings = projection_type_mappings(r).to_vec();
        mappings.extend([
            OptionMapping::new(r.is_by_layer_enabled, ExecutionOption::DoSummarizeProjectionByLayer),
            OptionMapping::new(!r.is_by_layer_enabled, ExecutionOption::DoSummarizeProjectionByPolygon),
            OptionMapping::new(r.is_by_species_enabled, ExecutionOption::DoIncludeSpeciesProjection),
            OptionMapping::new(r.is_projection_mode_enabled, ExecutionOption::DoIncludeProjectionModeInYieldTable),
            OptionMapping::new(r.is_polygon_id_enabled, ExecutionOption::DoIncludePolygonRecordIdInYieldTable),
            OptionMapping::new(
                r.is_current_year_enabled,
                ExecutionOption::DoForceCurrentYearInclusionInYieldTables,
            ),
            OptionMapping::new(
                r.is_reference_year_enabled,
                ExecutionOption::DoForceReferenceYearInclusionInYieldTables,
            ),
            OptionMapping::new(
                r.incl_secondary_dominant_height,
                ExecutionOption::DoIncludeSecondarySpeciesDominantHeightInYieldTable,
            ),
        ]);
        mappings
    }

    fn utilization(&self) -> Vec<UtilizationParameter> {
        self.species_groups
            .iter()
            .map(|g| UtilizationParameter {
                species_name: g.group.clone(),
                utilization_class: g.minimum_dbh_limit,
            })
            .collect()
    }
}

/// Selected and excluded execution options for the current input
#[must_use]
pub fn build_execution_options<I: ProjectionInputs + ?Sized>(inputs: &I) -> OptionSets<ExecutionOption> {
    let mut sets = OptionSets::from_base(inputs.base_selected(), inputs.base_excluded());
    sets.apply(&inputs.option_mappings());
    sets
}

/// Build the projection payload
///
/// Blank or non-numeric fields become `None`; building never fails.
#[must_use]
pub fn build_projection_parameters<I: ProjectionInputs + ?Sized>(
    inputs: &I,
    config: &ProjectionConfig,
) -> ProjectionParameters {
    let report = inputs.report();
    let is_year = report.is_year_range();
    let is_age = !is_year;

    let age_increment = if is_year && parse_int(report.year_increment.as_deref()).is_some() {
        parse_int(report.year_increment.as_deref())
    } else {
        parse_int(report.age_increment.as_deref())
    };

    let (selected_execution_options, excluded_execution_options) = build_execution_options(inputs).into_parts();
    let (selected_debug_options, excluded_debug_options) =
        build_debug_options(config.enable_debug_options).into_parts();

    let params = ProjectionParameters {
        age_start: is_age.then(|| parse_int(report.starting_age.as_deref())).flatten(),
        age_end: is_age.then(|| parse_int(report.finishing_age.as_deref())).flatten(),
        age_increment,
        year_start: is_year.then(|| parse_int(report.start_year.as_deref())).flatten(),
        year_end: is_year.then(|| parse_int(report.end_year.as_deref())).flatten(),
        force_year: parse_int(report.specific_year.as_deref()),
        output_format: config.output_format,
        selected_execution_options,
        excluded_execution_options,
        selected_debug_options,
        excluded_debug_options,
        report_title: inputs.report_title(),
        combine_age_year_range: Some(config.combine_age_year_range),
        metadata_to_output: config.metadata_to_output,
        utils: inputs.utilization(),
    };
    tracing::debug!(
        range = %report.selected_age_year_range,
        selected = params.selected_execution_options.len(),
        excluded = params.excluded_execution_options.len(),
        utils = params.utils.len(),
        "built projection parameters"
    );
    params
}

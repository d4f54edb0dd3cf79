//! Saved projections and session restore
//!
//! A saved projection is the parameter payload plus the session details
//! the payload cannot carry: the manual-entry stand values, the panel
//! flags, the input mode, the range discriminator and an optional copy
//! title. Restoring turns it back into stand values, report settings and a
//! panel configuration.
//!
//! When no panel flags were saved they are reconstructed: the report is
//! taken as confirmed iff it has a title and utilization overrides, and
//! every panel before a confirmed one counts as confirmed too. A
//! manual-entry save without stand values restarts at the first panel.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vdyp_panels::{InputMode, PanelName, PanelState};
use vdyp_params::{ExecutionOption, ModelParameterState, ProjectionParameters, ReportInfo, UtilizationParameter};
use vdyp_tables::{AgeYearRange, CombineAgeYearRange, ProjectionType};

/// Persisted session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProjection {
    /// Parameter payload
    #[serde(flatten)]
    pub parameters: ProjectionParameters,
    /// Name of the projection this one was copied from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_title: Option<String>,
    /// Explicit panel flags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_states: Option<IndexMap<PanelName, PanelState>>,
    /// Input workflow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_mode: Option<InputMode>,
    /// Range discriminator shown on the report panel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_age_year_range: Option<AgeYearRange>,
    /// Manual-entry stand values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_parameters: Option<ModelParameterState>,
}

impl SavedProjection {
    /// Wrap a payload with no session details
    #[must_use]
    pub fn new(parameters: ProjectionParameters) -> Self {
        Self {
            parameters,
            ..Self::default()
        }
    }

    /// Record the panel flags
    #[must_use]
    pub fn with_panel_states(mut self, states: IndexMap<PanelName, PanelState>) -> Self {
        self.panel_states = Some(states);
        self
    }

    /// Record the input workflow
    #[must_use]
    pub fn with_input_mode(mut self, mode: InputMode) -> Self {
        self.input_mode = Some(mode);
        self
    }

    /// Record the report range discriminator
    #[must_use]
    pub fn with_age_year_range(mut self, range: AgeYearRange) -> Self {
        self.selected_age_year_range = Some(range);
        self
    }

    /// Record the manual-entry stand values
    #[must_use]
    pub fn with_model_parameters(mut self, state: ModelParameterState) -> Self {
        self.model_parameters = Some(state);
        self
    }

    /// Mark as a copy of another projection
    #[must_use]
    pub fn with_copy_title(mut self, title: impl Into<String>) -> Self {
        self.copy_title = Some(title.into());
        self
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Saved mode, else inferred from the projection report option
    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        self.input_mode.unwrap_or_else(|| {
            if self.parameters.is_selected(ExecutionOption::DoEnableProjectionReport) {
                InputMode::InputModelParameters
            } else {
                InputMode::FileUpload
            }
        })
    }
}

/// Which range a restored report shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeSelection {
    /// Age range only
    Age,
    /// Year range only
    Year,
    /// Both ranges, combined as saved
    Combined(CombineAgeYearRange),
}

impl RangeSelection {
    /// Range selection implied by a payload
    #[must_use]
    pub fn of(parameters: &ProjectionParameters) -> Self {
        match (parameters.has_age_range(), parameters.has_year_range()) {
            (true, true) => Self::Combined(parameters.combine_age_year_range.unwrap_or_default()),
            (false, true) => Self::Year,
            _ => Self::Age,
        }
    }

    /// Range selection of a save
    ///
    /// A saved discriminator wins over the ranges present in the payload;
    /// an age selection still restores as combined when both ranges were
    /// sent.
    #[must_use]
    pub fn of_saved(saved: &SavedProjection) -> Self {
        match (saved.selected_age_year_range, Self::of(&saved.parameters)) {
            (Some(AgeYearRange::Year), _) => Self::Year,
            (Some(AgeYearRange::Age), Self::Year) => Self::Age,
            (_, implied) => implied,
        }
    }

    /// Discriminator shown on the report panel
    #[must_use]
    pub fn discriminator(self) -> AgeYearRange {
        match self {
            Self::Year => AgeYearRange::Year,
            Self::Age | Self::Combined(_) => AgeYearRange::Age,
        }
    }
}

/// Where a duplicated projection came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    /// Title of the source projection
    pub original_name: String,
    /// When the copy was restored
    pub duplicated_at: DateTime<Utc>,
}

/// Session reconstructed from a saved projection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoredSession {
    /// Input workflow
    pub mode: InputMode,
    /// Report panel settings
    pub report: ReportInfo,
    /// Range selection
    pub range: RangeSelection,
    /// Panel flags to load into the state machine
    pub panel_states: IndexMap<PanelName, PanelState>,
    /// Copy origin, when restored from a copy
    pub provenance: Option<Provenance>,
    /// Whether the panel flags were reconstructed
    pub used_heuristic: bool,
    /// Utilization overrides
    pub utils: Vec<UtilizationParameter>,
    /// Manual-entry stand values, when saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_parameters: Option<ModelParameterState>,
}

/// Restore a saved projection now
///
/// `view` opens every panel read-only instead of restoring the saved
/// confirmation progress.
#[must_use]
pub fn restore_session(saved: &SavedProjection, view: bool) -> RestoredSession {
    restore_session_at(saved, view, Utc::now())
}

/// Restore a saved projection with a fixed clock
#[must_use]
pub fn restore_session_at(saved: &SavedProjection, view: bool, now: DateTime<Utc>) -> RestoredSession {
    let mode = saved.input_mode();
    let params = &saved.parameters;
    let range = RangeSelection::of_saved(saved);
    let report = restore_report(params, mode, range);
    let model_parameters = match mode {
        InputMode::InputModelParameters => saved.model_parameters.clone(),
        InputMode::FileUpload => None,
    };

    let (panel_states, used_heuristic) = if view {
        (viewed_states(mode), false)
    } else if mode == InputMode::InputModelParameters && model_parameters.is_none() {
        warn!("no saved stand values, restarting at the first panel");
        (initial_states(mode), true)
    } else if let Some(states) = &saved.panel_states {
        (states.clone(), false)
    } else {
        warn!(%mode, "no saved panel states, reconstructing from parameters");
        (heuristic_states(params, mode), true)
    };

    let provenance = saved.copy_title.as_ref().map(|title| Provenance {
        original_name: title.clone(),
        duplicated_at: now,
    });

    debug!(%mode, ?range, view, used_heuristic, "restored session");
    RestoredSession {
        mode,
        report,
        range,
        panel_states,
        provenance,
        used_heuristic,
        utils: params.utils.clone(),
        model_parameters,
    }
}

fn opt_string(value: Option<i64>) -> Option<String> {
    value.map(|v| v.to_string())
}

fn restore_report(params: &ProjectionParameters, mode: InputMode, range: RangeSelection) -> ReportInfo {
    let selected = |option| params.is_selected(option);

    let projection_type = if selected(ExecutionOption::DoIncludeProjectedCFSBiomass) {
        Some(ProjectionType::CfsBiomass)
    } else if selected(ExecutionOption::DoIncludeProjectedMOFVolumes) {
        Some(ProjectionType::Volume)
    } else {
        None
    };

    let mut report = ReportInfo {
        selected_age_year_range: range.discriminator(),
        starting_age: opt_string(params.age_start),
        finishing_age: opt_string(params.age_end),
        start_year: opt_string(params.year_start),
        end_year: opt_string(params.year_end),
        specific_year: opt_string(params.force_year),
        report_title: params.report_title.clone(),
        projection_type,
        is_forward_grow_enabled: selected(ExecutionOption::ForwardGrowEnabled),
        is_back_grow_enabled: selected(ExecutionOption::BackGrowEnabled),
        is_by_species_enabled: selected(ExecutionOption::DoIncludeSpeciesProjection),
        is_by_layer_enabled: selected(ExecutionOption::DoSummarizeProjectionByLayer),
        incl_secondary_dominant_height: selected(ExecutionOption::DoIncludeSecondarySpeciesDominantHeightInYieldTable),
        ..ReportInfo::default()
    };
    if range == RangeSelection::Year {
        report.year_increment = opt_string(params.age_increment);
    } else {
        report.age_increment = opt_string(params.age_increment);
    }

    match mode {
        InputMode::InputModelParameters => {
            report.is_compute_mai_enabled = selected(ExecutionOption::ReportIncludeVolumeMAI);
            report.is_culmination_values_enabled = selected(ExecutionOption::ReportIncludeCulminationValues);
        }
        InputMode::FileUpload => {
            report.is_projection_mode_enabled = selected(ExecutionOption::DoIncludeProjectionModeInYieldTable);
            report.is_polygon_id_enabled = selected(ExecutionOption::DoIncludePolygonRecordIdInYieldTable);
            report.is_current_year_enabled = selected(ExecutionOption::DoForceCurrentYearInclusionInYieldTables);
            report.is_reference_year_enabled = selected(ExecutionOption::DoForceReferenceYearInclusionInYieldTables);
        }
    }
    report
}

fn viewed_states(mode: InputMode) -> IndexMap<PanelName, PanelState> {
    mode.layout().panels().map(|p| (p, PanelState::VIEWED)).collect()
}

fn initial_states(mode: InputMode) -> IndexMap<PanelName, PanelState> {
    let layout = mode.layout();
    let first = layout.first();
    layout
        .panels()
        .map(|p| (p, if Some(p) == first { PanelState::ACTIVE } else { PanelState::LOCKED }))
        .collect()
}

fn heuristic_states(params: &ProjectionParameters, mode: InputMode) -> IndexMap<PanelName, PanelState> {
    let report_confirmed = params.report_title.as_deref().is_some_and(|t| !t.trim().is_empty()) && !params.utils.is_empty();
    if !report_confirmed {
        return initial_states(mode);
    }
    let layout = mode.layout();
    layout
        .panels()
        .map(|p| {
            let state = if layout.sequence.contains(&p) {
                PanelState::VIEWED
            } else {
                PanelState::ACTIVE
            };
            (p, state)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use vdyp_params::{build_projection_parameters, FileUploadState, ModelParameterState, ProjectionConfig};

    fn manual_params() -> ProjectionParameters {
        build_projection_parameters(&ModelParameterState::with_default_values(), &ProjectionConfig::default())
    }

    fn manual_saved(params: ProjectionParameters) -> SavedProjection {
        SavedProjection::new(params).with_model_parameters(ModelParameterState::with_default_values())
    }

    #[test]
    fn mode_inferred_from_projection_report_option() {
        assert_eq!(SavedProjection::new(manual_params()).input_mode(), InputMode::InputModelParameters);

        let mut file = FileUploadState::new();
        file.set_default_values();
        let params = build_projection_parameters(&file, &ProjectionConfig::default());
        assert_eq!(SavedProjection::new(params).input_mode(), InputMode::FileUpload);
    }

    #[test]
    fn heuristic_confirms_titled_report() {
        let restored = restore_session(&manual_saved(manual_params()), false);
        assert!(restored.used_heuristic);
        assert!(restored.panel_states.values().all(|s| *s == PanelState::VIEWED));
        assert_eq!(restored.report.starting_age.as_deref(), Some("10"));
        assert_eq!(restored.report.projection_type, Some(ProjectionType::Volume));
        assert!(restored.report.is_forward_grow_enabled);
    }

    #[test]
    fn heuristic_without_utils_starts_over() {
        let mut params = manual_params();
        params.utils.clear();
        let restored = restore_session(&manual_saved(params), false);
        assert_eq!(restored.panel_states[&PanelName::SpeciesInfo], PanelState::ACTIVE);
        assert_eq!(restored.panel_states[&PanelName::ReportInfo], PanelState::LOCKED);
    }

    #[test]
    fn explicit_states_win() {
        let mut states = IndexMap::new();
        states.insert(PanelName::SpeciesInfo, PanelState::VIEWED);
        states.insert(PanelName::SiteInfo, PanelState::ACTIVE);
        let saved = manual_saved(manual_params()).with_panel_states(states.clone());
        let restored = restore_session(&saved, false);
        assert!(!restored.used_heuristic);
        assert_eq!(restored.panel_states, states);
        assert_eq!(restored.model_parameters, saved.model_parameters);

        let viewed = restore_session(&saved, true);
        assert_eq!(viewed.panel_states.len(), 4);
        assert!(viewed.panel_states.values().all(|s| *s == PanelState::VIEWED));
    }

    #[test]
    fn manual_save_without_stand_values_starts_over() {
        let mut states = IndexMap::new();
        for panel in InputMode::InputModelParameters.layout().panels() {
            states.insert(panel, PanelState::VIEWED);
        }
        let saved = SavedProjection::new(manual_params()).with_panel_states(states);
        let restored = restore_session(&saved, false);
        assert!(restored.used_heuristic);
        assert!(restored.model_parameters.is_none());
        assert_eq!(restored.panel_states[&PanelName::SpeciesInfo], PanelState::ACTIVE);
        assert_eq!(restored.panel_states[&PanelName::ReportInfo], PanelState::LOCKED);

        // read-only viewing needs no stand values
        assert!(restore_session(&saved, true).panel_states.values().all(|s| *s == PanelState::VIEWED));
    }

    #[test]
    fn saved_year_discriminator_wins_over_blank_years() {
        let mut params = manual_params();
        params.year_start = None;
        params.year_end = None;
        let saved = manual_saved(params).with_age_year_range(AgeYearRange::Year);
        let restored = restore_session(&saved, false);
        assert_eq!(restored.range, RangeSelection::Year);
        assert_eq!(restored.report.selected_age_year_range, AgeYearRange::Year);
        assert_eq!(restored.report.year_increment.as_deref(), Some("20"));

        let unsaved = restore_session(&manual_saved(manual_params()), false);
        assert_eq!(unsaved.range, RangeSelection::Age);
    }

    #[test]
    fn cfs_biomass_takes_precedence() {
        let mut params = manual_params();
        params.selected_execution_options.push(ExecutionOption::DoIncludeProjectedCFSBiomass);
        let restored = restore_session(&SavedProjection::new(params), false);
        assert_eq!(restored.report.projection_type, Some(ProjectionType::CfsBiomass));
    }

    #[test]
    fn both_ranges_restore_as_combined() {
        let mut params = manual_params();
        params.year_start = Some(2020);
        params.year_end = Some(2050);
        params.combine_age_year_range = Some(CombineAgeYearRange::Union);
        let restored = restore_session(&SavedProjection::new(params), false);
        assert_eq!(restored.range, RangeSelection::Combined(CombineAgeYearRange::Union));
        assert_eq!(restored.report.selected_age_year_range, AgeYearRange::Age);
        assert_eq!(restored.report.start_year.as_deref(), Some("2020"));
    }

    #[test]
    fn copy_title_gives_provenance() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let saved = SavedProjection::new(manual_params()).with_copy_title("Stand 42");
        let restored = restore_session_at(&saved, false, now);
        assert_eq!(
            restored.provenance,
            Some(Provenance {
                original_name: "Stand 42".into(),
                duplicated_at: now
            })
        );
    }

    #[test]
    fn saved_json_shape() {
        let saved = SavedProjection::new(manual_params())
            .with_copy_title("A")
            .with_input_mode(InputMode::InputModelParameters);
        let json: serde_json::Value = serde_json::from_str(&saved.to_json().unwrap()).unwrap();
        assert_eq!(json["copyTitle"], "A");
        assert_eq!(json["inputMode"], "inputModelParameters");
        assert_eq!(json["ageStart"], 10);
        assert!(json.get("panelStates").is_none());
        assert!(json.get("modelParameters").is_none());

        let saved = manual_saved(manual_params()).with_age_year_range(AgeYearRange::Age);
        let json: serde_json::Value = serde_json::from_str(&saved.to_json().unwrap()).unwrap();
        assert_eq!(json["selectedAgeYearRange"], "age");
        assert_eq!(json["modelParameters"]["becZone"], "IDF");
    }
}

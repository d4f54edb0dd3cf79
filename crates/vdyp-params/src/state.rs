//! Accumulated panel input
//!
//! Field values are kept as entered (strings) so that blank, zero and
//! non-numeric input stay distinguishable until validation or parameter
//! building interprets them.

use crate::species_group::{recompute_species_groups, SpeciesGroup};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use vdyp_tables::{AgeType, AgeYearRange, DerivedBy, ProjectionType, SiteSpeciesValues, UtilizationClass, SPECIES_SLOTS};

/// One species slot of the species panel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpeciesEntry {
    /// SP64 species code
    pub species: Option<String>,
    /// Percent of the stand, as entered
    pub percent: Option<String>,
}

impl SpeciesEntry {
    /// Create a filled slot
    pub fn new(species: impl Into<String>, percent: impl Into<String>) -> Self {
        Self {
            species: Some(species.into()),
            percent: Some(percent.into()),
        }
    }

    /// Check if the slot has neither a code nor a percent
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.species.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.percent.as_deref().map_or(true, |p| p.trim().is_empty())
    }
}

/// Report panel fields shared by both input modes
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportInfo {
    /// Age or year range discriminator
    pub selected_age_year_range: AgeYearRange,
    pub starting_age: Option<String>,
    pub finishing_age: Option<String>,
    pub age_increment: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
    pub year_increment: Option<String>,
    /// Year forced into the yield table
    pub specific_year: Option<String>,
    pub report_title: Option<String>,
    pub report_description: Option<String>,
    pub projection_type: Option<ProjectionType>,
    pub is_forward_grow_enabled: bool,
    pub is_back_grow_enabled: bool,
    pub is_by_species_enabled: bool,
    pub is_by_layer_enabled: bool,
    pub is_projection_mode_enabled: bool,
    pub is_polygon_id_enabled: bool,
    pub is_current_year_enabled: bool,
    pub is_reference_year_enabled: bool,
    pub incl_secondary_dominant_height: bool,
    pub is_compute_mai_enabled: bool,
    pub is_culmination_values_enabled: bool,
}

impl Default for ReportInfo {
    fn default() -> Self {
        Self {
            selected_age_year_range: AgeYearRange::default(),
            starting_age: None,
            finishing_age: None,
            age_increment: None,
            start_year: None,
            end_year: None,
            year_increment: None,
            specific_year: None,
            report_title: None,
            report_description: None,
            projection_type: None,
            is_forward_grow_enabled: true,
            is_back_grow_enabled: true,
            is_by_species_enabled: false,
            is_by_layer_enabled: true,
            is_projection_mode_enabled: false,
            is_polygon_id_enabled: false,
            is_current_year_enabled: false,
            is_reference_year_enabled: false,
            incl_secondary_dominant_height: false,
            is_compute_mai_enabled: false,
            is_culmination_values_enabled: false,
        }
    }
}

impl ReportInfo {
    /// Check if the year range is selected
    #[inline]
    #[must_use]
    pub fn is_year_range(&self) -> bool {
        self.selected_age_year_range == AgeYearRange::Year
    }

    /// Load the demonstration report settings
    pub fn set_default_values(&mut self, current_year: i32) {
        *self = Self {
            selected_age_year_range: AgeYearRange::Age,
            starting_age: Some(defaults::STARTING_AGE.to_string()),
            finishing_age: Some(defaults::FINISHING_AGE.to_string()),
            age_increment: Some(defaults::AGE_INCREMENT.to_string()),
            start_year: Some(current_year.to_string()),
            end_year: Some((current_year + defaults::YEAR_SPAN).to_string()),
            year_increment: Some(defaults::YEAR_INCREMENT.to_string()),
            report_title: Some(defaults::REPORT_TITLE.to_string()),
            projection_type: Some(ProjectionType::Volume),
            ..Self::default()
        };
    }
}

/// Demonstration stand values
#[allow(missing_docs)]
pub mod defaults {
    use vdyp_tables::UtilizationClass;

    /// Species slots loaded by `set_default_values`
    pub const SPECIES: [(&str, &str); 4] = [("PL", "30.0"), ("AC", "30.0"), ("H", "30.0"), ("S", "10.0")];
    pub const BEC_ZONE: &str = vdyp_tables::zones::DEFAULT_BEC_ZONE;
    pub const AGE: &str = "60";
    pub const HEIGHT: &str = "17.0";
    pub const BHA50_SITE_INDEX: &str = "16.3";
    pub const PERCENT_STOCKABLE_AREA: &str = "55";
    pub const MINIMUM_DBH_LIMIT: UtilizationClass = UtilizationClass::Cm7_5;
    pub const STARTING_AGE: &str = "10";
    pub const FINISHING_AGE: &str = "300";
    pub const AGE_INCREMENT: &str = "20";
    /// End year offset from the start year
    pub const YEAR_SPAN: i32 = 100;
    pub const YEAR_INCREMENT: &str = "10";
    pub const REPORT_TITLE: &str = "Sample Projection Report";
}

/// Manual-entry panel state
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelParameterState {
    pub derived_by: Option<DerivedBy>,
    /// Always [`SPECIES_SLOTS`] entries
    pub species_list: Vec<SpeciesEntry>,
    /// Derived from `species_list` by [`Self::recompute_species_groups`]
    pub species_groups: Vec<SpeciesGroup>,
    pub highest_percent_species: Option<String>,
    pub selected_site_species: Option<String>,

    pub bec_zone: Option<String>,
    pub eco_zone: Option<String>,
    pub site_species_values: Option<SiteSpeciesValues>,
    pub age_type: Option<AgeType>,
    pub spz_age: Option<String>,
    pub spz_height: Option<String>,
    pub bha50_site_index: Option<String>,

    pub percent_stockable_area: Option<String>,
    pub basal_area: Option<String>,
    pub trees_per_hectare: Option<String>,
    pub minimum_dbh_limit: Option<UtilizationClass>,
    pub crown_closure: Option<String>,
    pub reference_year: Option<String>,

    pub report: ReportInfo,
}

impl Default for ModelParameterState {
    fn default() -> Self {
        Self {
            derived_by: None,
            species_list: vec![SpeciesEntry::default(); SPECIES_SLOTS],
            species_groups: Vec::new(),
            highest_percent_species: None,
            selected_site_species: None,
            bec_zone: None,
            eco_zone: None,
            site_species_values: None,
            age_type: None,
            spz_age: None,
            spz_height: None,
            bha50_site_index: None,
            percent_stockable_area: None,
            basal_area: None,
            trees_per_hectare: None,
            minimum_dbh_limit: None,
            crown_closure: None,
            reference_year: None,
            report: ReportInfo::default(),
        }
    }
}

impl ModelParameterState {
    /// Empty state with six blank species slots
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Demonstration stand: PL/AC/H/S in IDF, derived by volume
    #[must_use]
    pub fn with_default_values() -> Self {
        let mut state = Self::new();
        state.set_default_values();
        state
    }

    /// Replace every field with the demonstration values
    pub fn set_default_values(&mut self) {
        let mut species_list: Vec<SpeciesEntry> =
            defaults::SPECIES.iter().map(|(code, pct)| SpeciesEntry::new(*code, *pct)).collect();
        species_list.resize(SPECIES_SLOTS, SpeciesEntry::default());

        let current_year = chrono::Local::now().year();
        let mut report = ReportInfo::default();
        report.set_default_values(current_year);

        *self = Self {
            derived_by: Some(DerivedBy::Volume),
            species_list,
            bec_zone: Some(defaults::BEC_ZONE.to_string()),
            site_species_values: Some(SiteSpeciesValues::Computed),
            age_type: Some(AgeType::Total),
            spz_age: Some(defaults::AGE.to_string()),
            spz_height: Some(defaults::HEIGHT.to_string()),
            bha50_site_index: Some(defaults::BHA50_SITE_INDEX.to_string()),
            percent_stockable_area: Some(defaults::PERCENT_STOCKABLE_AREA.to_string()),
            minimum_dbh_limit: Some(defaults::MINIMUM_DBH_LIMIT),
            reference_year: Some(current_year.to_string()),
            report,
            ..Self::default()
        };
        self.recompute_species_groups();
    }

    /// Rebuild the species groups and the site-species selection
    ///
    /// Call after any change to `species_list` or the projection type.
    pub fn recompute_species_groups(&mut self) {
        let projection_type = self.report.projection_type.unwrap_or(ProjectionType::Volume);
        self.species_groups = recompute_species_groups(&self.species_list, projection_type);
        self.highest_percent_species = self.species_groups.first().map(|g| g.site_species.clone());
        self.selected_site_species.clone_from(&self.highest_percent_species);
        tracing::debug!(
            groups = self.species_groups.len(),
            site_species = ?self.selected_site_species,
            "recomputed species groups"
        );
    }

    /// Set one species slot and recompute the groups
    pub fn set_species(&mut self, slot: usize, entry: SpeciesEntry) {
        if slot >= self.species_list.len() {
            self.species_list.resize(SPECIES_SLOTS.max(slot + 1), SpeciesEntry::default());
        }
        self.species_list[slot] = entry;
        self.recompute_species_groups();
    }
}

/// Per-group utilization selection of the file-upload workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadSpeciesGroup {
    /// SP0 group code
    pub group: String,
    /// Minimum DBH applied to the group
    pub minimum_dbh_limit: UtilizationClass,
}

/// File-upload panel state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileUploadState {
    /// Report panel fields
    pub report: ReportInfo,
    /// Utilization per species group
    pub species_groups: Vec<FileUploadSpeciesGroup>,
}

impl FileUploadState {
    /// Empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Demonstration report settings with every group at its default utilization
    pub fn set_default_values(&mut self) {
        self.report.set_default_values(chrono::Local::now().year());
        let projection_type = self.report.projection_type.unwrap_or(ProjectionType::Volume);
        self.species_groups = vdyp_tables::SPECIES_GROUPS
            .iter()
            .filter_map(|group| {
                vdyp_tables::default_utilization(group, projection_type).map(|minimum_dbh_limit| {
                    FileUploadSpeciesGroup {
                        group: (*group).to_string(),
                        minimum_dbh_limit,
                    }
                })
            })
            .collect();
    }
}

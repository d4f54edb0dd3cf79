//! Polygon and layer CSV input for manual-entry projections
//!
//! Records follow the fixed VDYP7 column order in
//! [`vdyp_tables::csv_layout`]. Values are written unquoted; blank and
//! missing values are empty cells.

use crate::bclcs::BclcsLevels;
use crate::config::ProjectionConfig;
use crate::error::ParamsError;
use crate::identifiers::SyntheticIdentifiers;
use crate::numeric::{parse_float, parse_int};
use crate::state::{ModelParameterState, SpeciesEntry};
use serde::{Deserialize, Serialize};
use vdyp_tables::csv_layout::{
    column_index, CROWN_CLOSURE_DEFAULT, FOREST_COVER_RANK_CODE, LAYER_HEADERS, LAYER_LEVEL_CODE, POLYGON_HEADERS,
    UNKNOWN_CODE, VDYP7_LAYER_CODE, YIELD_FACTOR,
};
use vdyp_tables::{DerivedBy, SiteSpeciesValues, SPECIES_SLOTS};

const POLYGON_SHRUB_HERB_BLANKS: usize = 7;
const POLYGON_TRAILING_BLANKS: usize = 16;
const LAYER_TRAILING_BLANKS: usize = 10;

/// Generated CSV text for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvRecords {
    /// Polygon file, header plus one row
    pub polygon: String,
    /// Layer file, header plus one row
    pub layer: String,
    /// Identifiers written into both files
    pub identifiers: SyntheticIdentifiers,
}

/// Join rows with `\n` and cells with `,`
#[must_use]
pub fn convert_to_csv<S: AsRef<str>>(rows: &[Vec<S>]) -> String {
    rows.iter()
        .map(|row| row.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Numeric cell text, empty for blank or non-numeric input
fn number_cell(value: Option<&str>) -> String {
    parse_float(value).map(|n| n.to_string()).unwrap_or_default()
}

fn text_cell(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

fn blanks(n: usize) -> impl Iterator<Item = String> {
    std::iter::repeat(String::new()).take(n)
}

/// Six `(code, percent)` pairs; the percent is empty for a blank or zero slot
#[must_use]
pub fn species_cells(species: &[SpeciesEntry]) -> Vec<String> {
    (0..SPECIES_SLOTS)
        .flat_map(|slot| {
            let entry = species.get(slot);
            let code = entry.and_then(|e| e.species.as_deref()).map(str::trim).filter(|c| !c.is_empty());
            let percent = entry.and_then(|e| parse_float(e.percent.as_deref())).filter(|p| *p != 0.0);
            match (code, percent) {
                (Some(code), Some(percent)) => [code.to_string(), percent.to_string()],
                (Some(code), None) => [code.to_string(), String::new()],
                (None, _) => [String::new(), String::new()],
            }
        })
        .collect()
}

/// Polygon data row
#[must_use]
pub fn polygon_row(state: &ModelParameterState, config: &ProjectionConfig, ids: &SyntheticIdentifiers) -> Vec<String> {
    let psa = parse_float(state.percent_stockable_area.as_deref());
    let levels = BclcsLevels::classify(psa, state.bec_zone.as_deref(), &state.species_list);
    let inventory_code = state.derived_by.map(DerivedBy::inventory_code).unwrap_or_default();

    let mut row = vec![
        ids.feature_id.clone(),
        config.map_id.clone(),
        ids.polygon_number.clone(),
        UNKNOWN_CODE.to_string(),
        UNKNOWN_CODE.to_string(),
        UNKNOWN_CODE.to_string(),
        inventory_code.to_string(),
        UNKNOWN_CODE.to_string(),
    ];
    row.extend(blanks(POLYGON_SHRUB_HERB_BLANKS));
    row.extend([
        text_cell(state.bec_zone.as_deref()),
        text_cell(state.eco_zone.as_deref()),
        number_cell(state.percent_stockable_area.as_deref()),
        YIELD_FACTOR.to_string(),
        String::new(),
    ]);
    row.extend(levels.as_array().map(str::to_string));
    row.push(String::new());
    row.push(parse_int(state.reference_year.as_deref()).map(|y| y.to_string()).unwrap_or_default());
    row.extend(blanks(POLYGON_TRAILING_BLANKS));
    row
}

/// Layer data row
#[must_use]
pub fn layer_row(state: &ModelParameterState, config: &ProjectionConfig, ids: &SyntheticIdentifiers) -> Vec<String> {
    let computed = state.site_species_values == Some(SiteSpeciesValues::Computed);

    let crown_closure = parse_float(state.crown_closure.as_deref()).filter(|cc| *cc != 0.0);
    let crown_closure = match crown_closure {
        None if computed && state.derived_by == Some(DerivedBy::Volume) => CROWN_CLOSURE_DEFAULT.to_string(),
        Some(cc) => cc.to_string(),
        None => number_cell(state.crown_closure.as_deref()),
    };

    let (basal_area, trees_per_hectare) = if computed && state.derived_by == Some(DerivedBy::BasalArea) {
        (
            number_cell(state.basal_area.as_deref()),
            number_cell(state.trees_per_hectare.as_deref()),
        )
    } else {
        (String::new(), String::new())
    };

    let mut row = vec![
        ids.feature_id.clone(),
        ids.layer_id.clone(),
        config.map_id.clone(),
        ids.polygon_number.clone(),
        LAYER_LEVEL_CODE.to_string(),
        VDYP7_LAYER_CODE.to_string(),
        number_cell(state.percent_stockable_area.as_deref()),
        FOREST_COVER_RANK_CODE.to_string(),
        String::new(),
        text_cell(state.highest_percent_species.as_deref()),
        number_cell(state.bha50_site_index.as_deref()),
        crown_closure,
        basal_area,
        trees_per_hectare,
    ];
    row.extend(species_cells(&state.species_list));
    row.push(number_cell(state.spz_age.as_deref()));
    row.push(number_cell(state.spz_height.as_deref()));
    row.extend(blanks(LAYER_TRAILING_BLANKS));
    row
}

/// Polygon and layer CSV text for the current manual-entry state
#[must_use]
pub fn build_csv_records(
    state: &ModelParameterState,
    config: &ProjectionConfig,
    identifiers: SyntheticIdentifiers,
) -> CsvRecords {
    let header = |h: &[&str]| h.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();
    let polygon = convert_to_csv(&[header(&POLYGON_HEADERS), polygon_row(state, config, &identifiers)]);
    let layer = convert_to_csv(&[header(&LAYER_HEADERS), layer_row(state, config, &identifiers)]);
    tracing::debug!(
        feature_id = %identifiers.feature_id,
        polygon_bytes = polygon.len(),
        layer_bytes = layer.len(),
        "built csv records"
    );
    CsvRecords {
        polygon,
        layer,
        identifiers,
    }
}

/// Header-to-value lookup over the first data row of a CSV file
struct CsvLookup {
    headers: Vec<String>,
    values: Vec<String>,
}

impl CsvLookup {
    fn parse(name: &str, content: &str) -> Result<Self, ParamsError> {
        let mut lines = content.lines().filter(|l| !l.trim().is_empty());
        let (Some(header), Some(data)) = (lines.next(), lines.next()) else {
            return Err(ParamsError::MalformedCsv(format!("{name} file needs a header and a data row")));
        };
        let split = |line: &str| line.split(',').map(|c| c.trim().to_string()).collect::<Vec<_>>();
        Ok(Self {
            headers: split(header.trim_start_matches('\u{feff}')),
            values: split(data),
        })
    }

    fn get(&self, column: &str) -> Option<String> {
        let headers: Vec<&str> = self.headers.iter().map(String::as_str).collect();
        let index = column_index(&headers, column)?;
        self.values.get(index).filter(|v| !v.is_empty()).cloned()
    }
}

/// Stand values read back from generated CSV files
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCsvFileContent {
    pub derived_by: Option<DerivedBy>,
    pub bec_zone: Option<String>,
    pub eco_zone: Option<String>,
    pub percent_stockable_area: Option<String>,
    pub reference_year: Option<i64>,
    pub species_list: Vec<SpeciesEntry>,
    pub highest_percent_species: Option<String>,
    pub site_species_values: Option<SiteSpeciesValues>,
    pub spz_age: Option<String>,
    pub spz_height: Option<String>,
    pub bha50_site_index: Option<String>,
    pub crown_closure: Option<String>,
    pub basal_area: Option<String>,
    pub trees_per_hectare: Option<String>,
}

impl ParsedCsvFileContent {
    /// Copy the parsed values into a manual-entry state
    ///
    /// Species groups are recomputed; the parsed site species wins over the
    /// recomputed one when present.
    pub fn apply_to(&self, state: &mut ModelParameterState) {
        state.derived_by = self.derived_by;
        state.bec_zone.clone_from(&self.bec_zone);
        state.eco_zone.clone_from(&self.eco_zone);
        state.percent_stockable_area.clone_from(&self.percent_stockable_area);
        state.reference_year = self.reference_year.map(|y| y.to_string());
        state.species_list.clone_from(&self.species_list);
        state.site_species_values = self.site_species_values;
        state.spz_age.clone_from(&self.spz_age);
        state.spz_height.clone_from(&self.spz_height);
        state.bha50_site_index.clone_from(&self.bha50_site_index);
        state.crown_closure.clone_from(&self.crown_closure);
        state.basal_area.clone_from(&self.basal_area);
        state.trees_per_hectare.clone_from(&self.trees_per_hectare);
        state.recompute_species_groups();
        if self.highest_percent_species.is_some() {
            state.highest_percent_species.clone_from(&self.highest_percent_species);
            state.selected_site_species.clone_from(&self.highest_percent_species);
        }
    }
}

/// Read generated polygon and layer CSV text back into stand values
///
/// Only the header and the first data row of each file are read. Site
/// species values always come back as computed.
///
/// # Errors
///
/// Returns [`ParamsError::MalformedCsv`] when either file lacks a header
/// and a data row.
pub fn parse_csv_file_content(polygon_csv: &str, layer_csv: &str) -> Result<ParsedCsvFileContent, ParamsError> {
    let polygon = CsvLookup::parse("polygon", polygon_csv)?;
    let layer = CsvLookup::parse("layer", layer_csv)?;

    let species_list = (1..=SPECIES_SLOTS)
        .map(|i| SpeciesEntry {
            species: layer.get(&format!("SPECIES_CD_{i}")),
            percent: layer.get(&format!("SPECIES_PCT_{i}")),
        })
        .collect();

    Ok(ParsedCsvFileContent {
        derived_by: polygon
            .get("INVENTORY_STANDARD_CODE")
            .and_then(|code| DerivedBy::from_inventory_code(&code)),
        bec_zone: polygon.get("BEC_ZONE_CODE"),
        eco_zone: polygon.get("CFS_ECOZONE"),
        percent_stockable_area: polygon.get("PRE_DISTURBANCE_STOCKABILITY"),
        reference_year: parse_int(polygon.get("REFERENCE_YEAR").as_deref()),
        species_list,
        highest_percent_species: layer.get("EST_SITE_INDEX_SPECIES_CD"),
        site_species_values: Some(SiteSpeciesValues::Computed),
        spz_age: layer.get("EST_AGE_SPP1"),
        spz_height: layer.get("EST_HEIGHT_SPP1"),
        bha50_site_index: layer.get("ESTIMATED_SITE_INDEX"),
        crown_closure: layer.get("CROWN_CLOSURE"),
        basal_area: layer.get("BASAL_AREA_75"),
        trees_per_hectare: layer.get("STEMS_PER_HA_75"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids() -> SyntheticIdentifiers {
        SyntheticIdentifiers {
            feature_id: "4212345678".into(),
            polygon_number: "12345678".into(),
            layer_id: "98765".into(),
        }
    }

    fn state() -> ModelParameterState {
        let mut state = ModelParameterState::with_default_values();
        state.reference_year = Some("2024".into());
        state
    }

    #[test]
    fn row_lengths_match_headers() {
        let config = ProjectionConfig::default();
        assert_eq!(polygon_row(&state(), &config, &ids()).len(), POLYGON_HEADERS.len());
        assert_eq!(layer_row(&state(), &config, &ids()).len(), LAYER_HEADERS.len());
        assert_eq!(species_cells(&[]).len(), 12);
    }

    #[test]
    fn polygon_row_columns() {
        let row = polygon_row(&state(), &ProjectionConfig::default(), &ids());
        let at = |c: &str| row[column_index(&POLYGON_HEADERS, c).unwrap()].as_str();
        assert_eq!(at("MAP_ID"), "093C090");
        assert_eq!(at("ORG_UNIT"), "UNK");
        assert_eq!(at("INVENTORY_STANDARD_CODE"), "F");
        assert_eq!(at("BEC_ZONE_CODE"), "IDF");
        assert_eq!(at("CFS_ECOZONE"), "");
        assert_eq!(at("PRE_DISTURBANCE_STOCKABILITY"), "55");
        assert_eq!(at("YIELD_FACTOR"), "1.000");
        assert_eq!(at("BCLCS_LEVEL4_CODE"), "TM");
        assert_eq!(at("REFERENCE_YEAR"), "2024");
    }

    #[test]
    fn layer_density_defaults() {
        let config = ProjectionConfig::default();
        let row = layer_row(&state(), &config, &ids());
        let at = |row: &[String], c: &str| row[column_index(&LAYER_HEADERS, c).unwrap()].clone();
        assert_eq!(at(&row, "CROWN_CLOSURE"), "50");
        assert_eq!(at(&row, "BASAL_AREA_75"), "");
        assert_eq!(at(&row, "EST_SITE_INDEX_SPECIES_CD"), "AC");
        assert_eq!(at(&row, "SPECIES_PCT_1"), "30");

        let mut ba = state();
        ba.derived_by = Some(DerivedBy::BasalArea);
        ba.basal_area = Some("25.5".into());
        ba.trees_per_hectare = Some("1000".into());
        ba.crown_closure = Some("40".into());
        let row = layer_row(&ba, &config, &ids());
        assert_eq!(at(&row, "CROWN_CLOSURE"), "40");
        assert_eq!(at(&row, "BASAL_AREA_75"), "25.5");
        assert_eq!(at(&row, "STEMS_PER_HA_75"), "1000");
    }

    #[test]
    fn default_stand_writes_reference_year() {
        let state = ModelParameterState::with_default_values();
        let row = polygon_row(&state, &ProjectionConfig::default(), &ids());
        let cell = &row[column_index(&POLYGON_HEADERS, "REFERENCE_YEAR").unwrap()];
        assert_eq!(Some(cell.as_str()), state.reference_year.as_deref());
        assert!(cell.parse::<i32>().is_ok());
    }

    #[test]
    fn species_cells_blank_zero_percent() {
        let cells = species_cells(&[SpeciesEntry::new("PL", "0"), SpeciesEntry::new("AC", "40.5")]);
        assert_eq!(&cells[..4], &["PL", "", "AC", "40.5"]);
        assert!(cells[4..].iter().all(String::is_empty));
    }

    #[test]
    fn csv_round_trip() {
        let records = build_csv_records(&state(), &ProjectionConfig::default(), ids());
        assert_eq!(records.polygon.lines().count(), 2);
        let parsed = parse_csv_file_content(&records.polygon, &records.layer).unwrap();
        assert_eq!(parsed.derived_by, Some(DerivedBy::Volume));
        assert_eq!(parsed.bec_zone.as_deref(), Some("IDF"));
        assert_eq!(parsed.eco_zone, None);
        assert_eq!(parsed.reference_year, Some(2024));
        assert_eq!(parsed.species_list[0], SpeciesEntry::new("PL", "30"));
        assert_eq!(parsed.species_list[5], SpeciesEntry::default());
        assert_eq!(parsed.highest_percent_species.as_deref(), Some("AC"));
        assert_eq!(parsed.crown_closure.as_deref(), Some("50"));
        assert_eq!(parsed.site_species_values, Some(SiteSpeciesValues::Computed));
    }

    #[test]
    fn parse_rejects_header_only() {
        let err = parse_csv_file_content("FEATURE_ID\n", "FEATURE_ID\n1").unwrap_err();
        assert!(matches!(err, ParamsError::MalformedCsv(_)));
    }

    #[test]
    fn apply_restores_state() {
        let records = build_csv_records(&state(), &ProjectionConfig::default(), ids());
        let parsed = parse_csv_file_content(&records.polygon, &records.layer).unwrap();
        let mut restored = ModelParameterState::new();
        parsed.apply_to(&mut restored);
        assert_eq!(restored.bec_zone.as_deref(), Some("IDF"));
        assert_eq!(restored.species_groups.len(), 4);
        assert_eq!(restored.selected_site_species.as_deref(), Some("AC"));
    }
}

//! Column layout and fixed values of the generated polygon and layer files

/// Polygon file name
pub const INPUT_POLY_CSV: &str = "VDYP7_INPUT_POLY.csv";
/// Layer file name
pub const INPUT_LAYER_CSV: &str = "VDYP7_INPUT_LAYER.csv";

/// Inventory standard for volume-derived input
pub const INVENTORY_CODE_FIP: &str = "F";
/// Inventory standard for basal-area-derived input
pub const INVENTORY_CODE_VRI: &str = "V";

/// Placeholder for unknown administrative codes
pub const UNKNOWN_CODE: &str = "UNK";
/// Map sheet written for manually entered stands
pub const DEFAULT_MAP_ID: &str = "093C090";
/// Yield factor applied to every manually entered polygon
pub const YIELD_FACTOR: &str = "1.000";
/// Layer level code of the single primary layer
pub const LAYER_LEVEL_CODE: &str = "1";
/// VDYP7 layer code of the primary layer
pub const VDYP7_LAYER_CODE: &str = "P";
/// Forest cover rank of the primary layer
pub const FOREST_COVER_RANK_CODE: &str = "1";

/// Crown closure (%) used when a computed volume stand leaves it blank
pub const CROWN_CLOSURE_DEFAULT: f64 = 50.0;

/// Polygon file columns, in order
pub const POLYGON_HEADERS: [&str; 43] = [
    "FEATURE_ID",
    "MAP_ID",
    "POLYGON_NUMBER",
    "ORG_UNIT",
    "TSA_NAME",
    "TFL_NAME",
    "INVENTORY_STANDARD_CODE",
    "TSA_NUMBER",
    "SHRUB_HEIGHT",
    "SHRUB_CROWN_CLOSURE",
    "SHRUB_COVER_PATTERN",
    "HERB_COVER_TYPE_CODE",
    "HERB_COVER_PCT",
    "HERB_COVER_PATTERN_CODE",
    "BRYOID_COVER_PCT",
    "BEC_ZONE_CODE",
    "CFS_ECOZONE",
    "PRE_DISTURBANCE_STOCKABILITY",
    "YIELD_FACTOR",
    "NON_PRODUCTIVE_DESCRIPTOR_CD",
    "BCLCS_LEVEL1_CODE",
    "BCLCS_LEVEL2_CODE",
    "BCLCS_LEVEL3_CODE",
    "BCLCS_LEVEL4_CODE",
    "BCLCS_LEVEL5_CODE",
    "PHOTO_ESTIMATION_BASE_YEAR",
    "REFERENCE_YEAR",
    "PCT_DEAD",
    "NON_VEG_COVER_TYPE_1",
    "NON_VEG_COVER_PCT_1",
    "NON_VEG_COVER_PATTERN_1",
    "NON_VEG_COVER_TYPE_2",
    "NON_VEG_COVER_PCT_2",
    "NON_VEG_COVER_PATTERN_2",
    "NON_VEG_COVER_TYPE_3",
    "NON_VEG_COVER_PCT_3",
    "NON_VEG_COVER_PATTERN_3",
    "LAND_COVER_CLASS_CD_1",
    "LAND_COVER_PCT_1",
    "LAND_COVER_CLASS_CD_2",
    "LAND_COVER_PCT_2",
    "LAND_COVER_CLASS_CD_3",
    "LAND_COVER_PCT_3",
];

/// Layer file columns, in order
pub const LAYER_HEADERS: [&str; 38] = [
    "FEATURE_ID",
    "TREE_COVER_LAYER_ESTIMATED_ID",
    "MAP_ID",
    "POLYGON_NUMBER",
    "LAYER_LEVEL_CODE",
    "VDYP7_LAYER_CD",
    "LAYER_STOCKABILITY",
    "FOREST_COVER_RANK_CODE",
    "NON_FOREST_DESCRIPTOR_CODE",
    "EST_SITE_INDEX_SPECIES_CD",
    "ESTIMATED_SITE_INDEX",
    "CROWN_CLOSURE",
    "BASAL_AREA_75",
    "STEMS_PER_HA_75",
    "SPECIES_CD_1",
    "SPECIES_PCT_1",
    "SPECIES_CD_2",
    "SPECIES_PCT_2",
    "SPECIES_CD_3",
    "SPECIES_PCT_3",
    "SPECIES_CD_4",
    "SPECIES_PCT_4",
    "SPECIES_CD_5",
    "SPECIES_PCT_5",
    "SPECIES_CD_6",
    "SPECIES_PCT_6",
    "EST_AGE_SPP1",
    "EST_HEIGHT_SPP1",
    "EST_AGE_SPP2",
    "EST_HEIGHT_SPP2",
    "ADJ_IND",
    "LOREY_HEIGHT_75",
    "BASAL_AREA_125",
    "WS_VOL_PER_HA_75",
    "WS_VOL_PER_HA_125",
    "CU_VOL_PER_HA_125",
    "D_VOL_PER_HA_125",
    "DW_VOL_PER_HA_125",
];

/// Index of a column in a header row
#[must_use]
pub fn column_index(headers: &[&str], column: &str) -> Option<usize> {
    headers.iter().position(|h| *h == column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn headers_are_unique() {
        let polygon: HashSet<_> = POLYGON_HEADERS.iter().collect();
        let layer: HashSet<_> = LAYER_HEADERS.iter().collect();
        assert_eq!(polygon.len(), POLYGON_HEADERS.len());
        assert_eq!(layer.len(), LAYER_HEADERS.len());
    }

    #[test]
    fn key_columns_positions() {
        assert_eq!(column_index(&POLYGON_HEADERS, "BEC_ZONE_CODE"), Some(15));
        assert_eq!(column_index(&LAYER_HEADERS, "SPECIES_CD_1"), Some(14));
        assert_eq!(column_index(&LAYER_HEADERS, "NOPE"), None);
    }
}

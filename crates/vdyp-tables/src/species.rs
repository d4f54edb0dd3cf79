//! Species codes and their SP0 groups
//!
//! Inventory species codes (SP64) roll up into sixteen SP0 groups.
//! Coefficient tables and utilization defaults are keyed by group.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The sixteen SP0 species groups
pub const SPECIES_GROUPS: [&str; 16] = [
    "AC", "AT", "B", "C", "D", "E", "F", "H", "L", "MB", "PA", "PL", "PW", "PY", "S", "Y",
];

/// Coniferous groups, used for BCLCS level 4
pub const CONIFEROUS_GROUPS: [&str; 11] = ["B", "C", "F", "H", "L", "PA", "PL", "PW", "PY", "S", "Y"];

/// Broadleaf groups, used for BCLCS level 4
pub const BROADLEAF_GROUPS: [&str; 5] = ["AC", "AT", "D", "E", "MB"];

/// Number of species slots in the species panel
pub const SPECIES_SLOTS: usize = 6;

static SPECIES_GROUP_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let pairs: &[(&str, &[&str])] = &[
        ("AC", &["AC", "ACB", "ACT", "AD", "AX"]),
        ("AT", &["A", "AT"]),
        ("B", &["B", "BA", "BB", "BC", "BG", "BL", "BM", "BP"]),
        ("C", &["C", "CW"]),
        ("D", &["D", "DG", "DM", "DR"]),
        ("E", &["E", "EA", "EB", "EE", "EP", "EW", "EXP"]),
        ("F", &["F", "FD", "FDC", "FDI"]),
        ("H", &["H", "HM", "HW", "HXM"]),
        ("L", &["L", "LA", "LD", "LS", "LT", "LW"]),
        ("MB", &["M", "MB", "ME", "MN", "MR", "MS", "MV"]),
        ("PA", &["PA", "PF"]),
        ("PL", &["P", "PJ", "PL", "PLC", "PLI", "PXJ"]),
        ("PW", &["PW"]),
        ("PY", &["PY"]),
        (
            "S",
            &["S", "SA", "SB", "SE", "SI", "SN", "SS", "SW", "SX", "SXB", "SXE", "SXL", "SXS", "SXW", "SXX"],
        ),
        ("Y", &["Y", "YC", "YP"]),
    ];

    pairs
        .iter()
        .flat_map(|(group, codes)| codes.iter().map(move |code| (*code, *group)))
        .collect()
});

/// SP0 group for a species code, `None` when the code is unknown
///
/// Lookup is case-insensitive and ignores surrounding whitespace.
#[must_use]
pub fn group_for(species_code: &str) -> Option<&'static str> {
    let code = species_code.trim().to_ascii_uppercase();
    SPECIES_GROUP_MAP.get(code.as_str()).copied()
}

/// SP0 group for a species code, falling back to the code itself
#[must_use]
pub fn group_or_self(species_code: &str) -> String {
    group_for(species_code).map_or_else(|| species_code.trim().to_ascii_uppercase(), str::to_string)
}

/// Check if the code is one of the sixteen SP0 groups
#[inline]
#[must_use]
pub fn is_group(code: &str) -> bool {
    SPECIES_GROUPS.contains(&code)
}

/// Check if the code names (or belongs to) a coniferous group
#[must_use]
pub fn is_coniferous(code: &str) -> bool {
    group_for(code).is_some_and(|g| CONIFEROUS_GROUPS.contains(&g))
}

/// Check if the code names (or belongs to) a broadleaf group
#[must_use]
pub fn is_broadleaf(code: &str) -> bool {
    group_for(code).is_some_and(|g| BROADLEAF_GROUPS.contains(&g))
}

/// Every known species code, sorted
#[must_use]
pub fn known_species() -> Vec<&'static str> {
    let mut codes: Vec<&'static str> = SPECIES_GROUP_MAP.keys().copied().collect();
    codes.sort_unstable();
    codes
}

//! BC Land Cover Classification Scheme (BCLCS) constants

/// Level 1 split on percent stockable area
pub const LEVEL1_THRESHOLD: f64 = 5.0;
/// Level 1: vegetated
pub const LEVEL1_VEGETATED: &str = "V";
/// Level 1: non-vegetated
pub const LEVEL1_NON_VEGETATED: &str = "N";

/// Level 2 split on percent stockable area
pub const LEVEL2_THRESHOLD: f64 = 10.0;
/// Level 2: treed
pub const LEVEL2_TREED: &str = "T";
/// Level 2: non-treed
pub const LEVEL2_NON_TREED: &str = "N";

/// BEC zone that marks alpine land cover
pub const LEVEL3_ALPINE_ZONE: &str = "AT";
/// Level 3: alpine
pub const LEVEL3_ALPINE: &str = "A";
/// Level 3: upland
pub const LEVEL3_UPLAND: &str = "U";

/// Majority share (%) for a coniferous or broadleaf classification
pub const LEVEL4_MAJORITY_PERCENT: f64 = 75.0;
/// Level 4: treed coniferous
pub const LEVEL4_CONIFEROUS: &str = "TC";
/// Level 4: treed broadleaf
pub const LEVEL4_BROADLEAF: &str = "TB";
/// Level 4: treed mixed
pub const LEVEL4_MIXED: &str = "TM";

/// Level 5 lower bound for dense stands
pub const LEVEL5_DENSE_THRESHOLD: f64 = 61.0;
/// Level 5 lower bound for open stands
pub const LEVEL5_OPEN_THRESHOLD: f64 = 26.0;
/// Level 5: dense
pub const LEVEL5_DENSE: &str = "DE";
/// Level 5: open
pub const LEVEL5_OPEN: &str = "OP";
/// Level 5: sparse
pub const LEVEL5_SPARSE: &str = "SP";

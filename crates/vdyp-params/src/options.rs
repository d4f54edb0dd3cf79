//! Execution and debug options
//!
//! The option sets start from fixed per-workflow base lists and are then
//! extended by an ordered `{condition, option}` table: a true condition
//! selects the option, a false one excludes it. The two sets stay
//! disjoint; a later entry for the same option wins.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Projection execution switches understood by the projection service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum ExecutionOption {
    AllowAggressiveValueEstimation,
    BackGrowEnabled,
    DoAllowBasalAreaAndTreesPerHectareValueSubstitution,
    DoDelayExecutionFolderDeletion,
    DoEnableDebugLogging,
    DoEnableErrorLogging,
    DoEnableProgressLogging,
    DoEnableProjectionReport,
    DoForceCurrentYearInclusionInYieldTables,
    DoForceReferenceYearInclusionInYieldTables,
    DoIncludeAgeRowsInYieldTable,
    DoIncludeColumnHeadersInYieldTable,
    DoIncludeFileHeader,
    DoIncludePolygonRecordIdInYieldTable,
    DoIncludeProjectedCFSBiomass,
    DoIncludeProjectedMOFBiomass,
    DoIncludeProjectedMOFVolumes,
    DoIncludeProjectionFiles,
    DoIncludeProjectionModeInYieldTable,
    DoIncludeSecondarySpeciesDominantHeightInYieldTable,
    DoIncludeSpeciesProjection,
    DoIncludeYearRowsInYieldTable,
    DoSaveIntermediateFiles,
    DoSummarizeProjectionByLayer,
    DoSummarizeProjectionByPolygon,
    ForwardGrowEnabled,
    ReportIncludeCloseUtilizationVolume,
    ReportIncludeCulminationValues,
    ReportIncludeNDWasteBrkgVolume,
    ReportIncludeNDWasteVolume,
    ReportIncludeNetDecayVolume,
    ReportIncludeSpeciesComp,
    ReportIncludeVolumeMAI,
    ReportIncludeWholeStemVolume,
}

/// Debug output switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum DebugOption {
    DoIncludeDebugTimestamps,
    DoIncludeDebugEntryExit,
    DoIncludeDebugIndentBlocks,
    DoIncludeDebugRoutineNames,
}

impl DebugOption {
    /// Every debug option
    pub const ALL: [Self; 4] = [
        Self::DoIncludeDebugTimestamps,
        Self::DoIncludeDebugEntryExit,
        Self::DoIncludeDebugIndentBlocks,
        Self::DoIncludeDebugRoutineNames,
    ];
}

/// One row of an option table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionMapping {
    /// Selects the option when true, excludes it otherwise
    pub condition: bool,
    /// Option controlled by the row
    pub option: ExecutionOption,
}

impl OptionMapping {
    /// Create mapping
    #[inline]
    #[must_use]
    pub const fn new(condition: bool, option: ExecutionOption) -> Self {
        Self { condition, option }
    }
}

/// Selected and excluded options, kept disjoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSets<T: std::hash::Hash + Eq> {
    selected: IndexSet<T>,
    excluded: IndexSet<T>,
}

impl<T: std::hash::Hash + Eq + Copy> OptionSets<T> {
    /// Start from base lists
    #[must_use]
    pub fn from_base(selected: &[T], excluded: &[T]) -> Self {
        let mut sets = Self {
            selected: IndexSet::new(),
            excluded: IndexSet::new(),
        };
        for &option in selected {
            sets.select(option);
        }
        for &option in excluded {
            sets.exclude(option);
        }
        sets
    }

    /// Move an option into the selected set
    pub fn select(&mut self, option: T) {
        self.excluded.shift_remove(&option);
        self.selected.insert(option);
    }

    /// Move an option into the excluded set
    pub fn exclude(&mut self, option: T) {
        self.selected.shift_remove(&option);
        self.excluded.insert(option);
    }

    /// Check if an option is selected
    #[must_use]
    pub fn is_selected(&self, option: T) -> bool {
        self.selected.contains(&option)
    }

    /// Check if an option is excluded
    #[must_use]
    pub fn is_excluded(&self, option: T) -> bool {
        self.excluded.contains(&option)
    }

    /// Selected options in insertion order
    #[must_use]
    pub fn selected(&self) -> Vec<T> {
        self.selected.iter().copied().collect()
    }

    /// Excluded options in insertion order
    #[must_use]
    pub fn excluded(&self) -> Vec<T> {
        self.excluded.iter().copied().collect()
    }

    /// Split into `(selected, excluded)`
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, Vec<T>) {
        (self.selected.into_iter().collect(), self.excluded.into_iter().collect())
    }
}

impl OptionSets<ExecutionOption> {
    /// Apply an option table in order
    pub fn apply(&mut self, mappings: &[OptionMapping]) {
        for mapping in mappings {
            if mapping.condition {
                self.select(mapping.option);
            } else {
                self.exclude(mapping.option);
            }
        }
    }
}

/// Always-selected options of the manual-entry workflow
pub const MANUAL_BASE_SELECTED: &[ExecutionOption] = &[
    ExecutionOption::DoIncludeAgeRowsInYieldTable,
    ExecutionOption::DoIncludeColumnHeadersInYieldTable,
    ExecutionOption::DoEnableProgressLogging,
    ExecutionOption::DoEnableErrorLogging,
    ExecutionOption::DoEnableDebugLogging,
    ExecutionOption::DoEnableProjectionReport,
    ExecutionOption::AllowAggressiveValueEstimation,
    ExecutionOption::DoIncludeFileHeader,
    ExecutionOption::DoSummarizeProjectionByLayer,
    ExecutionOption::ReportIncludeWholeStemVolume,
    ExecutionOption::ReportIncludeCloseUtilizationVolume,
    ExecutionOption::ReportIncludeNetDecayVolume,
    ExecutionOption::ReportIncludeNDWasteVolume,
    ExecutionOption::ReportIncludeNDWasteBrkgVolume,
];

/// Always-excluded options of the manual-entry workflow
pub const MANUAL_BASE_EXCLUDED: &[ExecutionOption] = &[
    ExecutionOption::DoSaveIntermediateFiles,
    ExecutionOption::DoForceReferenceYearInclusionInYieldTables,
    ExecutionOption::DoForceCurrentYearInclusionInYieldTables,
    ExecutionOption::DoIncludeProjectionModeInYieldTable,
    ExecutionOption::DoIncludeYearRowsInYieldTable,
    ExecutionOption::DoIncludePolygonRecordIdInYieldTable,
    ExecutionOption::DoSummarizeProjectionByPolygon,
    ExecutionOption::DoIncludeProjectedMOFBiomass,
    ExecutionOption::DoAllowBasalAreaAndTreesPerHectareValueSubstitution,
    ExecutionOption::DoIncludeProjectionFiles,
    ExecutionOption::DoDelayExecutionFolderDeletion,
];

/// Always-selected options of the file-upload workflow
pub const FILE_UPLOAD_BASE_SELECTED: &[ExecutionOption] = &[
    ExecutionOption::DoIncludeFileHeader,
    ExecutionOption::DoIncludeAgeRowsInYieldTable,
    ExecutionOption::DoIncludeYearRowsInYieldTable,
    ExecutionOption::DoIncludeColumnHeadersInYieldTable,
    ExecutionOption::DoAllowBasalAreaAndTreesPerHectareValueSubstitution,
    ExecutionOption::DoEnableProgressLogging,
    ExecutionOption::DoEnableErrorLogging,
    ExecutionOption::DoEnableDebugLogging,
];

/// Always-excluded options of the file-upload workflow
pub const FILE_UPLOAD_BASE_EXCLUDED: &[ExecutionOption] = &[
    ExecutionOption::DoSaveIntermediateFiles,
    ExecutionOption::AllowAggressiveValueEstimation,
    ExecutionOption::DoIncludeProjectionFiles,
    ExecutionOption::DoDelayExecutionFolderDeletion,
    ExecutionOption::DoIncludeProjectedMOFBiomass,
    ExecutionOption::ReportIncludeWholeStemVolume,
    ExecutionOption::ReportIncludeCloseUtilizationVolume,
    ExecutionOption::ReportIncludeNetDecayVolume,
    ExecutionOption::ReportIncludeNDWasteVolume,
    ExecutionOption::ReportIncludeNDWasteBrkgVolume,
    ExecutionOption::ReportIncludeVolumeMAI,
    ExecutionOption::ReportIncludeSpeciesComp,
    ExecutionOption::ReportIncludeCulminationValues,
];

/// Debug options: all selected when enabled, all excluded otherwise
#[must_use]
pub fn build_debug_options(enabled: bool) -> OptionSets<DebugOption> {
    if enabled {
        OptionSets::from_base(&DebugOption::ALL, &[])
    } else {
        OptionSets::from_base(&[], &DebugOption::ALL)
    }
}

//! Projection payload settings

use serde::{Deserialize, Serialize};
use vdyp_tables::csv_layout::DEFAULT_MAP_ID;
use vdyp_tables::{CombineAgeYearRange, MetadataToOutput, OutputFormat};

/// Settings applied to every built payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectionConfig {
    /// Requested output format
    pub output_format: OutputFormat,
    /// Metadata written alongside the yield table
    pub metadata_to_output: MetadataToOutput,
    /// How age and year ranges combine when both are supplied
    pub combine_age_year_range: CombineAgeYearRange,
    /// Select all debug options instead of excluding them
    pub enable_debug_options: bool,
    /// Map sheet written into generated CSV records
    pub map_id: String,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::default(),
            metadata_to_output: MetadataToOutput::default(),
            combine_age_year_range: CombineAgeYearRange::default(),
            enable_debug_options: true,
            map_id: DEFAULT_MAP_ID.to_string(),
        }
    }
}

impl ProjectionConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set output format
    #[must_use]
    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    /// Set metadata to output
    #[must_use]
    pub fn with_metadata_to_output(mut self, metadata: MetadataToOutput) -> Self {
        self.metadata_to_output = metadata;
        self
    }

    /// Set age/year range combination
    #[must_use]
    pub fn with_combine_age_year_range(mut self, combine: CombineAgeYearRange) -> Self {
        self.combine_age_year_range = combine;
        self
    }

    /// Enable or disable debug options
    #[must_use]
    pub fn with_debug_options(mut self, enabled: bool) -> Self {
        self.enable_debug_options = enabled;
        self
    }

    /// Set map id
    #[must_use]
    pub fn with_map_id(mut self, map_id: impl Into<String>) -> Self {
        self.map_id = map_id.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ProjectionConfig::default();
        assert_eq!(config.output_format, OutputFormat::CsvYieldTable);
        assert_eq!(config.metadata_to_output, MetadataToOutput::Version);
        assert_eq!(config.combine_age_year_range, CombineAgeYearRange::Intersect);
        assert!(config.enable_debug_options);
        assert_eq!(config.map_id, "093C090");
    }

    #[test]
    fn builders_chain() {
        let config = ProjectionConfig::new()
            .with_output_format(OutputFormat::TextReport)
            .with_debug_options(false)
            .with_map_id("082G041");
        assert_eq!(config.output_format, OutputFormat::TextReport);
        assert!(!config.enable_debug_options);
        assert_eq!(config.map_id, "082G041");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ProjectionConfig = serde_json::from_str(r#"{"metadataToOutput":"NONE"}"#).unwrap();
        assert_eq!(config.metadata_to_output, MetadataToOutput::None);
        assert_eq!(config.map_id, "093C090");
    }
}

//! Session configuration
//!
//! Loaded from TOML or JSON; every key is optional.
//!
//! ```toml
//! advisory_policy = "proceed-with-warning"
//!
//! [projection]
//! outputFormat = "CSVYieldTable"
//! metadataToOutput = "VERSION"
//! mapId = "093C090"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use vdyp_params::ProjectionConfig;

/// What confirm does when only advisory findings remain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdvisoryPolicy {
    /// Confirm and report the advisories
    #[default]
    ProceedWithWarning,
    /// Treat advisories as blocking
    Block,
}

impl AdvisoryPolicy {
    /// Check if advisories stop a confirm
    #[inline]
    #[must_use]
    pub fn blocks(self) -> bool {
        matches!(self, Self::Block)
    }
}

/// Configuration of a projection session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Payload settings
    pub projection: ProjectionConfig,
    /// Advisory handling on confirm
    pub advisory_policy: AdvisoryPolicy,
}

impl SessionConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set payload settings
    #[must_use]
    pub fn with_projection(mut self, projection: ProjectionConfig) -> Self {
        self.projection = projection;
        self
    }

    /// Set advisory policy
    #[must_use]
    pub fn with_advisory_policy(mut self, policy: AdvisoryPolicy) -> Self {
        self.advisory_policy = policy;
        self
    }

    /// Load from a TOML string
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] for malformed input.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a JSON string
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a `.toml` or `.json` file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or has
    /// another extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let content = std::fs::read_to_string(path)?;
        let config = match extension.as_str() {
            "toml" => Self::from_toml_str(&content)?,
            "json" => Self::from_json_str(&content)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        tracing::debug!(path = %path.display(), "loaded session config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use vdyp_tables::{MetadataToOutput, OutputFormat};

    #[test]
    fn toml_partial() {
        let config = SessionConfig::from_toml_str(
            r#"
            advisory_policy = "block"

            [projection]
            outputFormat = "TextReport"
            "#,
        )
        .unwrap();
        assert!(config.advisory_policy.blocks());
        assert_eq!(config.projection.output_format, OutputFormat::TextReport);
        assert_eq!(config.projection.metadata_to_output, MetadataToOutput::Version);
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(SessionConfig::from_json_str("{}").unwrap(), SessionConfig::default());
    }

    #[test]
    fn file_dispatch_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[projection]\nmapId = \"082G041\"").unwrap();
        let config = SessionConfig::from_file(&path).unwrap();
        assert_eq!(config.projection.map_id, "082G041");

        let yaml = dir.path().join("session.yaml");
        std::fs::write(&yaml, "projection: {}").unwrap();
        assert!(matches!(SessionConfig::from_file(&yaml), Err(ConfigError::UnsupportedFormat(_))));
    }
}

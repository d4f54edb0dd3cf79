//! Error types for the projection session

use vdyp_panels::StateMachineError;
use vdyp_params::ParamsError;
use vdyp_tables::FileKind;

/// Failures of the projection service collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// No projection has been created for the session yet
    #[error("projection guid is missing")]
    MissingGuid,

    /// Unknown projection id
    #[error("projection not found: {0}")]
    NotFound(String),

    /// Run requested before both input files were uploaded
    #[error("{kind} file has not been uploaded")]
    MissingFile {
        /// File still missing
        kind: FileKind,
    },

    /// Results requested before the projection ran
    #[error("projection {0} has no results yet")]
    NotReady(String),

    /// The service refused the request
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Transport-level failure
    #[error("transport error: {0}")]
    Transport(String),
}

impl ServiceError {
    /// Check if the request may succeed when repeated
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::NotReady(_))
    }
}

/// Configuration loading failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML
    #[error("config toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON
    #[error("config json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Extension other than `.toml` or `.json`
    #[error("unsupported config format: '{0}'")]
    UnsupportedFormat(String),
}

/// Session-level error
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Panel transition refused
    #[error("panel transition failed: {0}")]
    StateMachine(#[from] StateMachineError),

    /// Payload building failed
    #[error("parameter error: {0}")]
    Params(#[from] ParamsError),

    /// Collaborator failed
    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Run requested while some panel or file is outstanding
    #[error("projection is not ready to run")]
    RunNotEnabled,

    /// Operation belongs to the other input mode
    #[error("operation requires {expected} mode")]
    WrongMode {
        /// Mode the operation needs
        expected: vdyp_panels::InputMode,
    },
}

impl CoreError {
    /// Check if the operation may succeed when repeated
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::StateMachine(e) => e.is_retryable(),
            Self::Service(e) => e.is_retryable(),
            _ => false,
        }
    }
}

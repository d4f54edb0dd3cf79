//! VDYP Projection Input Core
//!
//! Session facade over the panel workflow, the payload builders and the
//! projection service.
//!
//! # Overview
//!
//! - **Session**: confirm/edit/reset with per-panel validation, uploads,
//!   payload building and the run against a [`ProjectionService`]
//! - **Restore**: saved projections back into report settings and panel
//!   flags, with a reconstruction fallback for older saves
//! - **Service**: async seam to the projection backend, plus an in-memory
//!   implementation
//! - **Config**: TOML/JSON session configuration
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use vdyp_core::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), CoreError> {
//! let service = Arc::new(InMemoryProjectionService::new());
//! let session = ProjectionSession::manual(
//!     ModelParameterState::with_default_values(),
//!     service,
//!     SessionConfig::default(),
//! );
//!
//! for panel in [PanelName::SpeciesInfo, PanelName::SiteInfo, PanelName::StandInfo, PanelName::ReportInfo] {
//!     assert!(session.confirm(panel)?.is_confirmed());
//! }
//! let handle = session.run().await?;
//! let archive = session.fetch_results().await?;
//! assert!(!archive.is_empty());
//! # let _ = handle;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod restore;
pub mod service;
pub mod session;

// Re-exports
pub use config::{AdvisoryPolicy, SessionConfig};
pub use error::{ConfigError, CoreError, ServiceError};
pub use restore::{restore_session, restore_session_at, Provenance, RangeSelection, RestoredSession, SavedProjection};
pub use service::{
    InMemoryProjectionService, ProjectionHandle, ProjectionId, ProjectionService, ProjectionStatus, UploadedFile,
};
pub use session::{ConfirmOutcome, PanelValidation, Payload, ProjectionSession, SessionInput};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for projection sessions
    pub use crate::{
        restore_session, ConfirmOutcome, CoreError, InMemoryProjectionService, ProjectionService,
        ProjectionSession, SavedProjection, ServiceError, SessionConfig,
    };
    pub use vdyp_panels::{InputMode, PanelName, PanelState};
    pub use vdyp_params::{FileUploadState, ModelParameterState};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

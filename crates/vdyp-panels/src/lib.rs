//! VDYP Input Panels
//!
//! Ordered confirmation workflow for projection input panels.
//!
//! # Overview
//!
//! - **Layouts**: manual entry (species, site, stand, report) and file
//!   upload (report, then attachments)
//! - **State machine**: confirm/edit/reset with all-or-nothing transitions
//! - **Run condition**: every sequential panel confirmed, plus both files
//!   in the upload workflow
//! - **Observers**: change notification after each applied transition
//!
//! # Example
//!
//! ```rust
//! use vdyp_panels::{InputMode, PanelName, PanelStateMachine};
//!
//! let mut machine = PanelStateMachine::new(InputMode::InputModelParameters);
//! machine.confirm_panel(PanelName::SpeciesInfo).unwrap();
//! assert!(machine.state(PanelName::SiteInfo).unwrap().editable);
//!
//! machine.edit_panel(PanelName::SpeciesInfo).unwrap();
//! assert!(!machine.state(PanelName::SiteInfo).unwrap().editable);
//! ```

pub mod error;
pub mod machine;
pub mod observer;
pub mod panel;

// Re-exports
pub use error::StateMachineError;
pub use machine::{AttachedFiles, FileReference, PanelChange, PanelStateMachine, TransitionReport};
pub use observer::{PanelObserver, TransitionLog};
pub use panel::{InputMode, PanelLayout, PanelName, PanelState, PanelStatus};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for panel workflows
    pub use crate::{
        FileReference, InputMode, PanelName, PanelObserver, PanelState, PanelStateMachine, StateMachineError,
        TransitionReport,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

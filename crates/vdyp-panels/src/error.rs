//! Panel transition errors

use crate::panel::{InputMode, PanelName};

/// Rejected panel transitions
///
/// A rejected transition leaves every panel unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateMachineError {
    /// Panel not part of the current workflow
    #[error("panel {panel} is not part of the {mode} layout")]
    UnknownPanel {
        /// Requested panel
        panel: PanelName,
        /// Current workflow
        mode: InputMode,
    },

    /// Confirm requested on a panel that is not accepting input
    #[error("panel {panel} is not editable")]
    PanelNotEditable {
        /// Requested panel
        panel: PanelName,
    },

    /// Edit requested before the preceding panel was confirmed
    #[error("panel {panel} cannot be edited before {predecessor} is confirmed")]
    PredecessorNotConfirmed {
        /// Requested panel
        panel: PanelName,
        /// Unconfirmed predecessor
        predecessor: PanelName,
    },

    /// Another transition or a run holds the machine
    #[error("a panel transition is already in progress")]
    TransitionInProgress,

    /// Restored or computed state breaks a panel invariant
    #[error("panel invariant violated: {0}")]
    InvariantViolated(String),
}

impl StateMachineError {
    /// Check if retrying later may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransitionInProgress)
    }

    /// Check if the error reflects a caller mistake rather than busy state
    #[inline]
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        !self.is_retryable()
    }
}

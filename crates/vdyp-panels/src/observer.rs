//! Change notification for panel transitions

use crate::machine::TransitionReport;
use parking_lot::Mutex;

/// Receives every applied transition
pub trait PanelObserver: Send + Sync {
    /// Called after a transition has been applied
    fn on_transition(&self, report: &TransitionReport);
}

/// Observer that keeps every report it receives
#[derive(Debug, Default)]
pub struct TransitionLog {
    reports: Mutex<Vec<TransitionReport>>,
}

impl TransitionLog {
    /// Create empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the received reports
    #[must_use]
    pub fn reports(&self) -> Vec<TransitionReport> {
        self.reports.lock().clone()
    }

    /// Number of received reports
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    /// Check if nothing was received
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }

    /// Drop received reports
    pub fn clear(&self) {
        self.reports.lock().clear();
    }
}

impl PanelObserver for TransitionLog {
    fn on_transition(&self, report: &TransitionReport) {
        self.reports.lock().push(report.clone());
    }
}

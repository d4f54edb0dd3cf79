//! Panel confirmation state machine
//!
//! Panels of a workflow are confirmed strictly in order:
//! - confirming a panel locks it and opens its successor
//! - editing a panel reopens it and resets every later panel
//!
//! Every transition is computed on a copy of the panel map and committed
//! only after the invariants hold, so a rejected call changes nothing.

use crate::error::StateMachineError;
use crate::observer::PanelObserver;
use crate::panel::{InputMode, PanelLayout, PanelName, PanelState, PanelStatus};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use vdyp_tables::FileKind;

/// Reference to an uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReference {
    /// Original file name
    pub file_name: String,
}

impl FileReference {
    /// Create reference
    #[must_use]
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

/// Polygon and layer uploads of the file workflow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedFiles {
    /// Polygon file
    pub polygon: Option<FileReference>,
    /// Layer file
    pub layer: Option<FileReference>,
}

impl AttachedFiles {
    /// Check if both files are present
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.polygon.is_some() && self.layer.is_some()
    }

    /// File of a kind
    #[must_use]
    pub fn get(&self, kind: FileKind) -> Option<&FileReference> {
        match kind {
            FileKind::Polygon => self.polygon.as_ref(),
            FileKind::Layer => self.layer.as_ref(),
        }
    }
}

/// State change of one panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelChange {
    /// Panel
    pub panel: PanelName,
    /// State before the transition
    pub before: PanelState,
    /// State after the transition
    pub after: PanelState,
}

/// Outcome of an applied transition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionReport {
    /// Panels whose state changed
    pub changes: Vec<PanelChange>,
    /// Run condition after the transition
    pub run_enabled: bool,
}

impl TransitionReport {
    /// Check if nothing changed
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }

    /// New state of a panel, if it changed
    #[must_use]
    pub fn after(&self, panel: PanelName) -> Option<PanelState> {
        self.changes.iter().find(|c| c.panel == panel).map(|c| c.after)
    }
}

/// Ordered panel workflow
pub struct PanelStateMachine {
    mode: InputMode,
    layout: PanelLayout,
    states: IndexMap<PanelName, PanelState>,
    files: AttachedFiles,
    frozen: bool,
    observers: Vec<Arc<dyn PanelObserver>>,
}

impl fmt::Debug for PanelStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelStateMachine")
            .field("mode", &self.mode)
            .field("states", &self.states)
            .field("files", &self.files)
            .field("frozen", &self.frozen)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl PanelStateMachine {
    /// Machine in the initial configuration of a workflow
    #[must_use]
    pub fn new(mode: InputMode) -> Self {
        let layout = mode.layout();
        let states = initial_states(&layout);
        Self {
            mode,
            layout,
            states,
            files: AttachedFiles::default(),
            frozen: false,
            observers: Vec::new(),
        }
    }

    /// Register a transition observer
    pub fn subscribe(&mut self, observer: Arc<dyn PanelObserver>) {
        self.observers.push(observer);
    }

    /// Workflow
    #[must_use]
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Panel layout
    #[must_use]
    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    /// State of a panel
    #[must_use]
    pub fn state(&self, panel: PanelName) -> Option<PanelState> {
        self.states.get(&panel).copied()
    }

    /// Status of a panel
    #[must_use]
    pub fn status(&self, panel: PanelName) -> Option<PanelStatus> {
        self.state(panel).map(PanelState::status)
    }

    /// Attached files
    #[must_use]
    pub fn files(&self) -> &AttachedFiles {
        &self.files
    }

    /// All sequential panels confirmed and, when the workflow needs them, both files attached
    #[must_use]
    pub fn run_enabled(&self) -> bool {
        let confirmed = self
            .layout
            .sequence
            .iter()
            .all(|p| self.states.get(p).is_some_and(|s| s.confirmed));
        confirmed && (!self.layout.requires_files || self.files.is_complete())
    }

    /// Check if a run holds the machine
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Reject transitions until [`Self::unfreeze`]
    pub fn freeze(&mut self) -> Result<(), StateMachineError> {
        self.ensure_not_frozen("freeze")?;
        self.frozen = true;
        Ok(())
    }

    /// Accept transitions again
    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    /// Accept a panel and open its successor
    pub fn confirm_panel(&mut self, panel: PanelName) -> Result<TransitionReport, StateMachineError> {
        self.ensure_not_frozen("confirm")?;
        self.ensure_known(panel)?;

        let current = self.states[&panel];
        if !current.editable || current.confirmed {
            return Err(StateMachineError::PanelNotEditable { panel });
        }

        let mut next = self.states.clone();
        next.insert(
            panel,
            PanelState {
                confirmed: true,
                editable: false,
                open: current.open,
            },
        );
        if let Some(successor) = self.layout.successor(panel) {
            next.insert(successor, PanelState::ACTIVE);
        }

        debug!(%panel, mode = %self.mode, "confirm panel");
        self.commit(next)
    }

    /// Reopen a panel and reset every later panel
    pub fn edit_panel(&mut self, panel: PanelName) -> Result<TransitionReport, StateMachineError> {
        self.ensure_not_frozen("edit")?;
        self.ensure_known(panel)?;

        let current = self.states[&panel];
        match current.status() {
            PanelStatus::Active => return Ok(self.report(Vec::new())),
            PanelStatus::Locked => {
                if let Some(predecessor) = self.layout.predecessor(panel) {
                    if !self.states[&predecessor].confirmed {
                        return Err(StateMachineError::PredecessorNotConfirmed { panel, predecessor });
                    }
                }
            }
            PanelStatus::Confirmed => {}
        }

        let mut next = self.states.clone();
        next.insert(panel, PanelState::ACTIVE);
        for later in self.layout.later(panel) {
            next.insert(later, PanelState::LOCKED);
        }

        debug!(%panel, mode = %self.mode, "edit panel");
        self.commit(next)
    }

    /// Restore the initial configuration and drop attached files
    pub fn reset(&mut self) -> Result<TransitionReport, StateMachineError> {
        self.ensure_not_frozen("reset")?;
        self.files = AttachedFiles::default();
        let next = initial_states(&self.layout);
        debug!(mode = %self.mode, "reset panels");
        self.commit(next)
    }

    /// Attach or clear an upload
    pub fn attach_file(
        &mut self,
        kind: FileKind,
        file: Option<FileReference>,
    ) -> Result<TransitionReport, StateMachineError> {
        self.ensure_not_frozen("attach file")?;
        match kind {
            FileKind::Polygon => self.files.polygon = file,
            FileKind::Layer => self.files.layer = file,
        }
        Ok(self.report(Vec::new()))
    }

    /// Confirm and open every panel, as shown when viewing a saved projection
    pub fn mark_all_confirmed(&mut self) -> Result<TransitionReport, StateMachineError> {
        self.ensure_not_frozen("view")?;
        let next = self.layout.panels().map(|p| (p, PanelState::VIEWED)).collect();
        self.commit(next)
    }

    /// Current panel states in layout order
    #[must_use]
    pub fn snapshot(&self) -> IndexMap<PanelName, PanelState> {
        self.states.clone()
    }

    /// Replace panel states wholesale
    ///
    /// Panels missing from `states` are locked. Fails without changing
    /// anything when a panel is foreign to the layout or the invariants
    /// do not hold.
    pub fn restore(
        &mut self,
        states: &IndexMap<PanelName, PanelState>,
    ) -> Result<TransitionReport, StateMachineError> {
        self.ensure_not_frozen("restore")?;
        if let Some(panel) = states.keys().copied().find(|p| !self.layout.contains(*p)) {
            return Err(StateMachineError::UnknownPanel { panel, mode: self.mode });
        }
        let next = self
            .layout
            .panels()
            .map(|p| (p, states.get(&p).copied().unwrap_or(PanelState::LOCKED)))
            .collect();
        self.commit(next)
    }

    /// Check the panel invariants on the current state
    pub fn check_invariants(&self) -> Result<(), StateMachineError> {
        check_invariants(&self.layout, &self.states)
    }

    fn ensure_not_frozen(&self, action: &str) -> Result<(), StateMachineError> {
        if self.frozen {
            warn!(action, mode = %self.mode, "panel transition rejected while frozen");
            return Err(StateMachineError::TransitionInProgress);
        }
        Ok(())
    }

    fn ensure_known(&self, panel: PanelName) -> Result<(), StateMachineError> {
        if self.layout.contains(panel) {
            Ok(())
        } else {
            Err(StateMachineError::UnknownPanel { panel, mode: self.mode })
        }
    }

    fn commit(&mut self, next: IndexMap<PanelName, PanelState>) -> Result<TransitionReport, StateMachineError> {
        check_invariants(&self.layout, &next)?;

        let changes: Vec<PanelChange> = self
            .layout
            .panels()
            .filter_map(|panel| {
                let before = self.states.get(&panel).copied().unwrap_or_default();
                let after = next.get(&panel).copied().unwrap_or_default();
                (before != after).then_some(PanelChange { panel, before, after })
            })
            .collect();

        self.states = next;
        let report = self.report(changes);
        for observer in &self.observers {
            observer.on_transition(&report);
        }
        Ok(report)
    }

    fn report(&self, changes: Vec<PanelChange>) -> TransitionReport {
        TransitionReport {
            changes,
            run_enabled: self.run_enabled(),
        }
    }
}

impl Default for PanelStateMachine {
    fn default() -> Self {
        Self::new(InputMode::default())
    }
}

fn initial_states(layout: &PanelLayout) -> IndexMap<PanelName, PanelState> {
    let first = layout.first();
    layout
        .panels()
        .map(|p| {
            let state = if Some(p) == first {
                PanelState::ACTIVE
            } else {
                PanelState::LOCKED
            };
            (p, state)
        })
        .collect()
}

fn check_invariants(layout: &PanelLayout, states: &IndexMap<PanelName, PanelState>) -> Result<(), StateMachineError> {
    let mut active = Vec::new();
    for panel in layout.panels() {
        let state = states.get(&panel).copied().unwrap_or_default();

        if state.confirmed && state.editable {
            return Err(StateMachineError::InvariantViolated(format!(
                "{panel} is both confirmed and editable"
            )));
        }
        if state.editable && !state.confirmed {
            active.push(panel);
        }
        if state.editable || state.confirmed {
            if let Some(predecessor) = layout.predecessor(panel) {
                let pred_confirmed = states.get(&predecessor).is_some_and(|s| s.confirmed);
                if !pred_confirmed {
                    return Err(StateMachineError::InvariantViolated(format!(
                        "{panel} is unlocked while {predecessor} is unconfirmed"
                    )));
                }
            }
        }
    }
    if active.len() > 1 {
        let names: Vec<String> = active.iter().map(ToString::to_string).collect();
        return Err(StateMachineError::InvariantViolated(format!(
            "more than one active panel: {}",
            names.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::TransitionLog;

    #[test]
    fn initial_configuration() {
        let m = PanelStateMachine::new(InputMode::InputModelParameters);
        assert_eq!(m.state(PanelName::SpeciesInfo), Some(PanelState::ACTIVE));
        assert_eq!(m.state(PanelName::SiteInfo), Some(PanelState::LOCKED));
        assert!(!m.run_enabled());
        assert!(m.check_invariants().is_ok());
    }

    #[test]
    fn confirm_opens_successor() {
        let mut m = PanelStateMachine::new(InputMode::InputModelParameters);
        let report = m.confirm_panel(PanelName::SpeciesInfo).unwrap();
        assert_eq!(
            report.after(PanelName::SpeciesInfo),
            Some(PanelState {
                confirmed: true,
                editable: false,
                open: true
            })
        );
        assert_eq!(report.after(PanelName::SiteInfo), Some(PanelState::ACTIVE));
        assert!(!report.run_enabled);
    }

    #[test]
    fn confirm_out_of_order_rejected() {
        let mut m = PanelStateMachine::new(InputMode::InputModelParameters);
        let before = m.snapshot();
        assert_eq!(
            m.confirm_panel(PanelName::StandInfo),
            Err(StateMachineError::PanelNotEditable {
                panel: PanelName::StandInfo
            })
        );
        assert_eq!(m.snapshot(), before);
    }

    #[test]
    fn confirm_twice_rejected_and_edit_active_is_noop() {
        let mut m = PanelStateMachine::new(InputMode::InputModelParameters);
        m.confirm_panel(PanelName::SpeciesInfo).unwrap();
        let before = m.snapshot();
        assert_eq!(
            m.confirm_panel(PanelName::SpeciesInfo),
            Err(StateMachineError::PanelNotEditable {
                panel: PanelName::SpeciesInfo
            })
        );
        assert!(m.edit_panel(PanelName::SiteInfo).unwrap().is_noop());
        assert_eq!(m.snapshot(), before);
    }

    #[test]
    fn all_confirmed_enables_run() {
        let mut m = PanelStateMachine::new(InputMode::InputModelParameters);
        for p in [
            PanelName::SpeciesInfo,
            PanelName::SiteInfo,
            PanelName::StandInfo,
            PanelName::ReportInfo,
        ] {
            m.confirm_panel(p).unwrap();
        }
        assert!(m.run_enabled());
    }

    #[test]
    fn edit_resets_later_panels() {
        let mut m = PanelStateMachine::new(InputMode::InputModelParameters);
        m.confirm_panel(PanelName::SpeciesInfo).unwrap();
        m.confirm_panel(PanelName::SiteInfo).unwrap();
        m.confirm_panel(PanelName::StandInfo).unwrap();

        let report = m.edit_panel(PanelName::SiteInfo).unwrap();
        assert!(!report.run_enabled);
        assert_eq!(m.state(PanelName::SiteInfo), Some(PanelState::ACTIVE));
        assert_eq!(m.state(PanelName::StandInfo), Some(PanelState::LOCKED));
        assert_eq!(m.state(PanelName::ReportInfo), Some(PanelState::LOCKED));
        assert!(m.state(PanelName::SpeciesInfo).unwrap().confirmed);
    }

    #[test]
    fn edit_locked_panel_needs_predecessor() {
        let mut m = PanelStateMachine::new(InputMode::InputModelParameters);
        assert_eq!(
            m.edit_panel(PanelName::StandInfo),
            Err(StateMachineError::PredecessorNotConfirmed {
                panel: PanelName::StandInfo,
                predecessor: PanelName::SiteInfo
            })
        );
    }

    #[test]
    fn file_upload_needs_files() {
        let mut m = PanelStateMachine::new(InputMode::FileUpload);
        let report = m.confirm_panel(PanelName::ReportInfo).unwrap();
        assert_eq!(report.after(PanelName::Attachments), Some(PanelState::ACTIVE));
        assert!(!m.run_enabled());

        m.attach_file(FileKind::Polygon, Some(FileReference::new("poly.csv"))).unwrap();
        assert!(!m.run_enabled());
        let report = m.attach_file(FileKind::Layer, Some(FileReference::new("layer.csv"))).unwrap();
        assert!(report.run_enabled);

        m.edit_panel(PanelName::ReportInfo).unwrap();
        assert_eq!(m.state(PanelName::Attachments), Some(PanelState::LOCKED));
        assert!(!m.run_enabled());
    }

    #[test]
    fn unknown_panel_rejected() {
        let mut m = PanelStateMachine::new(InputMode::FileUpload);
        assert!(matches!(
            m.confirm_panel(PanelName::SpeciesInfo),
            Err(StateMachineError::UnknownPanel { .. })
        ));
    }

    #[test]
    fn frozen_rejects_transitions() {
        let mut m = PanelStateMachine::new(InputMode::InputModelParameters);
        m.freeze().unwrap();
        let err = m.confirm_panel(PanelName::SpeciesInfo).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(m.freeze(), Err(StateMachineError::TransitionInProgress));
        m.unfreeze();
        assert!(m.confirm_panel(PanelName::SpeciesInfo).is_ok());
    }

    #[test]
    fn restore_validates_invariants() {
        let mut m = PanelStateMachine::new(InputMode::InputModelParameters);
        let mut bad = IndexMap::new();
        bad.insert(PanelName::SiteInfo, PanelState::ACTIVE);
        assert!(matches!(m.restore(&bad), Err(StateMachineError::InvariantViolated(_))));
        assert_eq!(m.state(PanelName::SpeciesInfo), Some(PanelState::ACTIVE));

        let mut good = IndexMap::new();
        good.insert(PanelName::SpeciesInfo, PanelState::VIEWED);
        good.insert(PanelName::SiteInfo, PanelState::ACTIVE);
        assert!(m.restore(&good).is_ok());
        assert_eq!(m.status(PanelName::SiteInfo), Some(PanelStatus::Active));
    }

    #[test]
    fn view_mode_marks_everything() {
        let mut m = PanelStateMachine::new(InputMode::InputModelParameters);
        m.mark_all_confirmed().unwrap();
        assert!(m.run_enabled());
        assert!(m.snapshot().values().all(|s| *s == PanelState::VIEWED));
    }

    #[test]
    fn observers_see_committed_transitions() {
        let log = Arc::new(TransitionLog::new());
        let mut m = PanelStateMachine::new(InputMode::InputModelParameters);
        m.subscribe(log.clone());

        m.confirm_panel(PanelName::SpeciesInfo).unwrap();
        let _ = m.confirm_panel(PanelName::StandInfo);
        assert_eq!(log.len(), 1);
        assert_eq!(log.reports()[0].changes.len(), 2);
    }
}

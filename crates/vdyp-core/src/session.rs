//! Projection session facade
//!
//! [`ProjectionSession`] owns the panel state machine, the input state of
//! the active workflow and the uploads, and drives the projection service.
//! Panel confirmation runs the matching validator first; blocking findings
//! are returned to the caller and leave the panels untouched.
//!
//! A run freezes the state machine while the payload is in flight, so
//! confirm, edit, reset and a second run are all rejected until the
//! service call returns.

use crate::config::SessionConfig;
use crate::error::{CoreError, ServiceError};
use crate::restore::{RestoredSession, SavedProjection};
use crate::service::{ProjectionHandle, ProjectionId, ProjectionService, UploadedFile};
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use vdyp_panels::{
    FileReference, InputMode, PanelName, PanelObserver, PanelState, PanelStateMachine, StateMachineError,
    TransitionReport,
};
use vdyp_params::{
    build_csv_records, build_projection_parameters, generate_synthetic_identifiers, CsvRecords, FileUploadSpeciesGroup,
    FileUploadState, ModelParameterState, ProjectionInputs, ProjectionParameters, ReportInfo,
};
use vdyp_tables::FileKind;
use vdyp_validation::{
    Finding, FileUploadValidator, ReportInput, ReportValidator, SiteInput, SiteValidator, SpeciesSlot,
    SpeciesValidator, StandInput, StandValidator,
};

/// Input state of the active workflow
#[derive(Debug, Clone, PartialEq)]
pub enum SessionInput {
    /// Manual-entry panels
    Manual(ModelParameterState),
    /// File-upload report settings
    FileUpload(FileUploadState),
}

impl SessionInput {
    /// Workflow of this input
    #[must_use]
    pub fn mode(&self) -> InputMode {
        match self {
            Self::Manual(_) => InputMode::InputModelParameters,
            Self::FileUpload(_) => InputMode::FileUpload,
        }
    }

    /// Report panel settings
    #[must_use]
    pub fn report(&self) -> &ReportInfo {
        match self {
            Self::Manual(state) => &state.report,
            Self::FileUpload(state) => &state.report,
        }
    }

    fn inputs(&self) -> &dyn ProjectionInputs {
        match self {
            Self::Manual(state) => state as &dyn ProjectionInputs,
            Self::FileUpload(state) => state as &dyn ProjectionInputs,
        }
    }

    fn empty(mode: InputMode) -> Self {
        match mode {
            InputMode::InputModelParameters => Self::Manual(ModelParameterState::new()),
            InputMode::FileUpload => Self::FileUpload(FileUploadState::new()),
        }
    }
}

/// Findings of one panel, split by severity
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelValidation {
    /// Findings that prevent confirmation
    pub blocking: Vec<Finding>,
    /// Warnings the user may accept
    pub advisories: Vec<Finding>,
}

impl PanelValidation {
    /// Check if confirmation is refused
    #[inline]
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        !self.blocking.is_empty()
    }

    fn blocking(err: &vdyp_validation::ValidationError) -> Self {
        Self {
            blocking: vec![Finding::from(err)],
            advisories: Vec::new(),
        }
    }
}

/// Result of a confirm request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum ConfirmOutcome {
    /// Panel confirmed; advisories were accepted
    Confirmed {
        /// Applied transition
        report: TransitionReport,
        /// Accepted warnings
        advisories: Vec<Finding>,
    },
    /// Validation refused the panel
    Blocked(PanelValidation),
}

impl ConfirmOutcome {
    /// Check if the panel was confirmed
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

/// Parameters plus the generated CSV records of the manual workflow
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    /// Projection parameters
    pub parameters: ProjectionParameters,
    /// Polygon and layer records, manual workflow only
    pub records: Option<CsvRecords>,
}

#[derive(Debug)]
struct SessionState {
    machine: PanelStateMachine,
    input: SessionInput,
    uploads: HashMap<FileKind, UploadedFile>,
    projection_id: Option<ProjectionId>,
}

/// One projection being entered, run and fetched
pub struct ProjectionSession {
    inner: Mutex<SessionState>,
    service: Arc<dyn ProjectionService>,
    config: SessionConfig,
}

impl std::fmt::Debug for ProjectionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectionSession")
            .field("inner", &*self.inner.lock())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ProjectionSession {
    /// Session in the initial panel configuration of `input`'s workflow
    pub fn new(input: SessionInput, service: Arc<dyn ProjectionService>, config: SessionConfig) -> Self {
        let machine = PanelStateMachine::new(input.mode());
        info!(mode = %input.mode(), "projection session created");
        Self {
            inner: Mutex::new(SessionState {
                machine,
                input,
                uploads: HashMap::new(),
                projection_id: None,
            }),
            service,
            config,
        }
    }

    /// Manual-entry session
    pub fn manual(state: ModelParameterState, service: Arc<dyn ProjectionService>, config: SessionConfig) -> Self {
        Self::new(SessionInput::Manual(state), service, config)
    }

    /// File-upload session
    pub fn file_upload(state: FileUploadState, service: Arc<dyn ProjectionService>, config: SessionConfig) -> Self {
        Self::new(SessionInput::FileUpload(state), service, config)
    }

    /// Session rebuilt from a restored projection
    ///
    /// # Errors
    ///
    /// Fails when the restored panel flags break the panel invariants.
    pub fn from_restored(
        restored: RestoredSession,
        service: Arc<dyn ProjectionService>,
        config: SessionConfig,
    ) -> Result<Self, CoreError> {
        let input = match restored.mode {
            InputMode::InputModelParameters => {
                let mut state = restored.model_parameters.unwrap_or_default();
                state.report = restored.report;
                SessionInput::Manual(state)
            }
            InputMode::FileUpload => {
                let mut state = FileUploadState::new();
                state.set_default_values();
                state.report = restored.report;
                if !restored.utils.is_empty() {
                    state.species_groups = restored
                        .utils
                        .iter()
                        .map(|u| FileUploadSpeciesGroup {
                            group: u.species_name.clone(),
                            minimum_dbh_limit: u.utilization_class,
                        })
                        .collect();
                }
                SessionInput::FileUpload(state)
            }
        };
        let session = Self::new(input, service, config);
        session.inner.lock().machine.restore(&restored.panel_states)?;
        Ok(session)
    }

    /// Session configuration
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Workflow
    #[must_use]
    pub fn mode(&self) -> InputMode {
        self.inner.lock().machine.mode()
    }

    /// Check if every panel and file needed for a run is in place
    #[must_use]
    pub fn run_enabled(&self) -> bool {
        self.inner.lock().machine.run_enabled()
    }

    /// Current panel flags
    #[must_use]
    pub fn panel_states(&self) -> IndexMap<PanelName, PanelState> {
        self.inner.lock().machine.snapshot()
    }

    /// State of one panel
    #[must_use]
    pub fn panel_state(&self, panel: PanelName) -> Option<PanelState> {
        self.inner.lock().machine.state(panel)
    }

    /// Projection created by the last run
    #[must_use]
    pub fn projection_id(&self) -> Option<ProjectionId> {
        self.inner.lock().projection_id
    }

    /// Copy of the current input state
    #[must_use]
    pub fn input(&self) -> SessionInput {
        self.inner.lock().input.clone()
    }

    /// Register a panel transition observer
    pub fn subscribe(&self, observer: Arc<dyn PanelObserver>) {
        self.inner.lock().machine.subscribe(observer);
    }

    /// Change the manual-entry state
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::WrongMode`] in a file-upload session.
    pub fn with_manual_state<R>(&self, f: impl FnOnce(&mut ModelParameterState) -> R) -> Result<R, CoreError> {
        match &mut self.inner.lock().input {
            SessionInput::Manual(state) => Ok(f(state)),
            SessionInput::FileUpload(_) => Err(CoreError::WrongMode {
                expected: InputMode::InputModelParameters,
            }),
        }
    }

    /// Change the file-upload state
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::WrongMode`] in a manual-entry session.
    pub fn with_file_upload_state<R>(&self, f: impl FnOnce(&mut FileUploadState) -> R) -> Result<R, CoreError> {
        match &mut self.inner.lock().input {
            SessionInput::FileUpload(state) => Ok(f(state)),
            SessionInput::Manual(_) => Err(CoreError::WrongMode {
                expected: InputMode::FileUpload,
            }),
        }
    }

    /// Run the validator of a panel against the current input
    #[must_use]
    pub fn validate_panel(&self, panel: PanelName) -> PanelValidation {
        let inner = self.inner.lock();
        validate(&inner, panel)
    }

    /// Validate and confirm a panel
    ///
    /// Advisories are accepted unless the session's advisory policy says
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Fails when the state machine refuses the transition.
    #[instrument(skip(self))]
    pub fn confirm(&self, panel: PanelName) -> Result<ConfirmOutcome, CoreError> {
        let mut inner = self.inner.lock();
        if inner.machine.is_frozen() {
            warn!(%panel, "confirm rejected while a run is in flight");
            return Err(StateMachineError::TransitionInProgress.into());
        }
        if panel == PanelName::SpeciesInfo {
            if let SessionInput::Manual(state) = &mut inner.input {
                state.recompute_species_groups();
            }
        }

        let validation = validate(&inner, panel);
        if validation.is_blocked() || (self.config.advisory_policy.blocks() && !validation.advisories.is_empty()) {
            debug!(
                %panel,
                blocking = validation.blocking.len(),
                advisories = validation.advisories.len(),
                "confirm refused"
            );
            return Ok(ConfirmOutcome::Blocked(validation));
        }
        if !validation.advisories.is_empty() {
            warn!(%panel, count = validation.advisories.len(), "confirming with advisories");
        }

        let report = inner.machine.confirm_panel(panel)?;
        Ok(ConfirmOutcome::Confirmed {
            report,
            advisories: validation.advisories,
        })
    }

    /// Reopen a panel for editing
    ///
    /// # Errors
    ///
    /// Fails when the state machine refuses the transition.
    pub fn edit(&self, panel: PanelName) -> Result<TransitionReport, CoreError> {
        Ok(self.inner.lock().machine.edit_panel(panel)?)
    }

    /// Return to the initial panels with empty input
    ///
    /// # Errors
    ///
    /// Fails while a run is in flight.
    pub fn reset(&self) -> Result<TransitionReport, CoreError> {
        let mut inner = self.inner.lock();
        let report = inner.machine.reset()?;
        let mode = inner.machine.mode();
        inner.input = SessionInput::empty(mode);
        inner.uploads.clear();
        inner.projection_id = None;
        info!(%mode, "session reset");
        Ok(report)
    }

    /// Attach a polygon or layer file
    ///
    /// The header line is checked first; a mismatching file is not
    /// attached and its findings are returned.
    ///
    /// # Errors
    ///
    /// Fails outside the file-upload workflow or while a run is in flight.
    pub fn attach_file(
        &self,
        kind: FileKind,
        file_name: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Result<Vec<Finding>, CoreError> {
        let mut inner = self.inner.lock();
        if inner.machine.mode() != InputMode::FileUpload {
            return Err(CoreError::WrongMode {
                expected: InputMode::FileUpload,
            });
        }
        let file = UploadedFile::new(kind, file_name, content);
        if let Err(err) = FileUploadValidator::new().validate_header(kind, &file.header_line()) {
            debug!(%kind, file = %file.file_name, "rejected upload header");
            return Ok(vec![Finding::from(&err)]);
        }
        inner.machine.attach_file(kind, Some(FileReference::new(file.file_name.clone())))?;
        inner.uploads.insert(kind, file);
        Ok(Vec::new())
    }

    /// Drop an attached file
    ///
    /// # Errors
    ///
    /// Fails while a run is in flight.
    pub fn detach_file(&self, kind: FileKind) -> Result<TransitionReport, CoreError> {
        let mut inner = self.inner.lock();
        let report = inner.machine.attach_file(kind, None)?;
        inner.uploads.remove(&kind);
        Ok(report)
    }

    /// Build the payload for the current input
    ///
    /// # Errors
    ///
    /// Fails only if identifier generation fails.
    pub fn build_payload(&self) -> Result<Payload, CoreError> {
        let inner = self.inner.lock();
        self.payload(&inner.input)
    }

    /// Payload, stand values and panel flags in the persisted layout
    #[must_use]
    pub fn save(&self) -> SavedProjection {
        let inner = self.inner.lock();
        let parameters = build_projection_parameters(inner.input.inputs(), &self.config.projection);
        let saved = SavedProjection::new(parameters)
            .with_panel_states(inner.machine.snapshot())
            .with_input_mode(inner.machine.mode())
            .with_age_year_range(inner.input.report().selected_age_year_range);
        match &inner.input {
            SessionInput::Manual(state) => saved.with_model_parameters(state.clone()),
            SessionInput::FileUpload(_) => saved,
        }
    }

    /// Submit the projection
    ///
    /// Creates the projection, uploads the polygon and layer files
    /// (generated in the manual workflow, attached in the upload
    /// workflow) and starts the run.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RunNotEnabled`] while a panel or file is
    /// outstanding, a state machine error while another run is in flight,
    /// or the service failure.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<ProjectionHandle, CoreError> {
        let (payload, uploads, description) = {
            let mut inner = self.inner.lock();
            inner.machine.freeze()?;
            match self.prepare_run(&inner) {
                Ok(prepared) => prepared,
                Err(err) => {
                    inner.machine.unfreeze();
                    return Err(err);
                }
            }
        };

        let result = self.submit(&payload.parameters, uploads, description).await;

        let mut inner = self.inner.lock();
        inner.machine.unfreeze();
        match &result {
            Ok(handle) => {
                inner.projection_id = Some(handle.id);
                info!(id = %handle.id, "projection submitted");
            }
            Err(err) => warn!(error = %err, "projection run failed"),
        }
        result
    }

    /// Result archive of the last run
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::MissingGuid`] before any successful run.
    pub async fn fetch_results(&self) -> Result<Vec<u8>, CoreError> {
        let id = self.projection_id().ok_or(ServiceError::MissingGuid)?;
        Ok(self.service.fetch_results(id).await?)
    }

    fn prepare_run(
        &self,
        inner: &SessionState,
    ) -> Result<(Payload, [UploadedFile; 2], Option<String>), CoreError> {
        if !inner.machine.run_enabled() {
            return Err(CoreError::RunNotEnabled);
        }
        let payload = self.payload(&inner.input)?;
        let uploads = match &payload.records {
            Some(records) => [
                UploadedFile::new(
                    FileKind::Polygon,
                    FileKind::Polygon.generated_file_name(),
                    records.polygon.clone(),
                ),
                UploadedFile::new(FileKind::Layer, FileKind::Layer.generated_file_name(), records.layer.clone()),
            ],
            None => {
                let take = |kind| {
                    inner
                        .uploads
                        .get(&kind)
                        .cloned()
                        .ok_or(CoreError::Service(ServiceError::MissingFile { kind }))
                };
                [take(FileKind::Polygon)?, take(FileKind::Layer)?]
            }
        };
        let description = inner.input.report().report_description.clone();
        Ok((payload, uploads, description))
    }

    async fn submit(
        &self,
        parameters: &ProjectionParameters,
        uploads: [UploadedFile; 2],
        description: Option<String>,
    ) -> Result<ProjectionHandle, CoreError> {
        let id = self.service.create_projection(parameters, description).await?;
        let [polygon, layer] = uploads;
        futures::try_join!(self.service.upload_file(id, polygon), self.service.upload_file(id, layer))?;
        Ok(self.service.run_projection(id).await?)
    }

    fn payload(&self, input: &SessionInput) -> Result<Payload, CoreError> {
        let parameters = build_projection_parameters(input.inputs(), &self.config.projection);
        let records = match input {
            SessionInput::Manual(state) => {
                let identifiers = generate_synthetic_identifiers(&mut rand::rng())?;
                Some(build_csv_records(state, &self.config.projection, identifiers))
            }
            SessionInput::FileUpload(_) => None,
        };
        Ok(Payload { parameters, records })
    }
}

fn validate(inner: &SessionState, panel: PanelName) -> PanelValidation {
    match (&inner.input, panel) {
        (SessionInput::Manual(state), PanelName::SpeciesInfo) => {
            let slots: Vec<SpeciesSlot<'_>> = state
                .species_list
                .iter()
                .map(|e| SpeciesSlot::new(e.species.as_deref(), e.percent.as_deref()))
                .collect();
            SpeciesValidator::new()
                .validate(state.derived_by, &slots)
                .map_or_else(|e| PanelValidation::blocking(&e), |()| PanelValidation::default())
        }
        (SessionInput::Manual(state), PanelName::SiteInfo) => SiteValidator::new()
            .validate(&SiteInput {
                site_species_values: state.site_species_values,
                bec_zone: state.bec_zone.as_deref(),
                site_species: state.selected_site_species.as_deref(),
                age: state.spz_age.as_deref(),
                height: state.spz_height.as_deref(),
                site_index: state.bha50_site_index.as_deref(),
            })
            .map_or_else(|e| PanelValidation::blocking(&e), |()| PanelValidation::default()),
        (SessionInput::Manual(state), PanelName::StandInfo) => {
            let result = StandValidator::new().validate(&StandInput {
                species: state.highest_percent_species.as_deref(),
                bec_zone: state.bec_zone.as_deref(),
                height: state.spz_height.as_deref(),
                percent_stockable_area: state.percent_stockable_area.as_deref(),
                basal_area: state.basal_area.as_deref(),
                trees_per_hectare: state.trees_per_hectare.as_deref(),
                crown_closure: state.crown_closure.as_deref(),
                min_dbh_limit: state.minimum_dbh_limit.map(|u| u.label()),
            });
            PanelValidation {
                blocking: result.blocking.iter().map(Finding::from).collect(),
                advisories: result.advisories.iter().map(Finding::from).collect(),
            }
        }
        (input, PanelName::ReportInfo) => {
            let report = input.report();
            ReportValidator::new()
                .validate(&ReportInput {
                    range: report.selected_age_year_range,
                    starting_age: report.starting_age.as_deref(),
                    finishing_age: report.finishing_age.as_deref(),
                    age_increment: report.age_increment.as_deref(),
                    start_year: report.start_year.as_deref(),
                    end_year: report.end_year.as_deref(),
                    year_increment: report.year_increment.as_deref(),
                    report_title: report.report_title.as_deref(),
                    projection_type: report.projection_type,
                })
                .map_or_else(|e| PanelValidation::blocking(&e), |()| PanelValidation::default())
        }
        (SessionInput::FileUpload(_), PanelName::Attachments) => {
            let files = inner.machine.files();
            FileUploadValidator::new()
                .validate_files(
                    files.polygon.as_ref().map(|f| f.file_name.as_str()),
                    files.layer.as_ref().map(|f| f.file_name.as_str()),
                )
                .map_or_else(|e| PanelValidation::blocking(&e), |()| PanelValidation::default())
        }
        // panels outside the workflow are refused by the state machine
        _ => PanelValidation::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{MockProjectionService, ProjectionStatus};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn confirm_all(session: &ProjectionSession) {
        for panel in [
            PanelName::SpeciesInfo,
            PanelName::SiteInfo,
            PanelName::StandInfo,
            PanelName::ReportInfo,
        ] {
            assert!(session.confirm(panel).unwrap().is_confirmed(), "{panel} not confirmed");
        }
    }

    #[tokio::test]
    async fn manual_run_uploads_generated_csv() {
        let mut mock = MockProjectionService::new();
        let id = ProjectionId::new_v4();
        mock.expect_create_projection().times(1).returning(move |_, _| Ok(id));
        mock.expect_upload_file()
            .times(2)
            .withf(|_, file| file.file_name.starts_with("VDYP7_INPUT_"))
            .returning(|_, _| Ok(()));
        mock.expect_run_projection().times(1).returning(|id| {
            Ok(ProjectionHandle {
                id,
                status: ProjectionStatus::Running,
                submitted_at: Utc::now(),
            })
        });

        let session = ProjectionSession::manual(
            ModelParameterState::with_default_values(),
            Arc::new(mock),
            SessionConfig::default(),
        );
        confirm_all(&session);
        let handle = session.run().await.unwrap();
        assert_eq!(handle.id, id);
        assert_eq!(session.projection_id(), Some(id));
    }

    #[tokio::test]
    async fn run_before_confirm_is_refused() {
        let mut mock = MockProjectionService::new();
        mock.expect_create_projection().never();
        let session = ProjectionSession::manual(
            ModelParameterState::with_default_values(),
            Arc::new(mock),
            SessionConfig::default(),
        );
        assert!(matches!(session.run().await, Err(CoreError::RunNotEnabled)));
        // the failed run must not leave the machine frozen
        assert!(session.confirm(PanelName::SpeciesInfo).unwrap().is_confirmed());
    }

    #[tokio::test]
    async fn service_failure_unfreezes() {
        let mut mock = MockProjectionService::new();
        mock.expect_create_projection()
            .returning(|_, _| Err(ServiceError::Transport("connection reset".into())));
        let session = ProjectionSession::manual(
            ModelParameterState::with_default_values(),
            Arc::new(mock),
            SessionConfig::default(),
        );
        confirm_all(&session);
        let err = session.run().await.unwrap_err();
        assert!(err.is_retryable());
        assert!(session.edit(PanelName::ReportInfo).is_ok());
    }

    #[test]
    fn blocked_species_leaves_panels_alone() {
        let mut state = ModelParameterState::with_default_values();
        state.species_list[3].percent = Some("5".into());
        let session = ProjectionSession::manual(
            state,
            Arc::new(MockProjectionService::new()),
            SessionConfig::default(),
        );
        let before = session.panel_states();
        let outcome = session.confirm(PanelName::SpeciesInfo).unwrap();
        let ConfirmOutcome::Blocked(validation) = outcome else {
            panic!("expected blocked outcome");
        };
        assert_eq!(validation.blocking.len(), 1);
        assert_eq!(session.panel_states(), before);
    }

    #[test]
    fn wrong_mode_accessors() {
        let session = ProjectionSession::manual(
            ModelParameterState::new(),
            Arc::new(MockProjectionService::new()),
            SessionConfig::default(),
        );
        assert!(matches!(
            session.with_file_upload_state(|_| ()),
            Err(CoreError::WrongMode {
                expected: InputMode::FileUpload
            })
        ));
        assert!(matches!(
            session.attach_file(FileKind::Polygon, "p.csv", Vec::new()),
            Err(CoreError::WrongMode { .. })
        ));
    }
}

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;
use tokio::sync::Notify;
use vdyp_core::prelude::*;
use vdyp_core::{
    AdvisoryPolicy, ProjectionHandle, ProjectionId, RangeSelection, UploadedFile,
};
use vdyp_panels::{StateMachineError, TransitionLog};
use vdyp_params::{total_species_percent, ProjectionParameters, ReportInfo, SpeciesEntry};
use vdyp_tables::{AgeYearRange, FileKind};
use vdyp_test_utils::{
    complete_file_upload, confirm_manual_panels, file_upload_session, in_memory_service, manual_session,
    sample_upload, MANUAL_PANELS,
};

#[tokio::test]
async fn manual_session_end_to_end() {
    let service = in_memory_service();
    let session = manual_session(service.clone());
    let log = Arc::new(TransitionLog::new());
    session.subscribe(log.clone());

    assert!(!session.run_enabled());
    confirm_manual_panels(&session);
    assert!(session.run_enabled());
    assert_eq!(log.len(), 4);

    let handle = session.run().await.unwrap();
    assert_eq!(
        service.file_names(handle.id),
        vec!["VDYP7_INPUT_LAYER.csv".to_string(), "VDYP7_INPUT_POLY.csv".to_string()]
    );

    let archive = session.fetch_results().await.unwrap();
    let manifest: serde_json::Value = serde_json::from_slice(&archive).unwrap();
    assert_eq!(manifest["parameters"]["ageStart"], 10);
    assert_eq!(manifest["parameters"]["reportTitle"], "Sample Projection Report");
}

#[tokio::test]
async fn file_upload_session_end_to_end() {
    let service = in_memory_service();
    let session = file_upload_session(service.clone());
    assert_eq!(session.mode(), InputMode::FileUpload);

    assert!(session.confirm(PanelName::ReportInfo).unwrap().is_confirmed());
    assert!(!session.run_enabled());
    assert_eq!(session.panel_state(PanelName::Attachments), Some(PanelState::ACTIVE));

    session
        .attach_file(FileKind::Polygon, "stand_poly.csv", sample_upload(FileKind::Polygon))
        .unwrap();
    assert!(!session.run_enabled());
    session
        .attach_file(FileKind::Layer, "stand_layer.csv", sample_upload(FileKind::Layer))
        .unwrap();
    assert!(session.run_enabled());

    let handle = session.run().await.unwrap();
    assert_eq!(
        service.file_names(handle.id),
        vec!["stand_layer.csv".to_string(), "stand_poly.csv".to_string()]
    );
    assert!(session.fetch_results().await.is_ok());
}

#[tokio::test]
async fn bad_header_is_not_attached() {
    let session = file_upload_session(in_memory_service());
    complete_file_upload(&session);
    session.detach_file(FileKind::Layer).unwrap();

    let findings = session
        .attach_file(FileKind::Layer, "layer.csv", "FEATURE_ID,SOMETHING_ELSE\n1,2\n")
        .unwrap();
    assert_eq!(findings.len(), 1);
    assert!(findings[0].blocking);
    assert!(!session.run_enabled());
    assert!(matches!(session.run().await, Err(CoreError::RunNotEnabled)));
}

#[tokio::test]
async fn fetch_without_run_reports_missing_guid() {
    let session = manual_session(in_memory_service());
    let err = session.fetch_results().await.unwrap_err();
    assert!(matches!(err, CoreError::Service(ServiceError::MissingGuid)));
    assert_eq!(err.to_string(), "service error: projection guid is missing");
}

#[tokio::test]
async fn edit_after_confirm_disables_run() {
    let session = manual_session(in_memory_service());
    confirm_manual_panels(&session);
    session.edit(PanelName::SiteInfo).unwrap();

    assert!(!session.run_enabled());
    assert_eq!(session.panel_state(PanelName::SiteInfo), Some(PanelState::ACTIVE));
    for later in [PanelName::StandInfo, PanelName::ReportInfo] {
        assert_eq!(session.panel_state(later), Some(PanelState::LOCKED));
    }
}

#[test]
fn reset_restores_initial_panels_and_empty_input() {
    let session = manual_session(in_memory_service());
    confirm_manual_panels(&session);
    session.reset().unwrap();

    assert_eq!(session.panel_state(PanelName::SpeciesInfo), Some(PanelState::ACTIVE));
    assert!(!session.run_enabled());
    let species = session.with_manual_state(|s| s.species_list.clone()).unwrap();
    assert!(species.iter().all(SpeciesEntry::is_empty));
}

fn low_diameter_stand(session: &ProjectionSession) {
    session
        .with_manual_state(|s| {
            s.basal_area = Some("4".into());
            s.trees_per_hectare = Some("1000".into());
        })
        .unwrap();
}

#[test]
fn advisories_do_not_block_by_default() {
    let session = manual_session(in_memory_service());
    low_diameter_stand(&session);
    for panel in [PanelName::SpeciesInfo, PanelName::SiteInfo] {
        assert!(session.confirm(panel).unwrap().is_confirmed());
    }
    match session.confirm(PanelName::StandInfo).unwrap() {
        ConfirmOutcome::Confirmed { advisories, .. } => assert!(!advisories.is_empty()),
        ConfirmOutcome::Blocked(v) => panic!("unexpected block: {:?}", v.blocking),
    }
}

#[test]
fn block_policy_refuses_advisories() {
    let config = SessionConfig::default().with_advisory_policy(AdvisoryPolicy::Block);
    let session = ProjectionSession::manual(ModelParameterState::with_default_values(), in_memory_service(), config);
    low_diameter_stand(&session);
    for panel in [PanelName::SpeciesInfo, PanelName::SiteInfo] {
        assert!(session.confirm(panel).unwrap().is_confirmed());
    }
    let ConfirmOutcome::Blocked(validation) = session.confirm(PanelName::StandInfo).unwrap() else {
        panic!("expected block");
    };
    assert!(validation.blocking.is_empty());
    assert!(!validation.advisories.is_empty());
    assert_eq!(session.panel_state(PanelName::StandInfo), Some(PanelState::ACTIVE));
}

/// Service that parks `create_projection` until released
struct GatedService {
    inner: InMemoryProjectionService,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl ProjectionService for GatedService {
    async fn create_projection(
        &self,
        parameters: &ProjectionParameters,
        description: Option<String>,
    ) -> Result<ProjectionId, ServiceError> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.create_projection(parameters, description).await
    }

    async fn upload_file(&self, id: ProjectionId, file: UploadedFile) -> Result<(), ServiceError> {
        self.inner.upload_file(id, file).await
    }

    async fn run_projection(&self, id: ProjectionId) -> Result<ProjectionHandle, ServiceError> {
        self.inner.run_projection(id).await
    }

    async fn fetch_results(&self, id: ProjectionId) -> Result<Vec<u8>, ServiceError> {
        self.inner.fetch_results(id).await
    }
}

#[tokio::test]
async fn transitions_rejected_while_run_in_flight() {
    let gate = Arc::new(GatedService {
        inner: InMemoryProjectionService::new(),
        entered: Notify::new(),
        release: Notify::new(),
    });
    let session = Arc::new(ProjectionSession::manual(
        ModelParameterState::with_default_values(),
        gate.clone(),
        SessionConfig::default(),
    ));
    confirm_manual_panels(&session);

    let running = tokio::spawn({
        let session = session.clone();
        async move { session.run().await }
    });
    gate.entered.notified().await;

    let before = session.panel_states();
    for result in [session.edit(PanelName::SpeciesInfo), session.reset()] {
        let err = result.unwrap_err();
        assert!(matches!(err, CoreError::StateMachine(StateMachineError::TransitionInProgress)));
        assert!(err.is_retryable());
    }
    assert!(matches!(
        session.confirm(PanelName::ReportInfo),
        Err(CoreError::StateMachine(StateMachineError::TransitionInProgress))
    ));
    assert!(matches!(
        session.run().await,
        Err(CoreError::StateMachine(StateMachineError::TransitionInProgress))
    ));
    assert_eq!(session.panel_states(), before);

    gate.release.notify_one();
    let handle = running.await.unwrap().unwrap();
    assert_eq!(session.projection_id(), Some(handle.id));
    assert!(session.edit(PanelName::ReportInfo).is_ok());
}

#[test]
fn restored_copy_keeps_provenance() {
    let session = manual_session(in_memory_service());
    confirm_manual_panels(&session);
    let saved = session.save().with_copy_title("Stand 42");

    let restored = restore_session(&saved, false);
    assert_eq!(restored.provenance.map(|p| p.original_name), Some("Stand 42".to_string()));
    assert!(!restored.used_heuristic);
}

#[tokio::test]
async fn restored_manual_session_keeps_stand_values() {
    let session = manual_session(in_memory_service());
    session
        .with_manual_state(|s| s.species_list[0] = SpeciesEntry::new("PL", "40.0"))
        .unwrap();
    session
        .with_manual_state(|s| s.species_list[3] = SpeciesEntry::default())
        .unwrap();
    confirm_manual_panels(&session);

    let json = session.save().to_json().unwrap();
    let restored = restore_session(&SavedProjection::from_json(&json).unwrap(), false);
    let rebuilt = ProjectionSession::from_restored(restored, in_memory_service(), SessionConfig::default()).unwrap();
    assert!(rebuilt.run_enabled());

    let state = rebuilt.with_manual_state(|s| s.clone()).unwrap();
    assert_eq!(state.species_list[0], SpeciesEntry::new("PL", "40.0"));
    assert_eq!(state.bec_zone.as_deref(), Some("IDF"));
    assert_eq!(state.spz_age.as_deref(), Some("60"));

    let records = rebuilt.build_payload().unwrap().records.unwrap();
    assert!(records.layer.contains(",PL,40,AC,30,H,30,"));
    assert!(rebuilt.run().await.is_ok());
}

#[test]
fn displayed_total_agrees_with_species_confirm() {
    let session = manual_session(in_memory_service());
    let total = session
        .with_manual_state(|s| {
            s.species_list = vec![SpeciesEntry::new("PL", "33.33"), SpeciesEntry::new("AC", "66.66")];
            s.species_list.resize(6, SpeciesEntry::default());
            total_species_percent(&s.species_list)
        })
        .unwrap();
    assert_eq!(total, "99.9");
    let ConfirmOutcome::Blocked(validation) = session.confirm(PanelName::SpeciesInfo).unwrap() else {
        panic!("expected block");
    };
    assert_eq!(validation.blocking[0].error_type, "totalPercent");
}

fn without_report(mut state: ModelParameterState) -> ModelParameterState {
    state.report = ReportInfo::default();
    state
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Tenet: saving and restoring a session keeps its panel flags and range discriminator.
    #[test]
    fn prop_save_restore_round_trip(year in any::<bool>(), confirmed in 0usize..=4) {
        let session = manual_session(in_memory_service());
        session
            .with_manual_state(|s| {
                s.report.selected_age_year_range = if year { AgeYearRange::Year } else { AgeYearRange::Age };
            })
            .unwrap();
        for panel in MANUAL_PANELS.iter().take(confirmed) {
            prop_assert!(session.confirm(*panel).unwrap().is_confirmed());
        }

        let json = session.save().to_json().unwrap();
        let saved = SavedProjection::from_json(&json).unwrap();
        let restored = restore_session(&saved, false);
        prop_assert_eq!(restored.range, if year { RangeSelection::Year } else { RangeSelection::Age });

        let rebuilt = ProjectionSession::from_restored(restored, in_memory_service(), SessionConfig::default()).unwrap();
        prop_assert_eq!(rebuilt.panel_states(), session.panel_states());
        prop_assert_eq!(rebuilt.run_enabled(), confirmed == 4);
        let range = rebuilt.with_manual_state(|s| s.report.selected_age_year_range).unwrap();
        prop_assert_eq!(range, if year { AgeYearRange::Year } else { AgeYearRange::Age });

        let original = session.with_manual_state(|s| s.clone()).unwrap();
        let stand = rebuilt.with_manual_state(|s| s.clone()).unwrap();
        prop_assert_eq!(without_report(stand), without_report(original));
    }
}

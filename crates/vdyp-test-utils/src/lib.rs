//! Testing utilities for the VDYP projection input workspace
//!
//! Shared fixtures: demonstration input, well-formed upload files and
//! sessions already walked through their panels.

#![allow(missing_docs)]

use std::sync::Arc;
use vdyp_core::{ConfirmOutcome, InMemoryProjectionService, ProjectionSession, SessionConfig};
use vdyp_panels::PanelName;
use vdyp_params::{FileUploadState, ModelParameterState};
use vdyp_tables::csv_layout::{LAYER_HEADERS, POLYGON_HEADERS};
use vdyp_tables::FileKind;

pub const MANUAL_PANELS: [PanelName; 4] = [
    PanelName::SpeciesInfo,
    PanelName::SiteInfo,
    PanelName::StandInfo,
    PanelName::ReportInfo,
];

pub fn demo_manual_state() -> ModelParameterState {
    ModelParameterState::with_default_values()
}

pub fn demo_file_upload_state() -> FileUploadState {
    let mut state = FileUploadState::new();
    state.set_default_values();
    state
}

/// Header line plus one data row with the expected column count
pub fn sample_upload(kind: FileKind) -> String {
    let headers: &[&str] = match kind {
        FileKind::Polygon => &POLYGON_HEADERS,
        FileKind::Layer => &LAYER_HEADERS,
    };
    let row = vec!["1"; headers.len()].join(",");
    format!("{}\n{row}\n", headers.join(","))
}

pub fn in_memory_service() -> Arc<InMemoryProjectionService> {
    Arc::new(InMemoryProjectionService::new())
}

pub fn manual_session(service: Arc<InMemoryProjectionService>) -> ProjectionSession {
    ProjectionSession::manual(demo_manual_state(), service, SessionConfig::default())
}

pub fn file_upload_session(service: Arc<InMemoryProjectionService>) -> ProjectionSession {
    ProjectionSession::file_upload(demo_file_upload_state(), service, SessionConfig::default())
}

/// Confirm every manual panel, panicking on a blocked panel
pub fn confirm_manual_panels(session: &ProjectionSession) {
    for panel in MANUAL_PANELS {
        match session.confirm(panel).expect("confirm") {
            ConfirmOutcome::Confirmed { .. } => {}
            ConfirmOutcome::Blocked(validation) => panic!("{panel} blocked: {:?}", validation.blocking),
        }
    }
}

/// Confirm the report and attach both well-formed uploads
pub fn complete_file_upload(session: &ProjectionSession) {
    assert!(session.confirm(PanelName::ReportInfo).expect("confirm").is_confirmed());
    for kind in [FileKind::Polygon, FileKind::Layer] {
        let findings = session
            .attach_file(kind, kind.generated_file_name(), sample_upload(kind))
            .expect("attach");
        assert!(findings.is_empty(), "{kind} upload rejected: {findings:?}");
    }
}

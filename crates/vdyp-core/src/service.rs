//! Projection service seam
//!
//! The session talks to the projection backend only through
//! [`ProjectionService`]. [`InMemoryProjectionService`] keeps everything in
//! process and backs the tests and the CLI dry run.

use crate::error::ServiceError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;
use vdyp_params::ProjectionParameters;
use vdyp_tables::FileKind;

/// Projection GUID assigned by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectionId(pub Uuid);

impl ProjectionId {
    /// Fresh random id
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ProjectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle of a projection on the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectionStatus {
    /// Created, not yet run
    Draft,
    /// Submitted for execution
    Running,
    /// Results available
    Ready,
}

/// Receipt for a submitted run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionHandle {
    /// Projection GUID
    pub id: ProjectionId,
    /// Status right after submission
    pub status: ProjectionStatus,
    /// Submission time
    pub submitted_at: DateTime<Utc>,
}

/// One input file sent to the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Polygon or layer
    pub kind: FileKind,
    /// File name shown to the user
    pub file_name: String,
    /// Raw content
    pub content: Vec<u8>,
}

impl UploadedFile {
    /// Create upload
    pub fn new(kind: FileKind, file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// First line of the content, for header checks
    #[must_use]
    pub fn header_line(&self) -> String {
        String::from_utf8_lossy(&self.content).lines().next().unwrap_or_default().to_string()
    }
}

/// Backend that stores, runs and returns projections
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectionService: Send + Sync {
    /// Create a projection from parameters
    async fn create_projection(
        &self,
        parameters: &ProjectionParameters,
        description: Option<String>,
    ) -> Result<ProjectionId, ServiceError>;

    /// Attach an input file to a projection
    async fn upload_file(&self, id: ProjectionId, file: UploadedFile) -> Result<(), ServiceError>;

    /// Start a projection
    async fn run_projection(&self, id: ProjectionId) -> Result<ProjectionHandle, ServiceError>;

    /// Result archive of a finished projection
    async fn fetch_results(&self, id: ProjectionId) -> Result<Vec<u8>, ServiceError>;
}

#[derive(Debug)]
struct StoredProjection {
    parameters: ProjectionParameters,
    description: Option<String>,
    files: HashMap<FileKind, UploadedFile>,
    status: ProjectionStatus,
}

/// Projection service kept in process memory
///
/// Runs complete immediately; the result archive is a JSON manifest of
/// the parameters and uploaded files.
#[derive(Debug, Default)]
pub struct InMemoryProjectionService {
    projections: Mutex<HashMap<ProjectionId, StoredProjection>>,
}

impl InMemoryProjectionService {
    /// Create empty service
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored projections
    #[must_use]
    pub fn len(&self) -> usize {
        self.projections.lock().len()
    }

    /// Check if nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projections.lock().is_empty()
    }

    /// Status of a stored projection
    #[must_use]
    pub fn status(&self, id: ProjectionId) -> Option<ProjectionStatus> {
        self.projections.lock().get(&id).map(|p| p.status)
    }

    /// Names of the files uploaded to a projection
    #[must_use]
    pub fn file_names(&self, id: ProjectionId) -> Vec<String> {
        let projections = self.projections.lock();
        let Some(stored) = projections.get(&id) else {
            return Vec::new();
        };
        let mut names: Vec<String> = stored.files.values().map(|f| f.file_name.clone()).collect();
        names.sort();
        names
    }
}

#[async_trait]
impl ProjectionService for InMemoryProjectionService {
    async fn create_projection(
        &self,
        parameters: &ProjectionParameters,
        description: Option<String>,
    ) -> Result<ProjectionId, ServiceError> {
        let id = ProjectionId::new_v4();
        self.projections.lock().insert(
            id,
            StoredProjection {
                parameters: parameters.clone(),
                description,
                files: HashMap::new(),
                status: ProjectionStatus::Draft,
            },
        );
        tracing::info!(%id, "created projection");
        Ok(id)
    }

    async fn upload_file(&self, id: ProjectionId, file: UploadedFile) -> Result<(), ServiceError> {
        let mut projections = self.projections.lock();
        let stored = projections.get_mut(&id).ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        tracing::debug!(%id, kind = %file.kind, bytes = file.content.len(), "uploaded file");
        stored.files.insert(file.kind, file);
        Ok(())
    }

    async fn run_projection(&self, id: ProjectionId) -> Result<ProjectionHandle, ServiceError> {
        let mut projections = self.projections.lock();
        let stored = projections.get_mut(&id).ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        for kind in [FileKind::Polygon, FileKind::Layer] {
            if !stored.files.contains_key(&kind) {
                return Err(ServiceError::MissingFile { kind });
            }
        }
        stored.status = ProjectionStatus::Ready;
        tracing::info!(%id, "projection run complete");
        Ok(ProjectionHandle {
            id,
            status: ProjectionStatus::Running,
            submitted_at: Utc::now(),
        })
    }

    async fn fetch_results(&self, id: ProjectionId) -> Result<Vec<u8>, ServiceError> {
        let projections = self.projections.lock();
        let stored = projections.get(&id).ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        if stored.status != ProjectionStatus::Ready {
            return Err(ServiceError::NotReady(id.to_string()));
        }
        let mut files: Vec<(&str, usize)> =
            stored.files.values().map(|f| (f.file_name.as_str(), f.content.len())).collect();
        files.sort_unstable();
        let manifest = serde_json::json!({
            "projectionId": id,
            "description": stored.description,
            "parameters": stored.parameters,
            "files": files.into_iter().map(|(name, size)| serde_json::json!({ "name": name, "size": size })).collect::<Vec<_>>(),
        });
        serde_json::to_vec_pretty(&manifest).map_err(|e| ServiceError::Transport(e.to_string()))
    }
}

use crate::core::error::ScanError;
use crate::core::orchestrator::Orchestrator;
use crate::models::{AnalysisClass, AppMetadata, ArtifactType, Finding, Report};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// State for one scanning session: the uploaded artifact, its metadata and
/// the latest result set per analysis class.
///
/// Each session owns an isolated scratch directory under the configured
/// base. It is created on upload and removed on [`ScanSession::reset`] or
/// when the session is dropped.
#[derive(Debug)]
pub struct ScanSession {
    id: Uuid,
    scratch_dir: PathBuf,
    artifact: Option<PathBuf>,
    metadata: Option<AppMetadata>,
    static_results: Option<Vec<Finding>>,
    dynamic_results: Option<Vec<Finding>>,
}

impl ScanSession {
    pub fn new(scratch_base: &Path) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            scratch_dir: scratch_base.join(id.to_string()),
            artifact: None,
            metadata: None,
            static_results: None,
            dynamic_results: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    pub fn artifact(&self) -> Option<&Path> {
        self.artifact.as_deref()
    }

    pub fn metadata(&self) -> Option<&AppMetadata> {
        self.metadata.as_ref()
    }

    /// Validate and store an uploaded package. A rejected upload leaves
    /// the session untouched.
    pub fn upload(&mut self, filename: &str, bytes: &[u8]) -> Result<&AppMetadata, ScanError> {
        let base_name = Path::new(filename)
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ScanError::UnsupportedArtifact(filename.to_string()))?;
        let artifact_type = ArtifactType::from_path(base_name)
            .ok_or_else(|| ScanError::UnsupportedArtifact(filename.to_string()))?;

        fs::create_dir_all(&self.scratch_dir)?;
        let path = self.scratch_dir.join(base_name);
        fs::write(&path, bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "Artifact stored");

        self.artifact = Some(path);
        Ok(self.metadata.insert(AppMetadata::new(
            base_name,
            bytes.len() as u64,
            artifact_type,
        )))
    }

    pub fn results(&self, class: AnalysisClass) -> Option<&[Finding]> {
        match class {
            AnalysisClass::Static => self.static_results.as_deref(),
            AnalysisClass::Dynamic => self.dynamic_results.as_deref(),
        }
    }

    /// Run one analysis class. On error the previous results of that class
    /// are left as they were.
    pub async fn run(
        &mut self,
        orchestrator: &Orchestrator,
        class: AnalysisClass,
    ) -> Result<&[Finding], ScanError> {
        let artifact = self.artifact.as_deref().ok_or(ScanError::NoArtifact)?;
        let findings = orchestrator.run_analysis(class, artifact).await?;

        let slot = match class {
            AnalysisClass::Static => &mut self.static_results,
            AnalysisClass::Dynamic => &mut self.dynamic_results,
        };
        let findings: &[Finding] = slot.insert(findings);
        Ok(findings)
    }

    /// Unset classes render as empty sections.
    pub fn report(&self) -> Report {
        Report::new(Local::now())
            .with_metadata(self.metadata.clone())
            .with_static_findings(self.static_results.clone().unwrap_or_default())
            .with_dynamic_findings(self.dynamic_results.clone().unwrap_or_default())
    }

    /// Forget everything and remove the scratch directory.
    pub fn reset(&mut self) {
        self.artifact = None;
        self.metadata = None;
        self.static_results = None;
        self.dynamic_results = None;
        self.purge_scratch();
    }

    fn purge_scratch(&self) {
        if !self.scratch_dir.exists() {
            return;
        }
        match fs::remove_dir_all(&self.scratch_dir) {
            Ok(()) => debug!(path = %self.scratch_dir.display(), "Scratch directory removed"),
            Err(e) => warn!(
                path = %self.scratch_dir.display(),
                error = %e,
                "Could not remove scratch directory"
            ),
        }
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.purge_scratch();
    }
}

/// Remove the whole scratch base, including leftovers from sessions that
/// did not shut down cleanly.
pub fn purge_scratch_base(scratch_base: &Path) -> std::io::Result<bool> {
    if !scratch_base.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(scratch_base)?;
    Ok(true)
}

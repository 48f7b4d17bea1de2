use crate::models::Finding;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File-backed sample findings, used when a whole analysis class is empty.
/// The file is a JSON array of `{name, severity, description}` objects.
#[derive(Debug, Clone, Default)]
pub struct FallbackSource {
    path: Option<PathBuf>,
}

impl FallbackSource {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Never fails: a missing or malformed file yields an empty list.
    pub fn load(&self) -> Vec<Finding> {
        let Some(path) = &self.path else {
            return Vec::new();
        };

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Fallback sample unavailable");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Finding>>(&content) {
            Ok(findings) => findings
                .into_iter()
                .map(|finding| {
                    if finding.source.is_empty() {
                        finding.with_source("sample")
                    } else {
                        finding
                    }
                })
                .collect(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Malformed fallback sample ignored");
                Vec::new()
            }
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactType {
    #[serde(rename = "APK")]
    Apk,
    #[serde(rename = "IPA")]
    Ipa,
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactType::Apk => write!(f, "APK"),
            ArtifactType::Ipa => write!(f, "IPA"),
        }
    }
}

impl ArtifactType {
    /// Derive the artifact type from a file name's extension (case-insensitive).
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "apk" => Some(ArtifactType::Apk),
            "ipa" => Some(ArtifactType::Ipa),
            _ => None,
        }
    }
}

/// Describes the uploaded artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMetadata {
    pub filename: String,
    #[serde(rename = "size")]
    pub size_display: String,
    #[serde(rename = "type")]
    pub artifact_type: ArtifactType,
}

impl AppMetadata {
    pub fn new(filename: &str, size_bytes: u64, artifact_type: ArtifactType) -> Self {
        Self {
            filename: filename.to_string(),
            size_display: format_size(size_bytes),
            artifact_type,
        }
    }
}

pub fn format_size(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

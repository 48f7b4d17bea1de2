use std::path::PathBuf;
use thiserror::Error;

/// Errors that reach the caller. Tool and transport failures never do;
/// adapters absorb those.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid file type '{0}'. Please upload an APK or IPA file.")]
    UnsupportedArtifact(String),

    #[error("Scan target not found: {0}")]
    MissingTarget(PathBuf),

    #[error("No artifact uploaded for this session")]
    NoArtifact,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub mod analysis;
pub mod finding;
pub mod metadata;
pub mod report;
pub mod severity;

pub use analysis::AnalysisClass;
pub use finding::Finding;
pub use metadata::{AppMetadata, ArtifactType};
pub use report::{Report, SeverityCounts};
pub use severity::Severity;

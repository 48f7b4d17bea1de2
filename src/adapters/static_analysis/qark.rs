use crate::adapters::{AdapterOutcome, SourceAdapter};
use crate::models::{AnalysisClass, Finding};
use async_trait::async_trait;
use std::path::Path;

/// Manifest and component checks. Placeholder until a QARK run is wired in.
#[derive(Debug, Default)]
pub struct QarkAdapter;

#[async_trait]
impl SourceAdapter for QarkAdapter {
    fn id(&self) -> &'static str {
        "qark"
    }

    fn name(&self) -> &str {
        "QARK"
    }

    fn class(&self) -> AnalysisClass {
        AnalysisClass::Static
    }

    fn description(&self) -> &str {
        "Looks for exported components and manifest misconfigurations."
    }

    async fn invoke(&self, _target: &Path) -> AdapterOutcome {
        AdapterOutcome::Completed(vec![Finding::new(
            "Exported Activity (QARK)",
            "Medium",
            "Found exported activity without permission protection.",
        )])
    }
}

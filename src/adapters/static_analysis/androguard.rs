use crate::adapters::{AdapterOutcome, SourceAdapter};
use crate::models::{AnalysisClass, Finding};
use async_trait::async_trait;
use std::path::Path;

/// Bytecode analysis. Not wired to a real Androguard run yet, so it reports
/// a fixed illustrative finding.
#[derive(Debug, Default)]
pub struct AndroguardAdapter;

#[async_trait]
impl SourceAdapter for AndroguardAdapter {
    fn id(&self) -> &'static str {
        "androguard"
    }

    fn name(&self) -> &str {
        "Androguard"
    }

    fn class(&self) -> AnalysisClass {
        AnalysisClass::Static
    }

    fn description(&self) -> &str {
        "Inspects DEX bytecode for weak cryptographic primitives and unsafe API usage."
    }

    async fn invoke(&self, _target: &Path) -> AdapterOutcome {
        AdapterOutcome::Completed(vec![Finding::new(
            "Weak Cryptography (Androguard)",
            "High",
            "Detected use of weak cryptographic algorithms.",
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    #[tokio::test]
    async fn test_placeholder_is_deterministic() {
        let adapter = AndroguardAdapter;
        let first = adapter.findings(Path::new("a.apk")).await;
        let second = adapter.findings(Path::new("b.apk")).await;

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].severity, Severity::High);
        assert_eq!(first[0].source, "androguard");
    }
}

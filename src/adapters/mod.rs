use crate::models::{AnalysisClass, Finding, Severity};
use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use tracing::warn;

pub mod dynamic_analysis;
pub mod static_analysis;

/// What an adapter produced for one target.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterOutcome {
    Completed(Vec<Finding>),
    Failed(String),
}

/// How a failed invocation shows up in the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// One synthetic `High` finding carrying the failure message.
    Report,
    /// Contributes nothing.
    Silent,
}

/// Wraps one external analysis capability.
#[async_trait]
pub trait SourceAdapter: Send + Sync + 'static {
    fn id(&self) -> &'static str;
    fn name(&self) -> &str;
    fn class(&self) -> AnalysisClass;
    fn description(&self) -> &str;

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Silent
    }

    /// Run the tool. Tool and transport failures come back as
    /// [`AdapterOutcome::Failed`], never as a panic or an error.
    async fn invoke(&self, target: &Path) -> AdapterOutcome;

    /// Run the tool and apply the failure policy.
    async fn findings(&self, target: &Path) -> Vec<Finding> {
        match self.invoke(target).await {
            AdapterOutcome::Completed(findings) => findings
                .into_iter()
                .map(|finding| {
                    if finding.source.is_empty() {
                        finding.with_source(self.id())
                    } else {
                        finding
                    }
                })
                .collect(),
            AdapterOutcome::Failed(reason) => {
                warn!(adapter = self.id(), error = %reason, "Adapter failed");
                match self.failure_policy() {
                    FailurePolicy::Report => vec![scan_error_finding(self.name(), &reason).with_source(self.id())],
                    FailurePolicy::Silent => Vec::new(),
                }
            }
        }
    }
}

pub fn scan_error_finding(adapter_name: &str, reason: &str) -> Finding {
    Finding::new(
        &format!("{} Scan Error", adapter_name),
        &Severity::High.to_string(),
        &format!("Error during {} scan: {}", adapter_name, reason),
    )
}

impl fmt::Display for dyn SourceAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}\nClass: {}\nDescription: {}",
            self.name(),
            self.class(),
            self.description()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenAdapter {
        policy: FailurePolicy,
    }

    #[async_trait]
    impl SourceAdapter for BrokenAdapter {
        fn id(&self) -> &'static str {
            "broken"
        }

        fn name(&self) -> &str {
            "Broken"
        }

        fn class(&self) -> AnalysisClass {
            AnalysisClass::Static
        }

        fn description(&self) -> &str {
            "Always fails"
        }

        fn failure_policy(&self) -> FailurePolicy {
            self.policy
        }

        async fn invoke(&self, _target: &Path) -> AdapterOutcome {
            AdapterOutcome::Failed("connection refused".to_string())
        }
    }

    #[tokio::test]
    async fn test_report_policy_yields_one_high_finding() {
        let adapter = BrokenAdapter {
            policy: FailurePolicy::Report,
        };
        let findings = adapter.findings(Path::new("app.apk")).await;

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].name, "Broken Scan Error");
        assert!(findings[0].description.contains("connection refused"));
        assert_eq!(findings[0].source, "broken");
    }

    #[tokio::test]
    async fn test_silent_policy_yields_nothing() {
        let adapter = BrokenAdapter {
            policy: FailurePolicy::Silent,
        };
        assert!(adapter.findings(Path::new("app.apk")).await.is_empty());
    }
}

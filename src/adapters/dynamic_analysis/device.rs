use crate::adapters::{AdapterOutcome, SourceAdapter};
use crate::config::DeviceConfig;
use crate::device::{analyze_logs, capture_runtime_logs, DeviceBridge};
use crate::models::{AnalysisClass, ArtifactType, Finding};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

/// Runtime observation through the device bridges.
///
/// With bridges disabled (the default) it reports a fixed illustrative
/// finding. When enabled it dumps the device log for the artifact's
/// platform and turns suspicious entries into findings.
#[derive(Debug, Default)]
pub struct DeviceAutomationAdapter {
    bridge: Option<DeviceBridge>,
}

impl DeviceAutomationAdapter {
    pub fn from_config(config: &DeviceConfig) -> Self {
        Self {
            bridge: config.enabled.then(|| DeviceBridge::from_config(config)),
        }
    }
}

#[async_trait]
impl SourceAdapter for DeviceAutomationAdapter {
    fn id(&self) -> &'static str {
        "device"
    }

    fn name(&self) -> &str {
        "Device Automation"
    }

    fn class(&self) -> AnalysisClass {
        AnalysisClass::Dynamic
    }

    fn description(&self) -> &str {
        "Drives the app on a device or simulator via adb/xcrun and inspects runtime logs."
    }

    async fn invoke(&self, target: &Path) -> AdapterOutcome {
        let Some(bridge) = &self.bridge else {
            debug!("Device bridges disabled, using placeholder finding");
            return AdapterOutcome::Completed(vec![Finding::new(
                "Permission Abuse (Device)",
                "Medium",
                "Sensitive permission used during runtime.",
            )]);
        };

        let Some(artifact) = ArtifactType::from_path(target) else {
            return AdapterOutcome::Failed(format!(
                "unsupported artifact for device automation: {}",
                target.display()
            ));
        };

        let entries = match capture_runtime_logs(bridge, artifact).await {
            Ok(entries) => entries,
            Err(e) => return AdapterOutcome::Failed(e),
        };
        let findings = analyze_logs(&entries);
        info!(entries = entries.len(), findings = findings.len(), "Runtime logs analyzed");
        AdapterOutcome::Completed(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    #[tokio::test]
    async fn test_disabled_bridge_uses_placeholder() {
        let adapter = DeviceAutomationAdapter::from_config(&DeviceConfig::default());
        let findings = adapter.findings(Path::new("app.apk")).await;

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "Permission Abuse (Device)");
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[tokio::test]
    async fn test_unreachable_tool_contributes_nothing() {
        let adapter = DeviceAutomationAdapter::from_config(&DeviceConfig {
            enabled: true,
            adb_path: "appsentinel-no-such-adb".to_string(),
            ..Default::default()
        });

        assert!(adapter.findings(Path::new("app.apk")).await.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_bridge_failure_text_is_not_a_finding() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let adb = dir.path().join("adb");
        std::fs::write(&adb, "not a program").unwrap();
        std::fs::set_permissions(&adb, std::fs::Permissions::from_mode(0o644)).unwrap();

        let adapter = DeviceAutomationAdapter::from_config(&DeviceConfig {
            enabled: true,
            adb_path: adb.to_string_lossy().into_owned(),
            ..Default::default()
        });

        let outcome = adapter.invoke(Path::new("app.apk")).await;
        assert!(matches!(outcome, AdapterOutcome::Failed(ref e) if e.contains("Permission denied")));
        assert!(adapter.findings(Path::new("app.apk")).await.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_artifact_is_silent() {
        let adapter = DeviceAutomationAdapter::from_config(&DeviceConfig {
            enabled: true,
            ..Default::default()
        });

        assert!(adapter.findings(Path::new("app.zip")).await.is_empty());
    }
}

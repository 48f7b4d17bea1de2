use crate::config::DeviceConfig;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Runs the Android (`adb`) and Apple (`xcrun`) device tools.
///
/// Every invocation is time-bounded and returns text: standard output on
/// completion, or the error message when the tool could not be run.
#[derive(Debug, Clone)]
pub struct DeviceBridge {
    adb_path: String,
    xcrun_path: String,
    device_id: Option<String>,
    timeout: Duration,
}

impl Default for DeviceBridge {
    fn default() -> Self {
        Self::from_config(&DeviceConfig::default())
    }
}

impl DeviceBridge {
    pub fn from_config(config: &DeviceConfig) -> Self {
        Self {
            adb_path: config.adb_path.clone(),
            xcrun_path: config.xcrun_path.clone(),
            device_id: config.device_id.clone(),
            timeout: config.timeout(),
        }
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// Text contract: stdout on success, the failure message otherwise.
    pub async fn run_adb(&self, args: &[&str]) -> String {
        self.adb(args).await.unwrap_or_else(|e| e)
    }

    pub async fn run_xcrun(&self, args: &[&str]) -> String {
        self.xcrun(args).await.unwrap_or_else(|e| e)
    }

    /// Like [`DeviceBridge::run_adb`], keeping failures apart from output.
    pub async fn adb(&self, args: &[&str]) -> Result<String, String> {
        run(&self.adb_path, args, self.timeout).await
    }

    pub async fn xcrun(&self, args: &[&str]) -> Result<String, String> {
        run(&self.xcrun_path, args, self.timeout).await
    }
}

/// A spawn error, a non-zero exit or a timeout is a failure.
#[instrument(skip(timeout))]
async fn run(program: &str, args: &[&str], timeout: Duration) -> Result<String, String> {
    let mut cmd = Command::new(program);
    cmd.args(args).kill_on_drop(true);

    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) if output.status.success() => {
            debug!(status = %output.status, bytes = output.stdout.len(), "Command finished");
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        Ok(Ok(output)) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(format!("{} exited with {}: {}", program, output.status, stderr.trim()))
        }
        Ok(Err(e)) => Err(format!("{} could not be run: {}", program, e)),
        Err(_) => Err(format!(
            "{} timed out after {} seconds",
            program,
            timeout.as_secs()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_tool_returns_error_text() {
        let bridge = DeviceBridge::from_config(&DeviceConfig {
            adb_path: "appsentinel-no-such-adb".to_string(),
            ..Default::default()
        });

        assert!(bridge.adb(&["devices"]).await.is_err());
        let output = bridge.run_adb(&["devices"]).await;
        assert!(output.contains("could not be run"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_is_captured() {
        let output = run("echo", &["device-ready"], Duration::from_secs(5)).await;
        assert_eq!(output.unwrap().trim(), "device-ready");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_is_reported() {
        let output = run("sleep", &["5"], Duration::from_millis(100)).await;
        assert!(output.unwrap_err().contains("timed out"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_a_failure() {
        let output = run("false", &[], Duration::from_secs(5)).await;
        assert!(output.unwrap_err().contains("exited with"));
    }
}

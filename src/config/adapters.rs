use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const API_URL_ENV: &str = "MOBSF_API_URL";
pub const API_KEY_ENV: &str = "MOBSF_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Transport settings for the remote static scanner.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RemoteConfig {
    /// Endpoint and key, only when both are set and non-blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let endpoint = self.endpoint.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let api_key = self.api_key.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some((endpoint.trim_end_matches('/'), api_key))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Environment variables take precedence over the config file.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var(API_URL_ENV) {
            self.endpoint = Some(endpoint);
        }
        if let Ok(api_key) = std::env::var(API_KEY_ENV) {
            self.api_key = Some(api_key);
        }
        self
    }
}

/// Device bridge settings (adb / xcrun).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub enabled: bool,
    pub adb_path: String,
    pub xcrun_path: String,
    pub device_id: Option<String>,
    pub timeout_secs: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            adb_path: "adb".to_string(),
            xcrun_path: "xcrun".to_string(),
            device_id: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl DeviceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Sample files substituted when every adapter of a class comes back empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub static_sample: Option<PathBuf>,
    pub dynamic_sample: Option<PathBuf>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            static_sample: None,
            dynamic_sample: Some(PathBuf::from("sample_data/dummy_dynamic.json")),
        }
    }
}

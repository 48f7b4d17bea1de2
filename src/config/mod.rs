mod adapters;

pub use adapters::{DeviceConfig, FallbackConfig, RemoteConfig};

use crate::output::ReportFormat;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_FILE: &str = "appsentinel.toml";

pub const DEFAULT_CONFIG_CONTENT: &str = r#"# appsentinel.toml

# Directory holding uploaded artifacts while a scan session is running.
# Every session gets its own sub-directory, removed when the session ends.
# If omitted, it defaults to the user cache directory (or ./tmp).
# scratch_dir = "tmp"

# Output format for the report.
# Options: "html", "pdf", "json", "sarif"
# If omitted, it defaults to "html".
# output_format = "html"

# Explicitly exclude specific adapters by ID.
# Run `appsentinel adapters` to see all available adapter IDs.
# exclude_adapters = ["qark"]

# Remote static scanner (MobSF compatible REST API).
# The MOBSF_API_URL and MOBSF_API_KEY environment variables override these.
# Without both values the adapter reports illustrative offline findings.
[remote]
# endpoint = "http://localhost:8000"
# api_key = ""
# timeout_secs = 30

# Device bridges used by the device automation adapter.
[device]
# enabled = false
# adb_path = "adb"
# xcrun_path = "xcrun"
# device_id = "emulator-5554"
# timeout_secs = 30

# Sample findings used when every adapter of a class returns nothing.
# A missing or malformed file yields an empty result.
[fallback]
# static_sample = "sample_data/dummy_static.json"
# dynamic_sample = "sample_data/dummy_dynamic.json"
"#;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error reading config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error parsing config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Error writing '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    InvalidValue(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
    #[serde(default, rename = "output_format")]
    pub format: ReportFormat,
    #[serde(default)]
    pub exclude_adapters: Vec<String>,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
}

fn default_scratch_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("appsentinel"))
        .unwrap_or_else(|| PathBuf::from("tmp"))
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scratch_dir: default_scratch_dir(),
            format: ReportFormat::default(),
            exclude_adapters: Vec::new(),
            remote: RemoteConfig::default(),
            device: DeviceConfig::default(),
            fallback: FallbackConfig::default(),
        }
    }
}

/// Values given on the command line; each one overrides the config file.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub format: Option<String>,
    pub scratch_dir: Option<PathBuf>,
    pub exclude_adapters: Option<Vec<String>>,
}

pub fn read_config_file(config_path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));

    if !config_path.exists() {
        debug!(path = %config_path.display(), "No config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;

    toml::from_str::<Config>(&content).map_err(|source| ConfigError::Parse {
        path: config_path.to_path_buf(),
        source,
    })
}

pub fn load_config(
    config_path: Option<PathBuf>,
    overrides: ConfigOverrides,
) -> Result<Config, ConfigError> {
    let config = read_config_file(config_path.as_deref())?;

    // CLI exclusions extend the config file list
    let exclude_adapters = {
        let mut from_config = config.exclude_adapters.clone();
        if let Some(cli_exclusions) = overrides.exclude_adapters {
            from_config.extend(cli_exclusions);
        }
        from_config
    };

    let format = match overrides.format {
        Some(s) => s.parse().map_err(ConfigError::InvalidValue)?,
        None => config.format,
    };

    if config.remote.credentials().is_none() && config.remote.endpoint.is_some() {
        warn!("Remote scanner endpoint configured without an API key");
    }

    Ok(Config {
        scratch_dir: overrides.scratch_dir.unwrap_or(config.scratch_dir),
        format,
        exclude_adapters,
        remote: config.remote.with_env_overrides(),
        device: config.device,
        fallback: config.fallback,
    })
}

/// Returns `true` when a new file was written.
pub fn initialize_config_file(config_path_override: Option<&Path>) -> Result<bool, ConfigError> {
    let config_path = config_path_override.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));

    if config_path.exists() {
        return Ok(false);
    }

    let mut file = fs::File::create(config_path).map_err(|source| ConfigError::Write {
        path: config_path.to_path_buf(),
        source,
    })?;
    file.write_all(DEFAULT_CONFIG_CONTENT.as_bytes())
        .map_err(|source| ConfigError::Write {
            path: config_path.to_path_buf(),
            source,
        })?;

    Ok(true)
}

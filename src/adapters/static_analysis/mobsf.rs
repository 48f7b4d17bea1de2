//! Remote static scanner speaking the MobSF REST API.
//!
//! Three sequential calls against the configured base URL:
//! `upload` (multipart artifact, returns a content hash), `scan` and
//! `report_json` (both keyed by that hash). Without an endpoint and key the
//! adapter runs offline and returns fixed illustrative findings.

use crate::adapters::{AdapterOutcome, FailurePolicy, SourceAdapter};
use crate::config::RemoteConfig;
use crate::models::{AnalysisClass, Finding};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum RemoteScanError {
    #[error("{step} request failed: {source}")]
    Transport {
        step: &'static str,
        source: reqwest::Error,
    },

    #[error("{step} returned HTTP {status}")]
    Status {
        step: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("{step} returned a malformed body: {reason}")]
    MalformedBody { step: &'static str, reason: String },

    #[error("upload response did not contain a scan hash")]
    MissingHash,

    #[error("report did not contain a findings list")]
    MissingFindings,

    #[error("could not read artifact: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    hash: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RemoteFinding {
    title: Option<String>,
    severity: Option<String>,
    description: Option<String>,
}

impl From<RemoteFinding> for Finding {
    fn from(item: RemoteFinding) -> Self {
        Finding::new(
            item.title.as_deref().unwrap_or("Unknown"),
            item.severity.as_deref().unwrap_or("Info"),
            item.description.as_deref().unwrap_or("No details"),
        )
    }
}

#[derive(Debug, Clone)]
pub struct MobsfAdapter {
    endpoint: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
}

impl Default for MobsfAdapter {
    fn default() -> Self {
        Self::from_config(&RemoteConfig::default())
    }
}

impl MobsfAdapter {
    pub fn from_config(config: &RemoteConfig) -> Self {
        let (endpoint, api_key) = match config.credentials() {
            Some((endpoint, api_key)) => (Some(endpoint.to_string()), Some(api_key.to_string())),
            None => (None, None),
        };

        Self {
            endpoint,
            api_key,
            timeout: config.timeout(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: Some(base_url.into().trim_end_matches('/').to_string()),
            api_key: Some(api_key.into()),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn is_online(&self) -> bool {
        self.endpoint.is_some() && self.api_key.is_some()
    }

    fn offline_findings() -> Vec<Finding> {
        vec![
            Finding::new(
                "Hardcoded API Key (MobSF)",
                "High",
                "An API key was found hardcoded in the binary.",
            ),
            Finding::new(
                "Insecure Permissions (MobSF)",
                "Medium",
                "App requests more permissions than necessary.",
            ),
            Finding::new(
                "Insecure Storage (MobSF)",
                "Low",
                "Sensitive data may be stored insecurely.",
            ),
        ]
    }

    #[instrument(skip(self, api_key, target), fields(target = %target.display()))]
    async fn scan(
        &self,
        endpoint: &str,
        api_key: &str,
        target: &Path,
    ) -> Result<Vec<Finding>, RemoteScanError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|source| RemoteScanError::Transport {
                step: "client",
                source,
            })?;

        let bytes = tokio::fs::read(target).await?;
        let file_name = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "artifact".to_string());
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));

        let response = client
            .post(format!("{}/api/v1/upload", endpoint))
            .header("Authorization", api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|source| RemoteScanError::Transport {
                step: "upload",
                source,
            })?;
        let upload: UploadResponse = parse_json(check_status("upload", response)?, "upload").await?;
        let hash = upload
            .hash
            .filter(|hash| !hash.is_empty())
            .ok_or(RemoteScanError::MissingHash)?;
        debug!(hash = %hash, "Artifact uploaded");

        let response = client
            .post(format!("{}/api/v1/scan", endpoint))
            .header("Authorization", api_key)
            .json(&json!({ "hash": hash }))
            .send()
            .await
            .map_err(|source| RemoteScanError::Transport {
                step: "scan",
                source,
            })?;
        check_status("scan", response)?;

        let response = client
            .post(format!("{}/api/v1/report_json", endpoint))
            .header("Authorization", api_key)
            .json(&json!({ "hash": hash }))
            .send()
            .await
            .map_err(|source| RemoteScanError::Transport {
                step: "report_json",
                source,
            })?;
        let report: Value = parse_json(check_status("report_json", response)?, "report_json").await?;

        let items = report
            .get("findings")
            .cloned()
            .ok_or(RemoteScanError::MissingFindings)?;
        let items: Vec<RemoteFinding> =
            serde_json::from_value(items).map_err(|e| RemoteScanError::MalformedBody {
                step: "report_json",
                reason: e.to_string(),
            })?;

        let findings: Vec<Finding> = items.into_iter().map(Finding::from).collect();
        info!(count = findings.len(), "Remote scan report received");

        if findings.is_empty() {
            return Ok(vec![Finding::new(
                "No critical vulnerabilities found",
                "Info",
                "No issues detected by MobSF.",
            )]);
        }

        Ok(findings)
    }
}

fn check_status(step: &'static str, response: Response) -> Result<Response, RemoteScanError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(RemoteScanError::Status { step, status })
    }
}

async fn parse_json<T: serde::de::DeserializeOwned>(
    response: Response,
    step: &'static str,
) -> Result<T, RemoteScanError> {
    response
        .json::<T>()
        .await
        .map_err(|e| RemoteScanError::MalformedBody {
            step,
            reason: e.to_string(),
        })
}

#[async_trait]
impl SourceAdapter for MobsfAdapter {
    fn id(&self) -> &'static str {
        "mobsf"
    }

    fn name(&self) -> &str {
        "MobSF"
    }

    fn class(&self) -> AnalysisClass {
        AnalysisClass::Static
    }

    fn description(&self) -> &str {
        "Uploads the artifact to a remote MobSF instance and maps its report findings. \
        Runs offline with illustrative findings when no endpoint and API key are configured."
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Report
    }

    async fn invoke(&self, target: &Path) -> AdapterOutcome {
        let (Some(endpoint), Some(api_key)) = (self.endpoint.as_deref(), self.api_key.as_deref())
        else {
            debug!("Remote scanner not configured, using offline findings");
            return AdapterOutcome::Completed(Self::offline_findings());
        };

        match self.scan(endpoint, api_key, target).await {
            Ok(findings) => AdapterOutcome::Completed(findings),
            Err(e) => AdapterOutcome::Failed(e.to_string()),
        }
    }
}

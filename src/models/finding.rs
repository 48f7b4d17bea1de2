use crate::models::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One normalized vulnerability record.
///
/// The severity is bucketed into the closed [`Severity`] enumeration when the
/// finding is built. A label outside the four canonical values is kept in
/// `reported_severity` so the report can still show what the tool said.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FindingRecord", into = "FindingRecord")]
pub struct Finding {
    pub name: String,
    pub severity: Severity,
    pub reported_severity: Option<String>,
    pub description: String,
    /// Id of the adapter that produced the finding, empty when unknown.
    pub source: String,
}

/// Wire shape shared by adapters, the fallback sample file and JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FindingRecord {
    #[serde(default)]
    name: String,
    #[serde(default = "default_severity_label")]
    severity: String,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    source: String,
}

fn default_severity_label() -> String {
    Severity::Info.to_string()
}

impl From<FindingRecord> for Finding {
    fn from(record: FindingRecord) -> Self {
        Finding::new(&record.name, &record.severity, &record.description).with_source(&record.source)
    }
}

impl From<Finding> for FindingRecord {
    fn from(finding: Finding) -> Self {
        FindingRecord {
            severity: finding.severity_label().to_string(),
            name: finding.name,
            description: finding.description,
            source: finding.source,
        }
    }
}

impl Finding {
    pub fn new(name: &str, severity: &str, description: &str) -> Self {
        let name = name.trim();
        let (severity, reported_severity) = match severity.parse::<Severity>() {
            Ok(parsed) => (parsed, None),
            Err(_) => (Severity::Info, Some(severity.to_string())),
        };

        Self {
            name: if name.is_empty() {
                "Unknown".to_string()
            } else {
                name.to_string()
            },
            severity,
            reported_severity,
            description: description.to_string(),
            source: String::new(),
        }
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    /// Label for display: the tool's own label when it was not canonical.
    pub fn severity_label(&self) -> String {
        match &self.reported_severity {
            Some(label) if !label.is_empty() => label.clone(),
            _ => self.severity.to_string(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | Severity: {}", self.name, self.severity_label())?;
        if !self.description.is_empty() {
            write!(f, "\n- {}", self.description)?;
        }
        Ok(())
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Analysis class an adapter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisClass {
    /// Inspects the artifact without executing it.
    Static,
    /// Observes the app at runtime.
    Dynamic,
}

impl AnalysisClass {
    pub const ALL: [AnalysisClass; 2] = [AnalysisClass::Static, AnalysisClass::Dynamic];

    pub fn title(&self) -> &'static str {
        match self {
            AnalysisClass::Static => "Static Analysis",
            AnalysisClass::Dynamic => "Dynamic Analysis",
        }
    }
}

impl fmt::Display for AnalysisClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisClass::Static => write!(f, "static"),
            AnalysisClass::Dynamic => write!(f, "dynamic"),
        }
    }
}

impl FromStr for AnalysisClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "static" => Ok(AnalysisClass::Static),
            "dynamic" => Ok(AnalysisClass::Dynamic),
            _ => Err(format!("Invalid analysis class: {}", s)),
        }
    }
}

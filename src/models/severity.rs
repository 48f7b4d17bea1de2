use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Severity {
    High,
    Medium,
    Low,
    #[default]
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::High => write!(f, "High"),
            Severity::Medium => write!(f, "Medium"),
            Severity::Low => write!(f, "Low"),
            Severity::Info => write!(f, "Info"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            "info" => Ok(Severity::Info),
            _ => Err(format!("Invalid severity: {}", s)),
        }
    }
}

impl Severity {
    /// Chart and summary order.
    pub const ALL: [Severity; 4] = [
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    /// Lenient bucketing used for aggregation: anything that is not
    /// exactly high/medium/low (in any case) counts as `Info`.
    pub fn bucket(label: &str) -> Severity {
        label.parse().unwrap_or(Severity::Info)
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }

    /// Fixed category color (RGB) shared by both charts.
    pub fn color(&self) -> [u8; 3] {
        match self {
            Severity::High => [0xcc, 0x00, 0x00],
            Severity::Medium => [0xe6, 0x7e, 0x22],
            Severity::Low => [0x29, 0x80, 0xb9],
            Severity::Info => [0xbb, 0xbb, 0xbb],
        }
    }

    pub fn hex_color(&self) -> String {
        let [r, g, b] = self.color();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

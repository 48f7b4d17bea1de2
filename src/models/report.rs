use crate::models::analysis::AnalysisClass;
use crate::models::finding::Finding;
use crate::models::metadata::AppMetadata;
use crate::models::severity::Severity;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Per-severity counts; every canonical severity is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Info => self.info,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low + self.info
    }

    /// Counts in chart order `[High, Medium, Low, Info]`.
    pub fn series(&self) -> [(Severity, usize); 4] {
        Severity::ALL.map(|severity| (severity, self.get(severity)))
    }

    /// Info is left out of the textual summary; it only shows in the charts.
    pub fn summary_line(&self) -> String {
        format!(
            "Total: {} | High: {} | Medium: {} | Low: {}",
            self.total(),
            self.high,
            self.medium,
            self.low
        )
    }

    fn record(&mut self, severity: Severity) {
        match severity {
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
            Severity::Info => self.info += 1,
        }
    }
}

/// Count findings per severity. Order-independent, one pass.
pub fn count_by_severity<'a, I>(findings: I) -> SeverityCounts
where
    I: IntoIterator<Item = &'a Finding>,
{
    let mut counts = SeverityCounts::default();
    for finding in findings {
        counts.record(finding.severity);
    }
    counts
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub generated_at: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AppMetadata>,
    pub static_findings: Vec<Finding>,
    pub dynamic_findings: Vec<Finding>,
}

impl Report {
    pub fn new(generated_at: DateTime<Local>) -> Self {
        Self {
            title: "Mobile App Vulnerability Report".to_string(),
            generated_at,
            metadata: None,
            static_findings: Vec::new(),
            dynamic_findings: Vec::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Option<AppMetadata>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_static_findings(mut self, findings: Vec<Finding>) -> Self {
        self.static_findings = findings;
        self
    }

    pub fn with_dynamic_findings(mut self, findings: Vec<Finding>) -> Self {
        self.dynamic_findings = findings;
        self
    }

    /// Static then dynamic findings, for aggregate counting only.
    pub fn combined(&self) -> impl Iterator<Item = &Finding> {
        self.static_findings.iter().chain(self.dynamic_findings.iter())
    }

    pub fn findings(&self, class: AnalysisClass) -> &[Finding] {
        match class {
            AnalysisClass::Static => &self.static_findings,
            AnalysisClass::Dynamic => &self.dynamic_findings,
        }
    }

    pub fn summary(&self) -> SeverityCounts {
        count_by_severity(self.combined())
    }

    pub fn timestamp(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn findings_from_labels(labels: &[String]) -> Vec<Finding> {
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| Finding::new(&format!("finding-{}", i), label, ""))
            .collect()
    }

    fn label_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("High".to_string()),
            Just("HIGH".to_string()),
            Just("medium".to_string()),
            Just("Low".to_string()),
            Just("info".to_string()),
            Just("Critical".to_string()),
            "[a-zA-Z]{0,8}",
        ]
    }

    #[test]
    fn test_summary_line() {
        let findings = vec![Finding::new("Hardcoded API Key", "High", "")];
        let counts = count_by_severity(&findings);
        assert_eq!(counts.summary_line(), "Total: 1 | High: 1 | Medium: 0 | Low: 0");
    }

    #[test]
    fn test_unknown_labels_count_as_info() {
        let findings = vec![
            Finding::new("a", "Critical", ""),
            Finding::new("b", "", ""),
            Finding::new("c", "INFO", ""),
        ];
        let counts = count_by_severity(&findings);
        assert_eq!(counts.info, 3);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_report_summary_spans_both_classes() {
        let report = Report::new(Local::now())
            .with_static_findings(vec![Finding::new("a", "High", "")])
            .with_dynamic_findings(vec![
                Finding::new("b", "Medium", ""),
                Finding::new("c", "Low", ""),
            ]);

        let summary = report.summary();
        assert_eq!(summary.total(), 3);
        assert_eq!(
            summary.series(),
            [
                (Severity::High, 1),
                (Severity::Medium, 1),
                (Severity::Low, 1),
                (Severity::Info, 0)
            ]
        );
    }

    proptest! {
        #[test]
        fn counts_sum_to_len(labels in prop::collection::vec(label_strategy(), 0..64)) {
            let findings = findings_from_labels(&labels);
            prop_assert_eq!(count_by_severity(&findings).total(), findings.len());
        }

        #[test]
        fn counts_ignore_order(labels in prop::collection::vec(label_strategy(), 0..64)) {
            let findings = findings_from_labels(&labels);
            let mut reversed = findings.clone();
            reversed.reverse();
            let mut rotated = findings.clone();
            if !rotated.is_empty() {
                rotated.rotate_left(labels.len() / 2);
            }

            let expected = count_by_severity(&findings);
            prop_assert_eq!(count_by_severity(&reversed), expected);
            prop_assert_eq!(count_by_severity(&rotated), expected);
        }

        #[test]
        fn counts_ignore_case(label in "(high|medium|low|info)") {
            let lower = vec![Finding::new("x", &label, "")];
            let upper = vec![Finding::new("x", &label.to_uppercase(), "")];
            prop_assert_eq!(count_by_severity(&lower), count_by_severity(&upper));
        }
    }
}

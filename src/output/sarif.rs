use crate::models::{AnalysisClass, Finding, Report, Severity};
use fnv::FnvHasher;
use serde_sarif::sarif::{
    self, ArtifactLocation, Message, MultiformatMessageString, PhysicalLocation,
    ReportingDescriptor, Result as SarifResult, ResultLevel, Run, Sarif, ToolComponent, Version,
    SCHEMA_URL,
};
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};

fn severity_to_level(severity: &Severity) -> ResultLevel {
    match severity {
        Severity::High => ResultLevel::Error,
        Severity::Medium => ResultLevel::Warning,
        Severity::Low | Severity::Info => ResultLevel::Note,
    }
}

/// security-severity score, as read by GitHub code scanning
fn severity_to_score(severity: &Severity) -> &'static str {
    match severity {
        Severity::High => "8.0",
        Severity::Medium => "5.0",
        Severity::Low => "3.0",
        Severity::Info => "0.0",
    }
}

/// Rule ids group findings by the adapter that produced them and the
/// finding name, e.g. `mobsf/hardcoded-api-key-mobsf`.
fn rule_id(finding: &Finding) -> String {
    let source = if finding.source.is_empty() {
        "unknown"
    } else {
        finding.source.as_str()
    };

    let mut slug = String::with_capacity(finding.name.len());
    for c in finding.name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');

    format!("{}/{}", source, slug)
}

/// Stable across runs and Rust versions (FNV, not DefaultHasher).
fn generate_fingerprint(rule_id: &str, class: AnalysisClass, artifact: &str, description: &str) -> String {
    let mut hasher = FnvHasher::default();
    rule_id.hash(&mut hasher);
    class.to_string().hash(&mut hasher);
    artifact.hash(&mut hasher);
    description.trim().hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

pub fn generate_sarif_report(report: &Report) -> Sarif {
    let mut rules: Vec<ReportingDescriptor> = Vec::new();
    let mut rule_indices: HashMap<String, i64> = HashMap::new();
    let mut results: Vec<SarifResult> = Vec::new();

    let artifact = report
        .metadata
        .as_ref()
        .map(|metadata| metadata.filename.as_str());

    for class in AnalysisClass::ALL {
        for finding in report.findings(class) {
            let id = rule_id(finding);
            let rule_index = match rule_indices.get(&id) {
                Some(index) => *index,
                None => {
                    let index = rules.len() as i64;
                    rule_indices.insert(id.clone(), index);
                    rules.push(build_rule(&id, finding));
                    index
                }
            };

            let fingerprint =
                generate_fingerprint(&id, class, artifact.unwrap_or(""), &finding.description);
            let mut partial_fingerprints = BTreeMap::new();
            partial_fingerprints.insert("primaryLocationLineHash".to_string(), fingerprint);

            let message = if finding.description.is_empty() {
                finding.name.clone()
            } else {
                finding.description.clone()
            };

            let mut properties = BTreeMap::new();
            properties.insert("analysis".to_string(), serde_json::json!(class.to_string()));
            properties.insert(
                "reportedSeverity".to_string(),
                serde_json::json!(finding.severity_label()),
            );

            let result = SarifResult::builder()
                .rule_id(&id)
                .rule_index(rule_index)
                .level(severity_to_level(&finding.severity))
                .message(Message::builder().text(&message).build())
                .partial_fingerprints(partial_fingerprints)
                .properties(
                    sarif::PropertyBag::builder()
                        .additional_properties(properties)
                        .build(),
                );

            let result = match artifact {
                Some(file) => result.locations(vec![artifact_location(file)]).build(),
                None => result.build(),
            };

            results.push(result);
        }
    }

    let tool_component = ToolComponent::builder()
        .name("AppSentinel")
        .semantic_version(env!("CARGO_PKG_VERSION"))
        .rules(rules)
        .build();

    let run = Run::builder()
        .tool(tool_component)
        .results(results)
        .build();

    Sarif::builder()
        .version(Version::V2_1_0.to_string())
        .schema(SCHEMA_URL)
        .runs(vec![run])
        .build()
}

fn build_rule(id: &str, finding: &Finding) -> ReportingDescriptor {
    let mut props = BTreeMap::new();
    props.insert(
        "security-severity".to_string(),
        serde_json::json!(severity_to_score(&finding.severity)),
    );
    props.insert(
        "tags".to_string(),
        serde_json::json!(["security", "mobile"]),
    );

    ReportingDescriptor::builder()
        .id(id)
        .name(&finding.name)
        .short_description(&finding.name)
        .help(
            MultiformatMessageString::builder()
                .text(super::explain(finding))
                .build(),
        )
        .properties(
            sarif::PropertyBag::builder()
                .additional_properties(props)
                .build(),
        )
        .build()
}

fn artifact_location(file: &str) -> sarif::Location {
    let physical_location = PhysicalLocation::builder()
        .artifact_location(ArtifactLocation::builder().uri(file).build())
        .build();

    sarif::Location::builder()
        .physical_location(physical_location)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppMetadata, ArtifactType};
    use chrono::Local;

    fn report() -> Report {
        Report::new(Local::now())
            .with_metadata(Some(AppMetadata::new("bank.apk", 1024, ArtifactType::Apk)))
            .with_static_findings(vec![
                Finding::new("Hardcoded API Key (MobSF)", "High", "Key found").with_source("mobsf"),
                Finding::new("Hardcoded API Key (MobSF)", "High", "Another key")
                    .with_source("mobsf"),
            ])
            .with_dynamic_findings(vec![
                Finding::new("Permission Abuse (Device)", "Medium", "").with_source("device")
            ])
    }

    #[test]
    fn test_sarif_generation_basic() {
        let sarif = generate_sarif_report(&report());

        assert_eq!(sarif.version, "2.1.0");
        assert_eq!(sarif.runs.len(), 1);

        let run = &sarif.runs[0];
        assert_eq!(run.tool.driver.name, "AppSentinel");
        assert_eq!(run.tool.driver.rules.as_ref().unwrap().len(), 2);

        let results = run.results.as_ref().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].rule_id.as_deref(), Some("mobsf/hardcoded-api-key-mobsf"));
        assert_eq!(results[1].rule_index, Some(0));
        assert_eq!(results[2].rule_index, Some(1));
        assert_eq!(results[2].message.text.as_deref(), Some("Permission Abuse (Device)"));
        assert_eq!(results[0].locations.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_severity_mapping() {
        assert!(matches!(
            severity_to_level(&Severity::High),
            ResultLevel::Error
        ));
        assert!(matches!(
            severity_to_level(&Severity::Medium),
            ResultLevel::Warning
        ));
        assert!(matches!(
            severity_to_level(&Severity::Low),
            ResultLevel::Note
        ));
        assert!(matches!(
            severity_to_level(&Severity::Info),
            ResultLevel::Note
        ));
    }

    #[test]
    fn test_fingerprints_are_stable_and_distinct() {
        let first = generate_sarif_report(&report());
        let second = generate_sarif_report(&report());
        let prints = |sarif: &Sarif| -> Vec<String> {
            sarif.runs[0]
                .results
                .as_ref()
                .unwrap()
                .iter()
                .map(|r| r.partial_fingerprints.as_ref().unwrap()["primaryLocationLineHash"].clone())
                .collect()
        };

        assert_eq!(prints(&first), prints(&second));
        assert_ne!(prints(&first)[0], prints(&first)[1]);
    }

    #[test]
    fn test_rule_id_without_source() {
        let finding = Finding::new("  Weak -- Crypto!  ", "Low", "");
        assert_eq!(rule_id(&finding), "unknown/weak-crypto");
    }

    #[test]
    fn test_sarif_empty_report() {
        let sarif = generate_sarif_report(&Report::new(Local::now()));

        assert_eq!(sarif.version, "2.1.0");
        assert_eq!(sarif.runs.len(), 1);
        assert!(sarif.runs[0].results.as_ref().unwrap().is_empty());
    }
}

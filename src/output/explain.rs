use crate::models::Finding;

const DATA_EXPOSURE: &str =
    "Sensitive information is embedded directly in the app, which attackers can extract.";
const PERMISSION_EXPOSURE: &str =
    "The app requests or uses permissions that could expose user data or device features.";
const WEAK_CRYPTO: &str =
    "Weak or outdated encryption methods make it easier for attackers to access data.";
const INSECURE_TRANSPORT: &str =
    "Data is sent over the network in an insecure way, which could be intercepted.";
const SESSION_HIJACK: &str =
    "Session management is weak, making it easier for attackers to hijack user sessions.";
const NO_DETAILS: &str = "See above.";

/// Keyword rules over the finding name, first match wins.
const RULES: &[(&[&str], &str)] = &[
    (&["hardcoded"], DATA_EXPOSURE),
    (&["permission"], PERMISSION_EXPOSURE),
    (&["cryptography"], WEAK_CRYPTO),
    (&["api call", "network"], INSECURE_TRANSPORT),
    (&["session"], SESSION_HIJACK),
];

/// Plain-language explanation of a finding for non-specialist readers.
pub fn explain(finding: &Finding) -> &str {
    let name = finding.name.to_lowercase();

    for (keywords, explanation) in RULES {
        if keywords.iter().any(|keyword| name.contains(keyword)) {
            return explanation;
        }
    }

    if finding.description.is_empty() {
        NO_DETAILS
    } else {
        &finding.description
    }
}

use crate::device::bridge::DeviceBridge;
use crate::models::{ArtifactType, Finding};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

/// Dump the device log for the artifact's platform and parse it. A bridge
/// failure is returned as its message, never parsed as log output.
pub async fn capture_runtime_logs(
    bridge: &DeviceBridge,
    artifact: ArtifactType,
) -> Result<Vec<LogEntry>, String> {
    let output = match artifact {
        ArtifactType::Apk => {
            let mut args = Vec::new();
            if let Some(device_id) = bridge.device_id() {
                args.extend(["-s", device_id]);
            }
            args.extend(["logcat", "-d"]);
            bridge.adb(&args).await?
        }
        ArtifactType::Ipa => {
            bridge
                .xcrun(&[
                    "simctl", "spawn", "booted", "log", "show", "--last", "1m", "--style",
                    "compact",
                ])
                .await?
        }
    };

    Ok(parse_log_output(&output))
}

/// Parse `logcat -v threadtime` lines
/// (`MM-DD HH:MM:SS.mmm PID TID L TAG: message`). Anything else becomes an
/// `INFO` entry carrying the raw line.
pub fn parse_log_output(output: &str) -> Vec<LogEntry> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("---------"))
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> LogEntry {
    parse_threadtime(line).unwrap_or_else(|| LogEntry {
        timestamp: String::new(),
        level: "INFO".to_string(),
        message: line.to_string(),
    })
}

fn parse_threadtime(line: &str) -> Option<LogEntry> {
    let (date, rest) = next_field(line)?;
    let (time, rest) = next_field(rest)?;
    let (_pid, rest) = next_field(rest)?;
    let (_tid, rest) = next_field(rest)?;
    let (level, rest) = next_field(rest)?;

    if !date.contains('-') || !time.contains(':') {
        return None;
    }
    let level = level_name(level)?;
    let rest = rest.trim_start();
    let message = rest.split_once(": ").map(|(_, msg)| msg).unwrap_or(rest);

    Some(LogEntry {
        timestamp: time.to_string(),
        level: level.to_string(),
        message: message.to_string(),
    })
}

fn next_field(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    Some(s.split_once(char::is_whitespace).unwrap_or((s, "")))
}

fn level_name(code: &str) -> Option<&'static str> {
    match code {
        "V" => Some("VERBOSE"),
        "D" => Some("DEBUG"),
        "I" => Some("INFO"),
        "W" => Some("WARNING"),
        "E" => Some("ERROR"),
        "F" | "A" => Some("FATAL"),
        _ => None,
    }
}

/// Flag cleartext network calls and runtime permission use.
/// Both rules may fire for the same entry.
pub fn analyze_logs(entries: &[LogEntry]) -> Vec<Finding> {
    let mut findings = Vec::new();

    for entry in entries {
        if entry.message.contains("http://") {
            findings.push(Finding::new(
                "Insecure Network Call",
                "High",
                &format!("Unencrypted network call detected: {}", entry.message),
            ));
        }
        if entry.message.contains("Permission") {
            findings.push(Finding::new(
                "Permission Abuse",
                "Medium",
                &format!("Sensitive permission used: {}", entry.message),
            ));
        }
    }

    findings
}

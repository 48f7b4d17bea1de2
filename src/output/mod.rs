pub mod charts;
pub mod explain;
pub mod html;
pub mod pdf;
pub mod sarif;

pub use explain::explain;

use crate::models::{Report, SeverityCounts};
use charts::{severity_bar, severity_pie, Chart};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

/// Default file name for PDF reports.
pub const PDF_FILE_NAME: &str = "vulnerability_report.pdf";

const PIE_CAPTION: &str = "Severity Distribution (Pie)";
const BAR_CAPTION: &str = "Severity Distribution (Bar)";
const PIE_WIDTH: f32 = 300.0;
const BAR_WIDTH: f32 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Html,
    Pdf,
    Json,
    Sarif,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Ok(ReportFormat::Html),
            "pdf" => Ok(ReportFormat::Pdf),
            "json" => Ok(ReportFormat::Json),
            "sarif" => Ok(ReportFormat::Sarif),
            _ => Err(format!("Invalid report format: {}", s)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Html => write!(f, "Html"),
            ReportFormat::Pdf => write!(f, "Pdf"),
            ReportFormat::Json => write!(f, "Json"),
            ReportFormat::Sarif => write!(f, "Sarif"),
        }
    }
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Pdf => "pdf",
            ReportFormat::Json => "json",
            ReportFormat::Sarif => "sarif",
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("chart rendering failed: {0}")]
    Chart(String),
    #[error("PDF construction failed: {0}")]
    Pdf(String),
}

/// Output of [`render`]. A PDF request that could not be honored comes
/// back as `Markup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportDocument {
    Markup(String),
    Pdf(Vec<u8>),
}

impl ReportDocument {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportDocument::Markup(_) => "html",
            ReportDocument::Pdf(_) => "pdf",
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ReportDocument::Markup(html) => html.as_bytes(),
            ReportDocument::Pdf(bytes) => bytes,
        }
    }
}

/// Render the human-readable report. Never fails: a PDF that cannot be
/// built is replaced by the HTML document.
pub fn render(report: &Report, format: &ReportFormat) -> ReportDocument {
    // Counting runs over static and dynamic findings together, the
    // sections below still list them separately.
    let counts = report.summary();
    debug!(summary = %counts.summary_line(), "Rendering report");

    let pie = severity_pie(&counts);
    let bar = severity_bar(&counts);
    render_with_charts(report, &counts, format, &pie, &bar)
}

fn render_with_charts(
    report: &Report,
    counts: &SeverityCounts,
    format: &ReportFormat,
    pie: &Chart,
    bar: &Chart,
) -> ReportDocument {
    let markup = html::render_html(report, counts, &[(PIE_CAPTION, pie), (BAR_CAPTION, bar)]);
    if *format != ReportFormat::Pdf {
        return ReportDocument::Markup(markup);
    }

    match pdf::render_pdf(
        report,
        counts,
        &[(PIE_CAPTION, pie, PIE_WIDTH), (BAR_CAPTION, bar, BAR_WIDTH)],
    ) {
        Ok(bytes) => ReportDocument::Pdf(bytes),
        Err(e) => {
            warn!(error = %e, "PDF generation failed, falling back to HTML");
            ReportDocument::Markup(markup)
        }
    }
}

/// JSON shape: the report plus its severity counts.
#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a Report,
    summary: SeverityCounts,
}

/// Write the report in the requested format. With no output path, text
/// formats go to stdout and PDF goes to `vulnerability_report.pdf`.
/// Returns the path written, if any.
pub fn generate_report(
    report: &Report,
    format: &ReportFormat,
    output: Option<PathBuf>,
) -> io::Result<Option<PathBuf>> {
    match format {
        ReportFormat::Json => {
            let json = JsonReport {
                report,
                summary: report.summary(),
            };
            if let Some(path) = output {
                let path_with_extension = path.with_extension("json");
                let file = File::create(&path_with_extension)?;
                serde_json::to_writer_pretty(file, &json)?;
                return Ok(Some(path_with_extension));
            }
            let stdout = io::stdout();
            let handle = stdout.lock();
            serde_json::to_writer_pretty(handle, &json)?;
            println!();
        }
        ReportFormat::Sarif => {
            let sarif = sarif::generate_sarif_report(report);
            if let Some(path) = output {
                let path_with_extension = path.with_extension("sarif");
                let file = File::create(&path_with_extension)?;
                serde_json::to_writer_pretty(file, &sarif)?;
                return Ok(Some(path_with_extension));
            }
            let stdout = io::stdout();
            let handle = stdout.lock();
            serde_json::to_writer_pretty(handle, &sarif)?;
            println!();
        }
        ReportFormat::Html | ReportFormat::Pdf => {
            return write_document(&render(report, format), output);
        }
    }

    Ok(None)
}

/// The file extension follows the document actually produced, so a PDF
/// request that fell back to markup is written as `.html`.
fn write_document(document: &ReportDocument, output: Option<PathBuf>) -> io::Result<Option<PathBuf>> {
    let path = match (output, document) {
        (Some(path), _) => path.with_extension(document.extension()),
        (None, ReportDocument::Pdf(_)) => PathBuf::from(PDF_FILE_NAME),
        (None, ReportDocument::Markup(html)) => {
            println!("{}", html);
            return Ok(None);
        }
    };

    let mut file = File::create(&path)?;
    file.write_all(document.as_bytes())?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Finding, Report};
    use chrono::Local;

    fn report() -> Report {
        Report::new(Local::now())
            .with_static_findings(vec![Finding::new("Hardcoded API Key", "High", "...")])
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("HTML".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert_eq!("htm".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert_eq!("pdf".parse::<ReportFormat>().unwrap(), ReportFormat::Pdf);
        assert_eq!("Sarif".parse::<ReportFormat>().unwrap(), ReportFormat::Sarif);
        assert_eq!(
            "docx".parse::<ReportFormat>().unwrap_err(),
            "Invalid report format: docx"
        );
    }

    #[test]
    fn test_render_markup() {
        let document = render(&report(), &ReportFormat::Html);
        match document {
            ReportDocument::Markup(html) => {
                assert!(html.contains("Total: 1 | High: 1 | Medium: 0 | Low: 0"));
                assert!(html.contains("No dynamic vulnerabilities found."));
            }
            ReportDocument::Pdf(_) => panic!("expected markup"),
        }
    }

    #[test]
    fn test_render_pdf() {
        let document = render(&report(), &ReportFormat::Pdf);
        assert_eq!(document.extension(), "pdf");
        assert!(document.as_bytes().starts_with(b"%PDF"));
    }

    fn broken_chart() -> Chart {
        Chart {
            width: 10,
            height: 10,
            pixels: vec![0; 5],
        }
    }

    #[test]
    fn test_pdf_failure_falls_back_to_markup() {
        let report = report();
        let counts = report.summary();
        let chart = broken_chart();

        let document = render_with_charts(&report, &counts, &ReportFormat::Pdf, &chart, &chart);
        assert_eq!(document.extension(), "html");
        match document {
            ReportDocument::Markup(html) => {
                assert!(html.contains("Static Analysis Results"));
                assert!(html.contains("Dynamic Analysis Results"));
                assert!(html.contains("Hardcoded API Key"));
            }
            ReportDocument::Pdf(_) => panic!("expected markup"),
        }
    }

    #[test]
    fn test_fallback_document_written_as_html() {
        let dir = tempfile::tempdir().unwrap();
        let report = report();
        let chart = broken_chart();
        let document =
            render_with_charts(&report, &report.summary(), &ReportFormat::Pdf, &chart, &chart);

        let path = write_document(&document, Some(dir.path().join("scan")))
            .unwrap()
            .unwrap();

        assert_eq!(path, dir.path().join("scan.html"));
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(!dir.path().join("scan.pdf").exists());
    }

    #[test]
    fn test_generate_pdf_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = generate_report(
            &report(),
            &ReportFormat::Pdf,
            Some(dir.path().join("scan")),
        )
        .unwrap()
        .unwrap();

        assert_eq!(path, dir.path().join("scan.pdf"));
        assert!(std::fs::read(path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_generate_html_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = generate_report(
            &report(),
            &ReportFormat::Html,
            Some(dir.path().join("scan")),
        )
        .unwrap()
        .unwrap();

        assert_eq!(path, dir.path().join("scan.html"));
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_generate_json_includes_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = generate_report(
            &report(),
            &ReportFormat::Json,
            Some(dir.path().join("scan")),
        )
        .unwrap()
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["summary"]["high"], 1);
        assert_eq!(value["static_findings"][0]["name"], "Hardcoded API Key");
        assert_eq!(value["static_findings"][0]["severity"], "High");
        assert_eq!(value["title"], "Mobile App Vulnerability Report");
    }

    #[test]
    fn test_generate_sarif_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = generate_report(
            &report(),
            &ReportFormat::Sarif,
            Some(dir.path().join("scan.out")),
        )
        .unwrap()
        .unwrap();

        assert_eq!(path.extension().unwrap(), "sarif");
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["version"], "2.1.0");
    }
}

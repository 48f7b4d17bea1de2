//! Self-contained HTML report with inline base64 chart images.

use crate::models::{AnalysisClass, Finding, Report, SeverityCounts};
use crate::output::charts::{legend, Chart};
use crate::output::explain::explain;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::warn;

const TEMPLATE: &str = include_str!("templates/report.html");

pub fn render_html(report: &Report, counts: &SeverityCounts, charts: &[(&str, &Chart)]) -> String {
    let metadata = build_metadata(report);
    let chart_images = build_chart_images(charts, counts);
    let static_findings = build_section(report, AnalysisClass::Static);
    let dynamic_findings = build_section(report, AnalysisClass::Dynamic);

    fill_template(
        TEMPLATE,
        &[
            ("TITLE", escape_html(&report.title)),
            ("TIMESTAMP", report.timestamp()),
            ("METADATA", metadata),
            ("SUMMARY", counts.summary_line()),
            ("CHARTS", chart_images),
            ("STATIC_FINDINGS", static_findings),
            ("DYNAMIC_FINDINGS", dynamic_findings),
        ],
    )
}

/// Substitute `{{KEY}}` placeholders in one pass, so inserted values are
/// never scanned for placeholders themselves. Unknown keys are left as is.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

fn build_metadata(report: &Report) -> String {
    let Some(metadata) = &report.metadata else {
        return String::new();
    };

    format!(
        "<div class=\"metadata\">\n<p><b>App Name:</b> {}</p>\n<p><b>Size:</b> {}</p>\n<p><b>Type:</b> {}</p>\n</div>",
        escape_html(&metadata.filename),
        escape_html(&metadata.size_display),
        metadata.artifact_type
    )
}

/// One figure per chart: the image, its caption and a color legend.
fn build_chart_images(charts: &[(&str, &Chart)], counts: &SeverityCounts) -> String {
    let legend = build_legend(counts);
    let mut figures = String::new();

    for (caption, chart) in charts {
        figures.push_str("<figure>\n");
        match chart.to_png() {
            Ok(png) => figures.push_str(&format!(
                "<img src=\"data:image/png;base64,{}\" width=\"{}\" alt=\"{}\"/>\n",
                STANDARD.encode(png),
                chart.width,
                escape_html(caption)
            )),
            Err(e) => warn!(chart = *caption, error = %e, "Chart encoding failed, omitting image"),
        }
        figures.push_str(&format!("<figcaption>{}</figcaption>\n", escape_html(caption)));
        figures.push_str(&legend);
        figures.push_str("</figure>\n");
    }

    figures
}

fn build_legend(counts: &SeverityCounts) -> String {
    let mut list = String::from("<ul class=\"legend\">\n");
    for (severity, text) in legend(counts) {
        list.push_str(&format!(
            "<li><span class=\"swatch\" style=\"background:{}\"></span>{}</li>\n",
            severity.hex_color(),
            text
        ));
    }
    list.push_str("</ul>\n");
    list
}

fn build_section(report: &Report, class: AnalysisClass) -> String {
    let findings = report.findings(class);
    if findings.is_empty() {
        return format!("<p>No {} vulnerabilities found.</p>", class);
    }

    let mut section = String::from("<ul>\n");
    for finding in findings {
        section.push_str(&build_entry(finding));
    }
    section.push_str("</ul>");
    section
}

fn build_entry(finding: &Finding) -> String {
    format!(
        "<li><b>{}</b> [<span class='severity-{}'>{}</span>]<br/>{}</li>\n",
        escape_html(&finding.name),
        finding.severity.css_class(),
        escape_html(&finding.severity_label()),
        escape_html(explain(finding))
    )
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

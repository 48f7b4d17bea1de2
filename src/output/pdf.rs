//! Paginated PDF rendition of the report, built directly with `lopdf`.
//!
//! Letter pages with Helvetica text. Long lines are wrapped on an
//! approximate glyph width and content flows onto new pages as the cursor
//! reaches the bottom margin. Charts are embedded as raw RGB image XObjects,
//! each followed by a legend of colored swatches.

use crate::models::{AnalysisClass, Report, SeverityCounts};
use crate::output::charts::{legend, Chart};
use crate::output::explain::explain;
use crate::output::RenderError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;
const BODY_SIZE: f32 = 10.0;
const HEADING_SIZE: f32 = 18.0;
const SECTION_SIZE: f32 = 14.0;
const LEADING: f32 = 1.3;
// Rough Helvetica average advance, in em
const GLYPH_WIDTH: f32 = 0.5;
const SWATCH_SIZE: f32 = 8.0;

#[derive(Debug, Clone, PartialEq)]
enum Block {
    Heading { text: String, size: f32 },
    Paragraph(String),
    Spacer(f32),
    Image { name: String, width: f32, height: f32 },
    LegendItem { color: [u8; 3], text: String },
}

/// Build the PDF bytes. `charts` pairs a caption with the chart and the
/// width in points it is drawn at.
pub fn render_pdf(
    report: &Report,
    counts: &SeverityCounts,
    charts: &[(&str, &Chart, f32)],
) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");

    let mut xobjects = lopdf::Dictionary::new();
    let mut images = Vec::with_capacity(charts.len());
    for (i, (caption, chart, width)) in charts.iter().enumerate() {
        let name = format!("Im{}", i);
        let id = add_image(&mut doc, chart)?;
        xobjects.set(name.as_bytes().to_vec(), Object::Reference(id));
        let height = width * chart.height as f32 / chart.width as f32;
        images.push((*caption, name, *width, height));
    }

    let blocks = compose(report, counts, &images);
    let pages = layout(&blocks);

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => Object::Reference(regular),
            "F2" => Object::Reference(bold),
        },
        "XObject" => xobjects,
    });

    let pages_id = doc.new_object_id();
    let mut kids = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations }
            .encode()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let mut stream = Stream::new(lopdf::Dictionary::new(), content);
        if let Err(e) = stream.compress() {
            debug!(error = %e, "Page content stored uncompressed");
        }
        let content_id = doc.add_object(stream);

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "Contents" => Object::Reference(content_id),
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        (PAGE_WIDTH as i64).into(),
        (PAGE_HEIGHT as i64).into(),
    ];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => Object::Reference(resources),
            "MediaBox" => media_box,
        }),
    );

    let catalog = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog));

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(bytes)
}

fn add_image(doc: &mut Document, chart: &Chart) -> Result<ObjectId, RenderError> {
    let expected = (chart.width * chart.height * 3) as usize;
    if chart.pixels.len() != expected || chart.width == 0 {
        return Err(RenderError::Chart(format!(
            "expected {} RGB bytes, got {}",
            expected,
            chart.pixels.len()
        )));
    }

    let mut stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => chart.width as i64,
            "Height" => chart.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        chart.pixels.clone(),
    );
    if let Err(e) = stream.compress() {
        debug!(error = %e, "Chart image stored uncompressed");
    }
    Ok(doc.add_object(stream))
}

/// Same content and order as the HTML document.
fn compose(
    report: &Report,
    counts: &SeverityCounts,
    images: &[(&str, String, f32, f32)],
) -> Vec<Block> {
    let mut blocks = vec![
        Block::Heading {
            text: report.title.clone(),
            size: HEADING_SIZE,
        },
        Block::Spacer(12.0),
        Block::Paragraph(format!("Generated: {}", report.timestamp())),
    ];

    if let Some(metadata) = &report.metadata {
        blocks.push(Block::Paragraph(format!("App Name: {}", metadata.filename)));
        blocks.push(Block::Paragraph(format!("Size: {}", metadata.size_display)));
        blocks.push(Block::Paragraph(format!("Type: {}", metadata.artifact_type)));
    }

    blocks.push(Block::Spacer(12.0));
    blocks.push(Block::Heading {
        text: "Summary".to_string(),
        size: SECTION_SIZE,
    });
    blocks.push(Block::Paragraph(counts.summary_line()));

    for (caption, name, width, height) in images {
        blocks.push(Block::Spacer(12.0));
        blocks.push(Block::Paragraph(caption.to_string()));
        blocks.push(Block::Image {
            name: name.clone(),
            width: *width,
            height: *height,
        });
        for (severity, text) in legend(counts) {
            blocks.push(Block::LegendItem {
                color: severity.color(),
                text,
            });
        }
    }

    for class in AnalysisClass::ALL {
        blocks.push(Block::Spacer(12.0));
        blocks.push(Block::Heading {
            text: format!("{} Results", class.title()),
            size: SECTION_SIZE,
        });

        let findings = report.findings(class);
        if findings.is_empty() {
            blocks.push(Block::Paragraph(format!(
                "No {} vulnerabilities found.",
                class
            )));
        }
        for finding in findings {
            blocks.push(Block::Paragraph(format!(
                "{} [{}]",
                finding.name,
                finding.severity_label()
            )));
            blocks.push(Block::Paragraph(explain(finding).to_string()));
        }
    }

    blocks
}

/// Flow blocks onto pages, returning the content operations per page.
fn layout(blocks: &[Block]) -> Vec<Vec<Operation>> {
    let mut cursor = PageCursor::new();

    for block in blocks {
        match block {
            Block::Heading { text, size } => cursor.text(text, "F2", *size),
            Block::Paragraph(text) => cursor.text(text, "F1", BODY_SIZE),
            Block::Spacer(height) => cursor.advance(*height),
            Block::Image {
                name,
                width,
                height,
            } => cursor.image(name, *width, *height),
            Block::LegendItem { color, text } => cursor.legend_item(*color, text),
        }
    }

    cursor.finish()
}

struct PageCursor {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: f32,
}

impl PageCursor {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn break_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn ensure(&mut self, height: f32) {
        let at_top = self.y >= PAGE_HEIGHT - MARGIN;
        if self.y - height < MARGIN && !at_top {
            self.break_page();
        }
    }

    fn advance(&mut self, height: f32) {
        if self.y - height < MARGIN {
            self.break_page();
        } else {
            self.y -= height;
        }
    }

    fn text(&mut self, text: &str, font: &str, size: f32) {
        let line_height = size * LEADING;
        let max_chars = ((PAGE_WIDTH - 2.0 * MARGIN) / (size * GLYPH_WIDTH)) as usize;

        for line in wrap(text, max_chars) {
            self.ensure(line_height);
            self.y -= line_height;
            self.current.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![font.into(), (size as i64).into()]),
                Operation::new(
                    "Td",
                    vec![(MARGIN as i64).into(), (self.y.round() as i64).into()],
                ),
                Operation::new("Tj", vec![Object::string_literal(latin1(&line))]),
                Operation::new("ET", vec![]),
            ]);
        }
    }

    fn image(&mut self, name: &str, width: f32, height: f32) {
        self.ensure(height);
        self.y -= height;
        self.current.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    (width.round() as i64).into(),
                    0.into(),
                    0.into(),
                    (height.round() as i64).into(),
                    (MARGIN as i64).into(),
                    (self.y.round() as i64).into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// A filled square in `color` followed by the label on the same line.
    fn legend_item(&mut self, color: [u8; 3], text: &str) {
        let line_height = BODY_SIZE * LEADING;
        self.ensure(line_height);
        self.y -= line_height;
        let [r, g, b] = color.map(|c| c as f32 / 255.0);
        self.current.extend([
            Operation::new("q", vec![]),
            Operation::new("rg", vec![r.into(), g.into(), b.into()]),
            Operation::new(
                "re",
                vec![
                    (MARGIN as i64).into(),
                    (self.y.round() as i64).into(),
                    (SWATCH_SIZE as i64).into(),
                    (SWATCH_SIZE as i64).into(),
                ],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), (BODY_SIZE as i64).into()]),
            Operation::new(
                "Td",
                vec![
                    ((MARGIN + SWATCH_SIZE + 6.0) as i64).into(),
                    (self.y.round() as i64).into(),
                ],
            ),
            Operation::new("Tj", vec![Object::string_literal(latin1(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

/// Greedy word wrap. Words longer than a line are split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let word: String = word.into_iter().collect();
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&word);
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// The standard Type1 fonts only cover a single-byte encoding.
fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Finding, Severity};
    use crate::output::charts::{severity_bar, severity_pie};
    use chrono::{Local, TimeZone};

    fn report() -> Report {
        Report::new(Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap())
            .with_static_findings(vec![Finding::new("Hardcoded API Key", "High", "...")])
    }

    fn paragraphs(blocks: &[Block]) -> Vec<&str> {
        blocks
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph(text) => Some(text.as_str()),
                Block::Heading { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_render_pdf_produces_document() {
        let report = report();
        let counts = report.summary();
        let pie = severity_pie(&counts);
        let bar = severity_bar(&counts);

        let bytes = render_pdf(
            &report,
            &counts,
            &[("Pie", &pie, 300.0), ("Bar", &bar, 400.0)],
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        // Second chart does not fit under the first
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_compose_order_and_markers() {
        let report = report();
        let blocks = compose(&report, &report.summary(), &[]);
        let text = paragraphs(&blocks);

        assert_eq!(text[0], "Mobile App Vulnerability Report");
        assert!(text[1].starts_with("Generated: 2024-03-01"));
        let summary = text
            .iter()
            .position(|t| *t == "Total: 1 | High: 1 | Medium: 0 | Low: 0")
            .unwrap();
        let static_heading = text
            .iter()
            .position(|t| *t == "Static Analysis Results")
            .unwrap();
        let entry = text
            .iter()
            .position(|t| *t == "Hardcoded API Key [High]")
            .unwrap();
        let dynamic_heading = text
            .iter()
            .position(|t| *t == "Dynamic Analysis Results")
            .unwrap();
        assert!(summary < static_heading && static_heading < entry && entry < dynamic_heading);
        assert_eq!(text.last(), Some(&"No dynamic vulnerabilities found."));
    }

    #[test]
    fn test_legend_follows_each_chart() {
        let report = report().with_dynamic_findings(vec![
            Finding::new("Weak Hashing", "Low", ""),
            Finding::new("Debug Log", "Low", ""),
            Finding::new("Exported Activity", "Medium", ""),
        ]);
        let images = [
            ("Pie", "Im0".to_string(), 300.0, 300.0),
            ("Bar", "Im1".to_string(), 400.0, 300.0),
        ];
        let blocks = compose(&report, &report.summary(), &images);

        let expected = [
            (Severity::High.color(), "High: 1 (25.0%)"),
            (Severity::Medium.color(), "Medium: 1 (25.0%)"),
            (Severity::Low.color(), "Low: 2 (50.0%)"),
            (Severity::Info.color(), "Info: 0 (0.0%)"),
        ];
        let image_positions: Vec<usize> = blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| matches!(block, Block::Image { .. }))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(image_positions.len(), 2);

        for position in image_positions {
            let rows: Vec<([u8; 3], &str)> = blocks[position + 1..position + 5]
                .iter()
                .filter_map(|block| match block {
                    Block::LegendItem { color, text } => Some((*color, text.as_str())),
                    _ => None,
                })
                .collect();
            assert_eq!(rows, expected.to_vec());
        }
    }

    #[test]
    fn test_legend_item_draws_swatch_and_label() {
        let blocks = [Block::LegendItem {
            color: [0xff, 0x00, 0x00],
            text: "High: 1 (100.0%)".to_string(),
        }];
        let pages = layout(&blocks);
        let operators: Vec<&str> = pages[0].iter().map(|op| op.operator.as_str()).collect();

        assert_eq!(
            operators,
            vec!["q", "rg", "re", "f", "Q", "BT", "Tf", "Td", "Tj", "ET"]
        );
        assert_eq!(pages[0][1].operands[0], Object::Real(1.0));
        assert_eq!(
            pages[0][8].operands[0],
            Object::string_literal(b"High: 1 (100.0%)".to_vec())
        );
    }

    #[test]
    fn test_chart_images_are_compressed() {
        let report = report();
        let counts = report.summary();
        let pie = severity_pie(&counts);

        let bytes = render_pdf(&report, &counts, &[("Pie", &pie, 300.0)]).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let images: Vec<&Stream> = doc
            .objects
            .values()
            .filter_map(|object| object.as_stream().ok())
            .filter(|stream| {
                stream.dict.get(b"Subtype").and_then(Object::as_name).ok() == Some(b"Image".as_slice())
            })
            .collect();

        assert_eq!(images.len(), 1);
        assert_eq!(
            images[0].dict.get(b"Filter").and_then(Object::as_name).ok(),
            Some(b"FlateDecode".as_slice())
        );
    }

    #[test]
    fn test_long_reports_paginate() {
        let findings = (0..120)
            .map(|i| Finding::new(&format!("Finding {}", i), "Low", "details"))
            .collect();
        let report = report().with_dynamic_findings(findings);
        let blocks = compose(&report, &report.summary(), &[]);

        assert!(layout(&blocks).len() > 1);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("aaa bbb ccc", 7), vec!["aaa bbb", "ccc"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("", 10), vec![""]);
    }

    #[test]
    fn test_latin1_replaces_wide_chars() {
        assert_eq!(latin1("Café ✓"), vec![b'C', b'a', b'f', 0xe9, b' ', b'?']);
    }

    #[test]
    fn test_bad_chart_is_an_error() {
        let report = report();
        let chart = Chart {
            width: 10,
            height: 10,
            pixels: vec![0; 5],
        };
        let result = render_pdf(&report, &report.summary(), &[("Broken", &chart, 100.0)]);
        assert!(matches!(result, Err(RenderError::Chart(_))));
    }
}

//! Severity charts rasterized in-process.
//!
//! Both charts use the fixed category order `[High, Medium, Low, Info]` and
//! the category colors from [`Severity::color`]. Output is deterministic for
//! a given set of counts.

use crate::models::{Severity, SeverityCounts};

const BACKGROUND: [u8; 3] = [0xff, 0xff, 0xff];
const AXIS: [u8; 3] = [0x33, 0x33, 0x33];
const GRID: [u8; 3] = [0xe5, 0xe5, 0xe5];

pub const PIE_SIZE: u32 = 300;
pub const BAR_WIDTH: u32 = 400;
pub const BAR_HEIGHT: u32 = 300;

/// An RGB8 raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chart {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Chart {
    fn new(width: u32, height: u32) -> Self {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&BACKGROUND);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    fn put(&mut self, x: u32, y: u32, color: [u8; 3]) {
        if x < self.width && y < self.height {
            let offset = ((y * self.width + x) * 3) as usize;
            self.pixels[offset..offset + 3].copy_from_slice(&color);
        }
    }

    fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, color: [u8; 3]) {
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                self.put(x, y, color);
            }
        }
    }

    pub fn to_png(&self) -> Result<Vec<u8>, png::EncodingError> {
        let mut buffer = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buffer, self.width, self.height);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.pixels)?;
            writer.finish()?;
        }
        Ok(buffer)
    }
}

/// Proportional chart. Slices start at 12 o'clock and run counter-clockwise.
/// With no findings an empty gray ring is drawn.
pub fn severity_pie(counts: &SeverityCounts) -> Chart {
    let mut chart = Chart::new(PIE_SIZE, PIE_SIZE);
    let center = PIE_SIZE as f64 / 2.0;
    let radius = center - 30.0;
    let total = counts.total();

    // Cumulative slice boundaries in degrees from the start angle
    let mut bounds = Vec::with_capacity(4);
    let mut acc = 0.0;
    for (severity, count) in counts.series() {
        if count == 0 {
            continue;
        }
        acc += 360.0 * count as f64 / total as f64;
        bounds.push((acc, severity.color()));
    }

    for y in 0..PIE_SIZE {
        for x in 0..PIE_SIZE {
            let dx = x as f64 + 0.5 - center;
            let dy = center - (y as f64 + 0.5);
            let distance = (dx * dx + dy * dy).sqrt();
            if distance > radius {
                continue;
            }

            if total == 0 {
                if distance >= radius - 2.0 {
                    chart.put(x, y, Severity::Info.color());
                }
                continue;
            }

            let angle = dy.atan2(dx).to_degrees();
            let offset = (angle - 90.0).rem_euclid(360.0);
            let color = bounds
                .iter()
                .find(|(end, _)| offset < *end)
                .or(bounds.last())
                .map(|(_, color)| *color)
                .unwrap_or(BACKGROUND);
            chart.put(x, y, color);
        }
    }

    chart
}

/// Legend rows in chart order, e.g. `High: 2 (40.0%)`. Shares are 0.0%
/// when there are no findings.
pub fn legend(counts: &SeverityCounts) -> Vec<(Severity, String)> {
    let total = counts.total();
    counts
        .series()
        .iter()
        .map(|(severity, count)| {
            let share = if total == 0 {
                0.0
            } else {
                *count as f64 * 100.0 / total as f64
            };
            (*severity, format!("{}: {} ({:.1}%)", severity, count, share))
        })
        .collect()
}

/// Magnitude chart, one bar per severity scaled to the largest count.
pub fn severity_bar(counts: &SeverityCounts) -> Chart {
    let mut chart = Chart::new(BAR_WIDTH, BAR_HEIGHT);
    let (left, right, top, bottom) = (40u32, BAR_WIDTH - 20, 20u32, BAR_HEIGHT - 30);
    let plot_height = (bottom - top) as f64;

    let series = counts.series();
    let max = series.iter().map(|(_, count)| *count).max().unwrap_or(0).max(1);

    for step in 1..=4u32 {
        let y = bottom - ((bottom - top) * step) / 4;
        chart.fill_rect(left + 1, y, right, y + 1, GRID);
    }

    let slot = (right - left) / series.len() as u32;
    let bar_width = slot * 3 / 5;
    for (i, (severity, count)) in series.iter().enumerate() {
        if *count == 0 {
            continue;
        }
        let x0 = left + slot * i as u32 + (slot - bar_width) / 2;
        let bar_height = ((*count as f64 / max as f64) * plot_height).round() as u32;
        chart.fill_rect(x0, bottom - bar_height, x0 + bar_width, bottom, severity.color());
    }

    chart.fill_rect(left, top, left + 1, bottom + 1, AXIS);
    chart.fill_rect(left, bottom, right, bottom + 1, AXIS);

    chart
}

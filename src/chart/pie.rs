//! Pie chart rendering.

use std::f64::consts::TAU;
use std::fmt::Write;

use super::palette;
use crate::common::svg::{
    Anchor, write_attr, write_document_end, write_document_start, write_num, write_num_attr, write_text,
};
use crate::common::{Error, Result};

const TITLE_BAND: f64 = 60.0;
const TITLE_FONT: f64 = 20.0;
const LABEL_FONT: f64 = 14.0;
const PERCENT_FONT: f64 = 13.0;

/// A pie chart of labelled values.
///
/// Slices are drawn clockwise from twelve o'clock in the order given. Each
/// wedge carries its share as `12.5%` inside and its label outside.
#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<(String, f64)>,
    pub width: f64,
    pub height: f64,
    pub background: String,
}

impl PieChart {
    pub fn new(title: impl Into<String>, slices: Vec<(String, f64)>) -> Self {
        Self {
            title: title.into(),
            slices,
            width: 800.0,
            height: 800.0,
            background: "white".to_string(),
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    /// Render the chart as an SVG document.
    ///
    /// Slices with a zero, negative or non-finite value are left out. A chart
    /// without any positive slice is an error.
    pub fn to_svg(&self) -> Result<String> {
        let slices: Vec<(usize, &str, f64)> = self
            .slices
            .iter()
            .enumerate()
            .filter(|(_, (_, v))| v.is_finite() && *v > 0.0)
            .map(|(i, (label, v))| (i, label.as_str(), *v))
            .collect();
        if slices.is_empty() {
            return Err(Error::NoData(format!("pie chart '{}' has no positive values", self.title)));
        }
        let total: f64 = slices.iter().map(|(_, _, v)| v).sum();

        let cx = self.width / 2.0;
        let cy = TITLE_BAND + (self.height - TITLE_BAND) / 2.0;
        let radius = (self.width.min(self.height - TITLE_BAND) * 0.35).max(1.0);

        let mut svg = String::with_capacity(1024 + slices.len() * 384);
        write_document_start(&mut svg, self.width, self.height, &self.background);
        write_text(&mut svg, cx, TITLE_BAND / 2.0 + TITLE_FONT / 3.0, TITLE_FONT, Anchor::Middle, "#000000", &self.title);

        let mut start = 0.0f64;
        for &(index, label, value) in &slices {
            let fraction = value / total;
            let sweep = fraction * TAU;
            let end = start + sweep;
            let color = palette::categorical(index);

            if slices.len() == 1 {
                svg.push_str("<circle");
                write_num_attr(&mut svg, "cx", cx);
                write_num_attr(&mut svg, "cy", cy);
                write_num_attr(&mut svg, "r", radius);
                write_attr(&mut svg, "fill", color);
                svg.push_str(" stroke=\"white\"/>\n");
            } else {
                let (x0, y0) = polar(cx, cy, radius, start);
                let (x1, y1) = polar(cx, cy, radius, end);
                let large_arc = if sweep > TAU / 2.0 { 1 } else { 0 };
                svg.push_str("<path d=\"M");
                write_point(&mut svg, cx, cy);
                svg.push_str(" L");
                write_point(&mut svg, x0, y0);
                svg.push_str(" A");
                write_point(&mut svg, radius, radius);
                let _ = write!(svg, " 0 {} 1", large_arc);
                write_point(&mut svg, x1, y1);
                svg.push_str(" Z\"");
                write_attr(&mut svg, "fill", color);
                svg.push_str(" stroke=\"white\" stroke-width=\"1\"/>\n");
            }

            let middle = start + sweep / 2.0;
            let (px, py) = polar(cx, cy, radius * 0.6, middle);
            let percent = format!("{:.1}%", fraction * 100.0);
            write_text(&mut svg, px, py + PERCENT_FONT / 3.0, PERCENT_FONT, Anchor::Middle, "#000000", &percent);

            let (lx, ly) = polar(cx, cy, radius * 1.1, middle);
            let anchor = if (lx - cx).abs() < 1.0 {
                Anchor::Middle
            } else if lx > cx {
                Anchor::Start
            } else {
                Anchor::End
            };
            write_text(&mut svg, lx, ly + LABEL_FONT / 3.0, LABEL_FONT, anchor, "#000000", label);

            start = end;
        }

        write_document_end(&mut svg);
        Ok(svg)
    }
}

/// Point at `angle` radians clockwise from twelve o'clock.
fn polar(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
    (cx + r * angle.sin(), cy - r * angle.cos())
}

fn write_point(buf: &mut String, x: f64, y: f64) {
    buf.push(' ');
    write_num(buf, x);
    buf.push(',');
    write_num(buf, y);
}

//! Shared SVG writing helpers for chart output.
//!
//! All functions write directly into a `String` buffer so a chart is built
//! with a single growing allocation.

use std::fmt::Write;

use super::xml::escape_xml;

/// Fast number formatter that writes directly to a string buffer.
///
/// Integers are written without a fractional part, other values are rounded
/// to two decimals with trailing zeros removed.
///
/// # Examples
///
/// ```
/// use excel_chart_generator::common::svg::write_num;
///
/// let mut buf = String::new();
/// write_num(&mut buf, 10.0);
/// buf.push(' ');
/// write_num(&mut buf, 10.5);
/// buf.push(' ');
/// write_num(&mut buf, 10.123);
/// assert_eq!(buf, "10 10.5 10.12");
/// ```
#[inline]
pub fn write_num(buf: &mut String, n: f64) {
    if n.fract() == 0.0 && n.abs() < 1e10 {
        let mut ibuf = itoa::Buffer::new();
        buf.push_str(ibuf.format(n as i64));
        return;
    }

    let rounded = (n * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 && rounded.abs() < 1e10 {
        let mut ibuf = itoa::Buffer::new();
        // -0.001 rounds to -0.0 which must print as 0
        buf.push_str(ibuf.format(rounded as i64));
        return;
    }

    let mut buffer = ryu::Buffer::new();
    let s = buffer.format(rounded);
    if s.contains('.') {
        buf.push_str(s.trim_end_matches('0').trim_end_matches('.'));
    } else {
        buf.push_str(s);
    }
}

/// Write ` name="value"` with the value XML-escaped.
#[inline]
pub fn write_attr(buf: &mut String, name: &str, value: &str) {
    buf.push(' ');
    buf.push_str(name);
    buf.push_str("=\"");
    buf.push_str(&escape_xml(value));
    buf.push('"');
}

/// Write ` name="<number>"`.
#[inline]
pub fn write_num_attr(buf: &mut String, name: &str, value: f64) {
    buf.push(' ');
    buf.push_str(name);
    buf.push_str("=\"");
    write_num(buf, value);
    buf.push('"');
}

/// Text anchor of an SVG `<text>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Write a `<text>` element with escaped content.
pub fn write_text(
    buf: &mut String,
    x: f64,
    y: f64,
    font_size: f64,
    anchor: Anchor,
    fill: &str,
    content: &str,
) {
    buf.push_str("<text");
    write_num_attr(buf, "x", x);
    write_num_attr(buf, "y", y);
    write_num_attr(buf, "font-size", font_size);
    write_attr(buf, "text-anchor", anchor.as_str());
    write_attr(buf, "fill", fill);
    buf.push('>');
    buf.push_str(&escape_xml(content));
    buf.push_str("</text>\n");
}

/// Open an SVG document of the given size with a solid background.
pub fn write_document_start(buf: &mut String, width: f64, height: f64, background: &str) {
    buf.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    buf.push('\n');
    buf.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg""#);
    write_num_attr(buf, "width", width);
    write_num_attr(buf, "height", height);
    buf.push_str(r#" viewBox="0 0 "#);
    write_num(buf, width);
    buf.push(' ');
    write_num(buf, height);
    buf.push_str("\" font-family=\"DejaVu Sans, Helvetica, Arial, sans-serif\">\n");
    let _ = write!(buf, r#"<rect width="100%" height="100%" fill="{}"/>"#, escape_xml(background));
    buf.push('\n');
}

/// Close an SVG document.
pub fn write_document_end(buf: &mut String) {
    buf.push_str("</svg>\n");
}

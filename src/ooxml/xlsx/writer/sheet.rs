//! Worksheet serialization for XLSX output.

use std::fmt::Write as FmtWrite;

use super::strings::MutableSharedStrings;
use super::template::HEADER_STYLE;
use crate::common::{Result, escape_xml};
use crate::ooxml::xlsx::reference::{column_to_letters, coords_to_reference};
use crate::sheet::{CellValue, Table};

/// Error values a spreadsheet application accepts in a `t="e"` cell.
static ERROR_CODES: phf::Set<&'static str> = phf::phf_set! {
    "#NULL!", "#DIV/0!", "#VALUE!", "#REF!", "#NAME?", "#NUM!", "#N/A",
    "#GETTING_DATA", "#SPILL!", "#CALC!", "#FIELD!", "#BLOCKED!", "#CONNECT!",
    "#BUSY!", "#UNKNOWN!",
};

const MIN_COLUMN_WIDTH: f64 = 8.43;
const MAX_COLUMN_WIDTH: f64 = 60.0;

/// A worksheet queued for writing: a header row followed by data rows.
#[derive(Debug, Clone)]
pub struct MutableWorksheet {
    name: String,
    sheet_id: u32,
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl MutableWorksheet {
    /// Build a worksheet from a table.
    pub fn from_table(name: String, sheet_id: u32, table: &Table) -> Self {
        Self {
            name,
            sheet_id,
            headers: table.headers().to_vec(),
            rows: table.rows().to_vec(),
        }
    }

    /// Get the worksheet name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the sheet ID.
    pub fn sheet_id(&self) -> u32 {
        self.sheet_id
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.len())
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    /// Column widths in character units, fitted to the longest text.
    fn column_widths(&self) -> Vec<f64> {
        let mut widths = vec![MIN_COLUMN_WIDTH; self.column_count()];
        let cells = self
            .headers
            .iter()
            .map(|h| h.chars().count())
            .enumerate()
            .chain(self.rows.iter().flat_map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(i, v)| (i, v.to_string().chars().count()))
            }));
        for (col, len) in cells {
            let wanted = (len as f64 + 2.0).min(MAX_COLUMN_WIDTH);
            if wanted > widths[col] {
                widths[col] = wanted;
            }
        }
        widths
    }

    /// Serialize the worksheet part, registering strings in `shared_strings`.
    pub fn to_xml(&self, shared_strings: &mut MutableSharedStrings) -> Result<String> {
        let mut xml = String::with_capacity(1024 + self.rows.len() * 64);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );

        let columns = self.column_count() as u32;
        let last_row = self.rows.len() as u32 + 1;
        if columns > 0 {
            write!(
                xml,
                r#"<dimension ref="A1:{}"/>"#,
                coords_to_reference(last_row, columns)
            )?;
        } else {
            xml.push_str(r#"<dimension ref="A1"/>"#);
        }

        // Keep the header row visible while scrolling
        if !self.headers.is_empty() {
            xml.push_str(r#"<sheetViews><sheetView workbookViewId="0"><pane ySplit="1" topLeftCell="A2" activePane="bottomLeft" state="frozen"/><selection pane="bottomLeft" activeCell="A2" sqref="A2"/></sheetView></sheetViews>"#);
        } else {
            xml.push_str(r#"<sheetViews><sheetView workbookViewId="0"/></sheetViews>"#);
        }
        xml.push_str(r#"<sheetFormatPr defaultRowHeight="15"/>"#);

        if columns > 0 {
            xml.push_str("<cols>");
            for (idx, width) in self.column_widths().into_iter().enumerate() {
                let mut num = String::new();
                crate::common::svg::write_num(&mut num, width);
                write!(
                    xml,
                    r#"<col min="{0}" max="{0}" width="{1}" customWidth="1"/>"#,
                    idx + 1,
                    num
                )?;
            }
            xml.push_str("</cols>");
        }

        xml.push_str("<sheetData>");
        if !self.headers.is_empty() {
            xml.push_str(r#"<row r="1">"#);
            for (col, header) in self.headers.iter().enumerate() {
                let index = shared_strings.add_string(header);
                write!(
                    xml,
                    r#"<c r="{}" s="{}" t="s"><v>{}</v></c>"#,
                    coords_to_reference(1, col as u32 + 1),
                    HEADER_STYLE,
                    index
                )?;
            }
            xml.push_str("</row>");
        }
        for (row_idx, row) in self.rows.iter().enumerate() {
            let row_num = row_idx as u32 + 2;
            write!(xml, r#"<row r="{}">"#, row_num)?;
            for (col_idx, value) in row.iter().enumerate() {
                write_cell(&mut xml, row_num, col_idx as u32 + 1, value, shared_strings)?;
            }
            xml.push_str("</row>");
        }
        xml.push_str("</sheetData>");

        if columns > 0 {
            write!(
                xml,
                r#"<autoFilter ref="A1:{}{}"/>"#,
                column_to_letters(columns),
                last_row
            )?;
        }

        xml.push_str(r#"<pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>"#);
        xml.push_str("</worksheet>");
        Ok(xml)
    }
}

/// Write one `<c>` element; missing values produce no element.
fn write_cell(
    xml: &mut String,
    row: u32,
    col: u32,
    value: &CellValue,
    shared_strings: &mut MutableSharedStrings,
) -> Result<()> {
    let reference = coords_to_reference(row, col);
    match value {
        CellValue::Empty => {},
        CellValue::Float(f) if !f.is_finite() => {},
        CellValue::Int(i) => {
            let mut buf = itoa::Buffer::new();
            write!(xml, r#"<c r="{}"><v>{}</v></c>"#, reference, buf.format(*i))?;
        },
        CellValue::Float(f) => {
            let mut buf = ryu::Buffer::new();
            write!(xml, r#"<c r="{}"><v>{}</v></c>"#, reference, buf.format(*f))?;
        },
        CellValue::Bool(b) => {
            write!(xml, r#"<c r="{}" t="b"><v>{}</v></c>"#, reference, u8::from(*b))?;
        },
        CellValue::String(s) => {
            let index = shared_strings.add_string(s);
            write!(xml, r#"<c r="{}" t="s"><v>{}</v></c>"#, reference, index)?;
        },
        CellValue::Error(e) if ERROR_CODES.contains(e.as_str()) => {
            write!(xml, r#"<c r="{}" t="e"><v>{}</v></c>"#, reference, escape_xml(e))?;
        },
        // Anything else would make the part invalid, keep it as text
        CellValue::Error(e) => {
            let index = shared_strings.add_string(e);
            write!(xml, r#"<c r="{}" t="s"><v>{}</v></c>"#, reference, index)?;
        },
    }
    Ok(())
}

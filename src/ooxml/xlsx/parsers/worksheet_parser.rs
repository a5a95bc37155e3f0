//! Parser for Excel worksheet XML files.
//!
//! Extracts cell values from a worksheet part (`sheet1.xml`, ...) into
//! rows of populated cells, in sheet order.
//!
//! Performance notes:
//! - memchr drives all tag searches
//! - atoi_simd and fast_float2 parse numeric payloads

use std::collections::BTreeMap;

use super::text_runs::collect_text_runs;
use crate::common::{Result, unescape_xml};
use crate::ooxml::xlsx::SharedStrings;
use crate::ooxml::xlsx::reference::reference_to_coords;
use crate::sheet::CellValue;

/// Parse worksheet XML content into rows of cell values.
///
/// Only rows holding at least one cell are returned. Column `j` of a row is
/// spreadsheet column `j + 1`; gaps are `CellValue::Empty` and each row ends
/// at its last populated column. The first row with a non-missing value is
/// the header: cells of later rows to the right of it are dropped, so a
/// stray cell far from the data never widens the result.
pub fn parse_worksheet_xml(content: &str, shared: &SharedStrings) -> Result<Vec<Vec<CellValue>>> {
    let mut cells: BTreeMap<u32, Vec<(u32, CellValue)>> = BTreeMap::new();

    if let Some(sheet_data) = sheet_data_section(content) {
        parse_sheet_data(sheet_data, shared, &mut cells)?;
    }

    let mut rows = Vec::with_capacity(cells.len());
    let mut header_width: Option<u32> = None;
    for (_, row_cells) in cells {
        let limit = header_width.unwrap_or(u32::MAX);
        let width = row_cells
            .iter()
            .map(|(c, _)| *c)
            .filter(|c| *c <= limit)
            .max()
            .unwrap_or(0);
        if width == 0 {
            continue;
        }

        let mut row = vec![CellValue::Empty; width as usize];
        for (col_num, value) in row_cells {
            if col_num <= width {
                row[col_num as usize - 1] = value;
            }
        }
        if header_width.is_none() && row.iter().any(|c| !c.is_missing()) {
            header_width = Some(width);
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Slice out the body of `<sheetData>`; `None` for a missing or empty element.
fn sheet_data_section(content: &str) -> Option<&str> {
    let bytes = content.as_bytes();
    let start = memchr::memmem::find(bytes, b"<sheetData")?;
    let open_end = start + memchr::memchr(b'>', &bytes[start..])?;
    if bytes[open_end - 1] == b'/' {
        return None;
    }
    let body_start = open_end + 1;
    let end = memchr::memmem::find(&bytes[body_start..], b"</sheetData>")?;
    Some(&content[body_start..body_start + end])
}

/// Find the next occurrence of `<name` followed by whitespace, `>` or `/`.
fn find_tag(bytes: &[u8], from: usize, name: &[u8]) -> Option<usize> {
    let mut pos = from;
    while let Some(idx) = memchr::memmem::find(&bytes[pos..], name) {
        let at = pos + idx;
        match bytes.get(at + name.len()) {
            Some(b' ' | b'>' | b'/' | b'\t' | b'\r' | b'\n') => return Some(at),
            Some(_) => pos = at + name.len(),
            None => return None,
        }
    }
    None
}

/// Value of `name="..."` within an opening tag.
fn tag_attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let bytes = tag.as_bytes();
    let needle = format!("{}=\"", name);
    let mut pos = 0;
    while let Some(idx) = memchr::memmem::find(&bytes[pos..], needle.as_bytes()) {
        let at = pos + idx;
        // Must be a whole attribute name, not the tail of e.g. `xr:r=`
        if at > 0 && matches!(bytes[at - 1], b' ' | b'\t' | b'\r' | b'\n') {
            let value_start = at + needle.len();
            let len = memchr::memchr(b'"', &bytes[value_start..])?;
            return Some(&tag[value_start..value_start + len]);
        }
        pos = at + needle.len();
    }
    None
}

fn parse_sheet_data(
    sheet_data: &str,
    shared: &SharedStrings,
    cells: &mut BTreeMap<u32, Vec<(u32, CellValue)>>,
) -> Result<()> {
    let bytes = sheet_data.as_bytes();
    let mut pos = 0;
    let mut last_row = 0u32;

    while let Some(row_start) = find_tag(bytes, pos, b"<row") {
        let Some(open_len) = memchr::memchr(b'>', &bytes[row_start..]) else {
            break;
        };
        let open_tag = &sheet_data[row_start..row_start + open_len + 1];
        let row_num = match tag_attribute(open_tag, "r") {
            Some(r) => atoi_simd::parse(r.as_bytes()).unwrap_or(last_row + 1),
            None => last_row + 1,
        };
        last_row = row_num;

        if bytes[row_start + open_len - 1] == b'/' {
            pos = row_start + open_len + 1;
            continue;
        }

        let body_start = row_start + open_len + 1;
        let Some(row_end) = memchr::memmem::find(&bytes[body_start..], b"</row>") else {
            break;
        };
        let row_body = &sheet_data[body_start..body_start + row_end];
        let row_cells = parse_row_cells(row_body, shared)?;
        if !row_cells.is_empty() && row_num > 0 {
            cells.entry(row_num).or_default().extend(row_cells);
        }

        pos = body_start + row_end + 6;
    }

    Ok(())
}

/// Parse the `<c>` elements of one row body.
fn parse_row_cells(row_body: &str, shared: &SharedStrings) -> Result<Vec<(u32, CellValue)>> {
    let bytes = row_body.as_bytes();
    let mut cells = Vec::new();
    let mut pos = 0;
    let mut last_col = 0u32;

    while let Some(c_start) = find_tag(bytes, pos, b"<c") {
        let Some(open_len) = memchr::memchr(b'>', &bytes[c_start..]) else {
            break;
        };
        let open_tag = &row_body[c_start..c_start + open_len + 1];
        let col_num = match tag_attribute(open_tag, "r") {
            Some(reference) => reference_to_coords(reference)?.0,
            None => last_col + 1,
        };
        last_col = col_num;

        if bytes[c_start + open_len - 1] == b'/' {
            pos = c_start + open_len + 1;
            continue;
        }

        let body_start = c_start + open_len + 1;
        let Some(c_end) = memchr::memmem::find(&bytes[body_start..], b"</c>") else {
            break;
        };
        let body = &row_body[body_start..body_start + c_end];
        let value = cell_value(tag_attribute(open_tag, "t"), body, shared);
        if col_num > 0 && value != CellValue::Empty {
            cells.push((col_num, value));
        }

        pos = body_start + c_end + 4;
    }

    Ok(cells)
}

/// Text between `<v>` and `</v>` in a cell body.
fn value_text(body: &str) -> Option<&str> {
    let bytes = body.as_bytes();
    let start = memchr::memmem::find(bytes, b"<v>")? + 3;
    let len = memchr::memmem::find(&bytes[start..], b"</v>")?;
    Some(&body[start..start + len])
}

fn cell_value(cell_type: Option<&str>, body: &str, shared: &SharedStrings) -> CellValue {
    if cell_type == Some("inlineStr") {
        return match memchr::memmem::find(body.as_bytes(), b"<is>") {
            Some(_) => CellValue::String(collect_text_runs(body)),
            None => CellValue::Empty,
        };
    }

    let Some(v) = value_text(body) else {
        return CellValue::Empty;
    };

    match cell_type {
        Some("s") => {
            let index: Option<usize> = atoi_simd::parse(v.trim().as_bytes()).ok();
            let text = index.and_then(|idx| shared.get(idx));
            match text {
                Some(s) => CellValue::String(s.to_string()),
                None => CellValue::Error("#REF!".to_string()),
            }
        },
        Some("str") | Some("d") => CellValue::String(unescape_xml(v)),
        Some("b") => match v.trim() {
            "1" => CellValue::Bool(true),
            "0" => CellValue::Bool(false),
            _ => CellValue::Error("#VALUE!".to_string()),
        },
        Some("e") => CellValue::Error(unescape_xml(v)),
        _ => parse_numeric(v.trim()),
    }
}

fn parse_numeric(v: &str) -> CellValue {
    let int_val: Option<i64> = atoi_simd::parse(v.as_bytes()).ok();
    if let Some(int_val) = int_val {
        CellValue::Int(int_val)
    } else if let Ok(float_val) = fast_float2::parse::<f64, _>(v) {
        CellValue::Float(float_val)
    } else {
        CellValue::String(unescape_xml(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared() -> SharedStrings {
        SharedStrings::parse("<sst><si><t>Score</t></si><si><t>yes</t></si></sst>")
    }

    #[test]
    fn test_rows_with_gaps() {
        let xml = r#"<worksheet><dimension ref="A1:C3"/><sheetData>
<row r="1" spans="1:3"><c r="A1" t="s"><v>0</v></c><c r="C1" t="inlineStr"><is><t>Note</t></is></c></row>
<row r="3"><c r="A3"><v>4</v></c><c r="B3" t="s"><v>1</v></c><c r="C3"><v>2.5</v></c></row>
</sheetData></worksheet>"#;
        let grid = parse_worksheet_xml(xml, &shared()).unwrap();

        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0][0], CellValue::from("Score"));
        assert_eq!(grid[0][1], CellValue::Empty);
        assert_eq!(grid[0][2], CellValue::from("Note"));
        assert_eq!(grid[1][0], CellValue::Int(4));
        assert_eq!(grid[1][1], CellValue::from("yes"));
        assert_eq!(grid[1][2], CellValue::Float(2.5));
    }

    #[test]
    fn test_distant_cell_does_not_widen_rows() {
        let xml = r#"<worksheet><sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c></row>
<row r="2"><c r="A2"><v>3</v></c><c r="XFD2"><v>9</v></c></row>
<row r="1048576"><c r="XFD1048576"><v>1</v></c></row>
</sheetData></worksheet>"#;
        let grid = parse_worksheet_xml(xml, &shared()).unwrap();

        assert_eq!(grid, vec![
            vec![CellValue::from("Score")],
            vec![CellValue::Int(3)],
        ]);
    }

    #[test]
    fn test_row_width_follows_last_populated_cell() {
        let xml = r#"<worksheet><sheetData>
<row r="1"><c r="A1"><v>1</v></c><c r="B1"><v>2</v></c><c r="C1"><v>3</v></c></row>
<row r="2"><c r="A2"><v>4</v></c></row>
</sheetData></worksheet>"#;
        let grid = parse_worksheet_xml(xml, &SharedStrings::new()).unwrap();
        assert_eq!(grid[0].len(), 3);
        assert_eq!(grid[1], vec![CellValue::Int(4)]);
    }

    #[test]
    fn test_cell_types() {
        let xml = r#"<worksheet><sheetData><row r="1">
<c r="A1" t="b"><v>1</v></c>
<c r="B1" t="e"><v>#DIV/0!</v></c>
<c r="C1" t="str"><f>A1&amp;"x"</f><v>TRUE&amp;x</v></c>
<c r="D1" s="3"/>
<c r="E1" t="s"><v>99</v></c>
</row></sheetData></worksheet>"#;
        let grid = parse_worksheet_xml(xml, &shared()).unwrap();

        assert_eq!(grid[0][0], CellValue::Bool(true));
        assert_eq!(grid[0][1], CellValue::Error("#DIV/0!".to_string()));
        assert_eq!(grid[0][2], CellValue::from("TRUE&x"));
        assert_eq!(grid[0][3], CellValue::Empty);
        assert_eq!(grid[0][4], CellValue::Error("#REF!".to_string()));
    }

    #[test]
    fn test_missing_references_follow_previous() {
        let xml = "<worksheet><sheetData><row><c><v>1</v></c><c><v>2</v></c></row><row><c><v>3</v></c></row></sheetData></worksheet>";
        let grid = parse_worksheet_xml(xml, &SharedStrings::new()).unwrap();
        assert_eq!(grid, vec![
            vec![CellValue::Int(1), CellValue::Int(2)],
            vec![CellValue::Int(3)],
        ]);
    }

    #[test]
    fn test_empty_sheet_data() {
        let grid = parse_worksheet_xml("<worksheet><sheetData/></worksheet>", &SharedStrings::new()).unwrap();
        assert!(grid.is_empty());
        let grid = parse_worksheet_xml("<worksheet/>", &SharedStrings::new()).unwrap();
        assert!(grid.is_empty());
    }
}

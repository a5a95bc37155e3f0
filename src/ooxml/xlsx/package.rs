//! Read access to an `.xlsx` package.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use tracing::{debug, warn};
use zip::ZipArchive;
use zip::result::ZipError;

use super::SharedStrings;
use super::parsers::{parse_relationships, parse_workbook_xml, parse_worksheet_xml};
use crate::common::{Error, Result};
use crate::sheet::Table;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const FALLBACK_SHEET_PART: &str = "xl/worksheets/sheet1.xml";

/// A worksheet listed in the workbook part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    /// Display name
    pub name: String,
    /// Package path of the worksheet part (e.g. `xl/worksheets/sheet1.xml`)
    pub part: String,
}

/// An opened `.xlsx` workbook.
#[derive(Debug)]
pub struct XlsxPackage<R: Read + Seek> {
    archive: ZipArchive<R>,
    sheets: Vec<SheetEntry>,
    sheet_names: Vec<String>,
    shared_strings: SharedStrings,
}

impl XlsxPackage<BufReader<File>> {
    /// Open a workbook from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> XlsxPackage<R> {
    /// Open a workbook from any seekable reader.
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader).map_err(|e| match e {
            ZipError::Io(io) => Error::Io(io),
            other => Error::InvalidFormat(format!("not an xlsx package: {}", other)),
        })?;

        let workbook_xml = read_part(&mut archive, WORKBOOK_PART)?
            .ok_or_else(|| Error::InvalidFormat(format!("missing {}", WORKBOOK_PART)))?;
        let sheet_refs = parse_workbook_xml(&workbook_xml)?;

        let rels = match read_part(&mut archive, WORKBOOK_RELS_PART)? {
            Some(xml) => parse_relationships(&xml, "xl")?,
            None => Default::default(),
        };

        let mut sheets = Vec::with_capacity(sheet_refs.len());
        for sheet in sheet_refs {
            match rels.get(&sheet.rel_id) {
                Some(part) => sheets.push(SheetEntry {
                    name: sheet.name,
                    part: part.clone(),
                }),
                None => warn!(sheet = %sheet.name, rel_id = %sheet.rel_id, "worksheet relationship missing"),
            }
        }

        if sheets.is_empty() && archive.index_for_name(FALLBACK_SHEET_PART).is_some() {
            sheets.push(SheetEntry {
                name: "Sheet1".to_string(),
                part: FALLBACK_SHEET_PART.to_string(),
            });
        }

        let shared_strings = match read_part(&mut archive, SHARED_STRINGS_PART)? {
            Some(xml) => SharedStrings::parse(&xml),
            None => SharedStrings::new(),
        };

        debug!(
            sheets = sheets.len(),
            shared_strings = shared_strings.len(),
            "opened xlsx package"
        );

        let sheet_names = sheets.iter().map(|s| s.name.clone()).collect();
        Ok(Self {
            archive,
            sheets,
            sheet_names,
            shared_strings,
        })
    }

    /// Worksheet names in workbook order.
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Worksheet entries in workbook order.
    pub fn sheets(&self) -> &[SheetEntry] {
        &self.sheets
    }

    /// The shared strings table.
    pub fn shared_strings(&self) -> &SharedStrings {
        &self.shared_strings
    }

    /// Raw cell grid of a worksheet by index (0-based).
    pub fn sheet_rows(&mut self, index: usize) -> Result<Vec<Vec<crate::sheet::CellValue>>> {
        let entry = self
            .sheets
            .get(index)
            .ok_or_else(|| Error::NoData(format!("workbook has no worksheet #{}", index + 1)))?;
        let part = entry.part.clone();

        let xml = read_part(&mut self.archive, &part)?
            .ok_or_else(|| Error::InvalidFormat(format!("missing worksheet part {}", part)))?;
        parse_worksheet_xml(&xml, &self.shared_strings)
    }

    /// A worksheet as a table, first non-blank row as header.
    pub fn sheet_table(&mut self, index: usize) -> Result<Table> {
        Ok(Table::from_rows(self.sheet_rows(index)?))
    }

    /// The first worksheet as a table.
    pub fn first_sheet_table(&mut self) -> Result<Table> {
        self.sheet_table(0)
    }
}

/// Read a package part as UTF-8 text, `None` when absent.
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut content = String::with_capacity(file.size() as usize);
    file.read_to_string(&mut content)?;
    Ok(Some(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::CellValue;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn package(parts: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in parts {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        let mut cursor = writer.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    const WORKBOOK: &str = r#"<workbook xmlns:r="r"><sheets><sheet name="Responses" sheetId="1" r:id="rId7"/></sheets></workbook>"#;
    const RELS: &str = r#"<Relationships><Relationship Id="rId7" Type="ws" Target="worksheets/data.xml"/></Relationships>"#;
    const SST: &str = "<sst><si><t>Score</t></si><si><t>Comment</t></si><si><t>great</t></si></sst>";
    const SHEET: &str = r#"<worksheet><sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
<row r="2"><c r="A2"><v>5</v></c><c r="B2" t="s"><v>2</v></c></row>
</sheetData></worksheet>"#;

    #[test]
    fn test_resolves_sheet_through_relationships() {
        let cursor = package(&[
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", RELS),
            ("xl/sharedStrings.xml", SST),
            ("xl/worksheets/data.xml", SHEET),
        ]);
        let mut pkg = XlsxPackage::from_reader(cursor).unwrap();

        assert_eq!(pkg.sheet_names(), &["Responses"]);
        assert_eq!(pkg.sheets()[0].part, "xl/worksheets/data.xml");

        let table = pkg.first_sheet_table().unwrap();
        assert_eq!(table.headers(), &["Score", "Comment"]);
        assert_eq!(table.rows()[0], vec![CellValue::Int(5), CellValue::from("great")]);
    }

    #[test]
    fn test_fallback_sheet_without_rels() {
        let cursor = package(&[
            ("xl/workbook.xml", "<workbook><sheets/></workbook>"),
            ("xl/worksheets/sheet1.xml", SHEET),
        ]);
        let mut pkg = XlsxPackage::from_reader(cursor).unwrap();
        let rows = pkg.sheet_rows(0).unwrap();
        // Without a shared strings part, indices stay unresolved
        assert!(matches!(rows[0][0], CellValue::Error(_)));
        assert_eq!(rows[1][0], CellValue::Int(5));
    }

    #[test]
    fn test_far_corner_cell_keeps_table_narrow() {
        let sheet = r#"<worksheet><sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
<row r="2"><c r="A2"><v>5</v></c><c r="B2" t="s"><v>2</v></c></row>
<row r="1048576"><c r="XFD1048576"><v>7</v></c></row>
</sheetData></worksheet>"#;
        let cursor = package(&[
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", RELS),
            ("xl/sharedStrings.xml", SST),
            ("xl/worksheets/data.xml", sheet),
        ]);
        let mut pkg = XlsxPackage::from_reader(cursor).unwrap();

        let table = pkg.first_sheet_table().unwrap();
        assert_eq!(table.headers(), &["Score", "Comment"]);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows()[0], vec![CellValue::Int(5), CellValue::from("great")]);
    }

    #[test]
    fn test_not_a_zip() {
        let err = XlsxPackage::from_reader(Cursor::new(b"plain text".to_vec())).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_missing_workbook_part() {
        let cursor = package(&[("docProps/app.xml", "<Properties/>")]);
        let err = XlsxPackage::from_reader(cursor).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_sheet_index_out_of_range() {
        let cursor = package(&[("xl/workbook.xml", "<workbook><sheets/></workbook>")]);
        let mut pkg = XlsxPackage::from_reader(cursor).unwrap();
        assert!(matches!(pkg.first_sheet_table(), Err(Error::NoData(_))));
    }
}

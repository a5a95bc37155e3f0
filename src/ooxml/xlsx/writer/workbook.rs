//! Workbook assembly for XLSX output.

use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::sheet::MutableWorksheet;
use super::strings::MutableSharedStrings;
use super::template;
use crate::build_info::BuildInfo;
use crate::common::{Error, Result, escape_xml};
use crate::sheet::Table;

/// Longest sheet name Excel accepts.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Document properties stamped into `docProps/`.
#[derive(Debug, Clone)]
pub struct DocumentProperties {
    /// Document title
    pub title: String,
    /// Author recorded as creator and last modifier
    pub creator: String,
    /// Producing application
    pub application: String,
    /// Producing application version (`major.minor.patch`)
    pub app_version: String,
    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl Default for DocumentProperties {
    fn default() -> Self {
        let info = BuildInfo::current();
        Self {
            title: String::new(),
            creator: info.built_by.to_string(),
            application: info.title.to_string(),
            app_version: info.version.to_string(),
            created: Utc::now(),
        }
    }
}

/// Builder for a new `.xlsx` workbook.
///
/// # Examples
///
/// ```rust,no_run
/// use excel_chart_generator::ooxml::xlsx::writer::WorkbookWriter;
/// use excel_chart_generator::sheet::{CellValue, Table};
///
/// let table = Table::from_rows(vec![
///     vec![CellValue::from("Score")],
///     vec![CellValue::Int(5)],
/// ]);
/// let mut writer = WorkbookWriter::new();
/// writer.add_table("Integers", &table)?;
/// writer.save("combined_data.xlsx")?;
/// # Ok::<(), excel_chart_generator::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct WorkbookWriter {
    worksheets: Vec<MutableWorksheet>,
    properties: DocumentProperties,
}

impl WorkbookWriter {
    /// Create an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the document properties.
    pub fn with_properties(mut self, properties: DocumentProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Mutable access to the document properties.
    pub fn properties_mut(&mut self) -> &mut DocumentProperties {
        &mut self.properties
    }

    /// Append a worksheet holding `table`.
    ///
    /// The name is cleaned to Excel's rules (no `[]:*?/\`, at most 31
    /// characters, unique ignoring case); the final name is returned.
    pub fn add_table(&mut self, name: &str, table: &Table) -> Result<&MutableWorksheet> {
        let base = sanitize_sheet_name(name);
        let unique = self.unique_name(&base);
        let sheet_id = self.worksheets.len() as u32 + 1;
        self.worksheets
            .push(MutableWorksheet::from_table(unique, sheet_id, table));
        self.worksheets
            .last()
            .ok_or_else(|| Error::Other("worksheet was not added".to_string()))
    }

    /// Get the number of worksheets.
    pub fn worksheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Worksheet names in order.
    pub fn worksheet_names(&self) -> Vec<&str> {
        self.worksheets.iter().map(|ws| ws.name()).collect()
    }

    fn unique_name(&self, base: &str) -> String {
        let taken = |candidate: &str| {
            self.worksheets
                .iter()
                .any(|ws| ws.name().eq_ignore_ascii_case(candidate))
        };
        if !taken(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| {
                let suffix = format!(" ({})", n);
                let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
                let stem: String = base.chars().take(keep).collect();
                format!("{}{}", stem, suffix)
            })
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Generate workbook.xml content.
    fn workbook_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(512 + self.worksheets.len() * 96);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
        );
        xml.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );
        xml.push_str(r#"<bookViews><workbookView activeTab="0"/></bookViews>"#);
        xml.push_str("<sheets>");
        for (index, ws) in self.worksheets.iter().enumerate() {
            write!(
                xml,
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_xml(ws.name()),
                ws.sheet_id(),
                index + 1
            )?;
        }
        xml.push_str("</sheets>");
        xml.push_str("</workbook>");
        Ok(xml)
    }

    /// Write the complete package to a seekable writer.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        if self.worksheets.is_empty() {
            return Err(Error::InvalidInput(
                "a workbook needs at least one worksheet".to_string(),
            ));
        }

        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(writer);
        let sheet_count = self.worksheets.len();

        // Worksheets first: they populate the shared strings table
        let mut shared_strings = MutableSharedStrings::new();
        let mut sheet_parts = Vec::with_capacity(sheet_count);
        for ws in &self.worksheets {
            sheet_parts.push(ws.to_xml(&mut shared_strings)?);
        }

        let created = self
            .properties
            .created
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let names = self.worksheet_names();

        let parts: [(&str, String); 7] = [
            ("[Content_Types].xml", template::content_types_xml(sheet_count)?),
            ("_rels/.rels", template::root_rels_xml()),
            (
                "docProps/core.xml",
                template::core_props_xml(&self.properties.creator, &self.properties.title, &created),
            ),
            (
                "docProps/app.xml",
                template::app_props_xml(
                    &self.properties.application,
                    &self.properties.app_version,
                    &names,
                )?,
            ),
            ("xl/workbook.xml", self.workbook_xml()?),
            ("xl/_rels/workbook.xml.rels", template::workbook_rels_xml(sheet_count)?),
            ("xl/styles.xml", template::styles_xml().to_string()),
        ];
        for (name, body) in parts {
            zip.start_file(name, options)?;
            zip.write_all(body.as_bytes())?;
        }

        for (index, body) in sheet_parts.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", index + 1), options)?;
            zip.write_all(body.as_bytes())?;
        }

        zip.start_file("xl/sharedStrings.xml", options)?;
        zip.write_all(shared_strings.to_xml()?.as_bytes())?;

        debug!(
            sheets = sheet_count,
            shared_strings = shared_strings.count(),
            "xlsx package assembled"
        );
        Ok(zip.finish()?)
    }

    /// Save the workbook to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = self.write_to(BufWriter::new(file))?;
        writer.flush()?;
        Ok(())
    }
}

/// Apply Excel's sheet naming rules.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .collect();
    let trimmed = cleaned.trim().trim_matches('\'');
    let truncated: String = trimmed.chars().take(MAX_SHEET_NAME_LEN).collect();
    if truncated.trim().is_empty() {
        "Sheet".to_string()
    } else {
        truncated
    }
}

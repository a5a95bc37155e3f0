//! Unified workbook entry point for Excel and delimited text exports.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::table::Table;
use super::text::{self, TextConfig};
use crate::common::{Error, Result};
use crate::ooxml::xlsx::XlsxPackage;

/// Spreadsheet formats recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    /// Comma separated values (`.csv`)
    Csv,
    /// Tab separated values (`.tsv`, `.tab`)
    Tsv,
    /// Office Open XML workbook (`.xlsx`, `.xlsm`)
    Xlsx,
    /// Legacy BIFF workbook (`.xls`), recognised but not decoded
    Xls,
}

impl WorkbookFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(WorkbookFormat::Csv),
            "tsv" | "tab" => Ok(WorkbookFormat::Tsv),
            "xlsx" | "xlsm" => Ok(WorkbookFormat::Xlsx),
            "xls" => Ok(WorkbookFormat::Xls),
            _ => Err(Error::InvalidFormat(format!(
                "unrecognised spreadsheet extension: {}",
                path.display()
            ))),
        }
    }
}

/// A spreadsheet opened from disk, reduced to its first worksheet.
///
/// # Examples
///
/// ```rust,no_run
/// use excel_chart_generator::sheet::Workbook;
///
/// let workbook = Workbook::open("responses.xlsx")?;
/// println!("{} rows", workbook.first_sheet().row_count());
/// # Ok::<(), excel_chart_generator::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Workbook {
    path: PathBuf,
    format: WorkbookFormat,
    sheet_names: Vec<String>,
    first_sheet: Table,
}

impl Workbook {
    /// Open a workbook, detecting the format from the extension.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = WorkbookFormat::from_path(path)?;
        debug!(path = %path.display(), ?format, "opening workbook");

        let (sheet_names, first_sheet) = match format {
            WorkbookFormat::Csv => (
                vec![sheet_name_from_path(path)],
                text::open_table(path, TextConfig::csv())?,
            ),
            WorkbookFormat::Tsv => (
                vec![sheet_name_from_path(path)],
                text::open_table(path, TextConfig::tsv())?,
            ),
            WorkbookFormat::Xlsx => {
                let mut package = XlsxPackage::open(path)?;
                let names = package.sheet_names().to_vec();
                let table = package.first_sheet_table()?;
                (names, table)
            },
            WorkbookFormat::Xls => {
                return Err(Error::Unsupported(format!(
                    "legacy .xls workbooks are not supported, re-save {} as .xlsx",
                    path.display()
                )));
            },
        };

        Ok(Self {
            path: path.to_path_buf(),
            format,
            sheet_names,
            first_sheet,
        })
    }

    /// Source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Detected format.
    pub fn format(&self) -> WorkbookFormat {
        self.format
    }

    /// Worksheet names in workbook order.
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// The first worksheet as a table.
    pub fn first_sheet(&self) -> &Table {
        &self.first_sheet
    }

    /// Consume the workbook, keeping the first worksheet.
    pub fn into_first_sheet(self) -> Table {
        self.first_sheet
    }
}

fn sheet_name_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(WorkbookFormat::from_path(Path::new("a.CSV")).unwrap(), WorkbookFormat::Csv);
        assert_eq!(WorkbookFormat::from_path(Path::new("a.xlsx")).unwrap(), WorkbookFormat::Xlsx);
        assert_eq!(WorkbookFormat::from_path(Path::new("a.xls")).unwrap(), WorkbookFormat::Xls);
        assert!(matches!(
            WorkbookFormat::from_path(Path::new("a.txt")),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_xls_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.xls");
        std::fs::write(&path, b"not really").unwrap();
        assert!(matches!(Workbook::open(&path), Err(Error::Unsupported(_))));
    }

    #[test]
    fn test_open_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("week1.csv");
        std::fs::write(&path, "Score\n5\n").unwrap();

        let workbook = Workbook::open(&path).unwrap();
        assert_eq!(workbook.format(), WorkbookFormat::Csv);
        assert_eq!(workbook.sheet_names(), &["week1"]);
        assert_eq!(workbook.first_sheet().row_count(), 1);
    }
}

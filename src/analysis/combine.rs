//! Combining several survey exports into one categorised workbook.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};

use super::classify::{Categorized, categorize};
use crate::common::{Error, Result};
use crate::config::ClassifyConfig;
use crate::ooxml::xlsx::writer::WorkbookWriter;
use crate::sheet::{Table, Workbook};

/// File name of the combined workbook.
pub const COMBINED_FILE_NAME: &str = "combined_data.xlsx";

/// Sheet names of the combined workbook, in order.
pub const SHEET_NAMES: [&str; 3] = ["Integers", "YesNo", "Strings"];

/// Categorise each table and stack the results per category.
///
/// Columns are matched by header; a column missing from some inputs is
/// left empty for their rows.
pub fn combine_tables<I>(tables: I, config: &ClassifyConfig) -> Categorized
where
    I: IntoIterator<Item = Table>,
{
    let mut numeric = Vec::new();
    let mut yes_no = Vec::new();
    let mut text = Vec::new();

    for table in tables {
        let split = categorize(&table, config);
        numeric.push(split.numeric);
        yes_no.push(split.yes_no);
        text.push(split.text);
    }

    Categorized {
        numeric: Table::concat(numeric),
        yes_no: Table::concat(yes_no),
        text: Table::concat(text),
    }
}

/// Open every input and combine their first worksheets.
///
/// Inputs are read in parallel but combined in the order given.
pub fn combine_files<P>(paths: &[P], config: &ClassifyConfig) -> Result<Categorized>
where
    P: AsRef<Path> + Sync,
{
    if paths.is_empty() {
        return Err(Error::InvalidInput("no input files given".to_string()));
    }

    let tables = paths
        .par_iter()
        .map(|path| -> Result<Table> {
            let path = path.as_ref();
            let workbook = Workbook::open(path)?;
            info!(
                file = %path.display(),
                rows = workbook.first_sheet().row_count(),
                columns = workbook.first_sheet().column_count(),
                "read input"
            );
            Ok(workbook.into_first_sheet())
        })
        .collect::<Result<Vec<Table>>>()?;

    let combined = combine_tables(tables, config);
    debug!(
        numeric = combined.numeric.column_count(),
        yes_no = combined.yes_no.column_count(),
        text = combined.text.column_count(),
        "combined inputs"
    );
    Ok(combined)
}

/// Write `combined_data.xlsx` into `dir`, returning its path.
pub fn write_combined(categorized: &Categorized, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(COMBINED_FILE_NAME);

    let mut writer = WorkbookWriter::new();
    writer.properties_mut().title = "Combined survey data".to_string();
    let tables = [&categorized.numeric, &categorized.yes_no, &categorized.text];
    for (name, table) in SHEET_NAMES.iter().zip(tables) {
        writer.add_table(name, table)?;
    }
    writer.save(&path)?;

    info!(path = %path.display(), "wrote combined workbook");
    Ok(path)
}

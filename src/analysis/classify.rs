//! Column classification.

use std::fmt;

use tracing::debug;

use crate::config::ClassifyConfig;
use crate::sheet::types::parse_number;
use crate::sheet::{CellValue, Table};

/// Predominant kind of the values in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Numeric,
    YesNo,
    Text,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::YesNo => "yes/no",
            ColumnKind::Text => "text",
        })
    }
}

/// Decide the predominant kind of a column.
///
/// Missing cells are ignored. Native numbers and numeric-looking strings
/// count as numbers, yes/no answers as yes/no, every other string as text.
/// A kind wins only with a strict majority over both others; ties fall back
/// to [`ColumnKind::Text`].
pub fn predominant_kind<'a, I>(values: I, config: &ClassifyConfig) -> ColumnKind
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let (mut numbers, mut yes_no, mut text) = (0usize, 0usize, 0usize);

    for value in values {
        if value.is_missing() {
            continue;
        }
        match value {
            CellValue::Int(_) | CellValue::Float(_) | CellValue::Bool(_) => numbers += 1,
            CellValue::String(s) => {
                if config.is_yes_no(s) {
                    yes_no += 1;
                } else if parse_number(s).is_some() {
                    numbers += 1;
                } else {
                    text += 1;
                }
            },
            CellValue::Empty | CellValue::Error(_) => {},
        }
    }

    if numbers > text.max(yes_no) {
        ColumnKind::Numeric
    } else if yes_no > numbers.max(text) {
        ColumnKind::YesNo
    } else {
        ColumnKind::Text
    }
}

/// A table split by column kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Categorized {
    /// Numeric columns, coerced, with incomplete rows dropped
    pub numeric: Table,
    /// Yes/no columns as read
    pub yes_no: Table,
    /// Free-text columns as read
    pub text: Table,
}

impl Categorized {
    /// Table for one kind.
    pub fn get(&self, kind: ColumnKind) -> &Table {
        match kind {
            ColumnKind::Numeric => &self.numeric,
            ColumnKind::YesNo => &self.yes_no,
            ColumnKind::Text => &self.text,
        }
    }
}

/// Split a table into numeric, yes/no and text tables.
///
/// Ignored columns are dropped. Numeric cells are coerced with
/// [`CellValue::as_f64`]; a value that fails coercion is missing, and any row
/// with a missing numeric value is removed from the numeric table.
pub fn categorize(table: &Table, config: &ClassifyConfig) -> Categorized {
    let mut numeric = Vec::new();
    let mut yes_no = Vec::new();
    let mut text = Vec::new();

    for (index, name) in table.headers().iter().enumerate() {
        if config.is_ignored(name) {
            debug!(column = %name, "ignoring column");
            continue;
        }
        let kind = predominant_kind(table.column(index), config);
        debug!(column = %name, %kind, "classified column");
        match kind {
            ColumnKind::Numeric => numeric.push(index),
            ColumnKind::YesNo => yes_no.push(index),
            ColumnKind::Text => text.push(index),
        }
    }

    let mut numeric_table = table.select(&numeric);
    numeric_table.map_cells(|cell| match cell.as_f64() {
        Some(value) => CellValue::number(value),
        None => CellValue::Empty,
    });
    numeric_table.retain_rows(|row| row.iter().all(|c| !c.is_missing()));

    Categorized {
        numeric: numeric_table,
        yes_no: table.select(&yes_no),
        text: table.select(&text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[CellValue]) -> Vec<&CellValue> {
        values.iter().collect()
    }

    #[test]
    fn test_numeric_majority() {
        let config = ClassifyConfig::default();
        let values = [
            CellValue::Int(3),
            CellValue::from(" 4.5 "),
            CellValue::Bool(true),
            CellValue::from("n/a"),
            CellValue::Empty,
        ];
        assert_eq!(predominant_kind(cells(&values), &config), ColumnKind::Numeric);
    }

    #[test]
    fn test_yes_no_majority() {
        let config = ClassifyConfig::default();
        let values = [
            CellValue::from("Yes"),
            CellValue::from("NOT YET"),
            CellValue::from("no"),
            CellValue::Int(1),
        ];
        assert_eq!(predominant_kind(cells(&values), &config), ColumnKind::YesNo);
    }

    #[test]
    fn test_ties_and_empty_columns_are_text() {
        let config = ClassifyConfig::default();
        let tie = [CellValue::Int(1), CellValue::from("yes")];
        assert_eq!(predominant_kind(cells(&tie), &config), ColumnKind::Text);
        let empty = [CellValue::Empty, CellValue::Error("#N/A".into())];
        assert_eq!(predominant_kind(cells(&empty), &config), ColumnKind::Text);
    }

    #[test]
    fn test_categorize_splits_and_drops_incomplete_numeric_rows() {
        let table = Table::from_rows(vec![
            vec!["Username".into(), "Rating".into(), "Attended".into(), "Comment".into()],
            vec!["amy".into(), CellValue::Int(5), "yes".into(), "Great".into()],
            vec!["bob".into(), "4".into(), "no".into(), CellValue::Empty],
            vec!["cat".into(), CellValue::Empty, "yes".into(), "Fine".into()],
            vec!["dan".into(), CellValue::Float(2.5), CellValue::Empty, "Okay".into()],
        ]);
        let split = categorize(&table, &ClassifyConfig::default());

        assert_eq!(split.numeric.headers(), &["Rating"]);
        assert_eq!(split.numeric.rows(), &[
            vec![CellValue::Int(5)],
            vec![CellValue::Int(4)],
            vec![CellValue::Float(2.5)],
        ]);
        assert_eq!(split.yes_no.headers(), &["Attended"]);
        assert_eq!(split.yes_no.row_count(), 4);
        assert_eq!(split.get(ColumnKind::Text).headers(), &["Comment"]);
        assert_eq!(split.text.rows()[1][0], CellValue::Empty);
    }
}

//! Header-addressed table of cell values.
//!
//! A `Table` is the in-memory form of one worksheet: a header row naming the
//! columns and a list of equally wide data rows.

use std::collections::HashMap;

use super::types::CellValue;

/// A rectangular table with named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create an empty table with the given headers.
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table from raw rows, using the first non-blank row as header.
    ///
    /// Blank rows are skipped. Data rows are padded with `Empty` or truncated
    /// to the header width. Blank header cells become `Unnamed: <index>` and
    /// repeated names receive `.1`, `.2`, ... suffixes.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<CellValue>>,
    {
        let mut iter = rows
            .into_iter()
            .filter(|row| row.iter().any(|c| !c.is_missing()));

        let Some(header_row) = iter.next() else {
            return Self::default();
        };

        let headers = dedupe_headers(
            header_row
                .iter()
                .enumerate()
                .map(|(idx, cell)| {
                    let name = cell.to_string();
                    if name.trim().is_empty() {
                        format!("Unnamed: {}", idx)
                    } else {
                        name
                    }
                })
                .collect(),
        );

        let width = headers.len();
        let rows = iter
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Self { headers, rows }
    }

    /// Column names.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows (header excluded).
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Whether the table has neither columns nor rows.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    /// Append a data row, padded or truncated to the header width.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.headers.len(), CellValue::Empty);
        self.rows.push(row);
    }

    /// Index of the column with exactly this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of the first column whose name matches ignoring case.
    pub fn column_index_ignore_case(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.headers.iter().position(|h| h.to_lowercase() == wanted)
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Iterate `(name, values)` for every column.
    pub fn columns(&self) -> impl Iterator<Item = (&str, Vec<&CellValue>)> + '_ {
        self.headers
            .iter()
            .enumerate()
            .map(move |(idx, name)| (name.as_str(), self.column(idx).collect()))
    }

    /// Project the table onto a subset of columns, in the given order.
    pub fn select(&self, indices: &[usize]) -> Table {
        let headers = indices
            .iter()
            .filter_map(|&i| self.headers.get(i).cloned())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|&i| row.get(i).cloned().unwrap_or(CellValue::Empty))
                    .collect()
            })
            .collect();
        Table { headers, rows }
    }

    /// Replace every cell with the result of `f`.
    pub fn map_cells<F>(&mut self, mut f: F)
    where
        F: FnMut(&CellValue) -> CellValue,
    {
        for row in &mut self.rows {
            for cell in row.iter_mut() {
                *cell = f(cell);
            }
        }
    }

    /// Keep only rows for which the predicate holds.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }

    /// Stack tables vertically.
    ///
    /// The result has the union of all columns, in order of first appearance.
    /// Cells for columns a source table lacks are `Empty`.
    pub fn concat<I>(tables: I) -> Table
    where
        I: IntoIterator<Item = Table>,
    {
        let mut out = Table::default();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for table in tables {
            let mapping: Vec<usize> = table
                .headers
                .iter()
                .map(|name| {
                    *positions.entry(name.clone()).or_insert_with(|| {
                        out.headers.push(name.clone());
                        out.headers.len() - 1
                    })
                })
                .collect();

            let width = out.headers.len();
            for row in &mut out.rows {
                row.resize(width, CellValue::Empty);
            }

            for row in table.rows {
                let mut target = vec![CellValue::Empty; width];
                for (value, &pos) in row.into_iter().zip(&mapping) {
                    target[pos] = value;
                }
                out.rows.push(target);
            }
        }

        out
    }
}

fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .map(|name| {
            let count = seen.entry(name.clone()).or_insert(0);
            let unique = if *count == 0 {
                name.clone()
            } else {
                format!("{}.{}", name, count)
            };
            *count += 1;
            unique
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<CellValue> {
        values
            .iter()
            .map(|v| {
                if v.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::from(*v)
                }
            })
            .collect()
    }

    #[test]
    fn test_from_rows_pads_and_names_headers() {
        let table = Table::from_rows(vec![
            row(&["", "", ""]),
            row(&["Name", "", "Name"]),
            row(&["a", "b"]),
            row(&["", "", ""]),
            row(&["c", "d", "e", "f"]),
        ]);

        assert_eq!(table.headers(), &["Name", "Unnamed: 1", "Name.1"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[0][2], CellValue::Empty);
        assert_eq!(table.rows()[1].len(), 3);
    }

    #[test]
    fn test_column_lookup() {
        let table = Table::from_rows(vec![row(&["Score", "Comment"]), row(&["5", "ok"])]);
        assert_eq!(table.column_index("score"), None);
        assert_eq!(table.column_index_ignore_case("SCORE"), Some(0));
        let values: Vec<_> = table.column(1).collect();
        assert_eq!(values, vec![&CellValue::from("ok")]);
    }

    #[test]
    fn test_concat_unions_columns() {
        let a = Table::from_rows(vec![row(&["x", "y"]), row(&["1", "2"])]);
        let b = Table::from_rows(vec![row(&["y", "z"]), row(&["3", "4"])]);
        let c = Table::concat(vec![a, b]);

        assert_eq!(c.headers(), &["x", "y", "z"]);
        assert_eq!(c.rows()[0], row(&["1", "2", ""]));
        assert_eq!(c.rows()[1], row(&["", "3", "4"]));
    }

    #[test]
    fn test_select_and_retain() {
        let mut t = Table::from_rows(vec![
            row(&["a", "b", "c"]),
            row(&["1", "2", "3"]),
            row(&["4", "", "6"]),
        ]);
        t.retain_rows(|r| r.iter().all(|c| !c.is_missing()));
        let s = t.select(&[2, 0]);
        assert_eq!(s.headers(), &["c", "a"]);
        assert_eq!(s.rows(), &[row(&["3", "1"])]);
    }

    #[test]
    fn test_empty_input() {
        let t = Table::from_rows(Vec::<Vec<CellValue>>::new());
        assert!(t.is_empty());
        assert_eq!(Table::concat(Vec::new()), Table::default());
    }
}

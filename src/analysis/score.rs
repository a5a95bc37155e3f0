//! Score distributions: how many participants gave each score from 1 to a
//! maximum, as whole percentages that add up to 100.

use std::collections::BTreeMap;

use tracing::debug;

use crate::common::{Error, Result};
use crate::sheet::{CellValue, Table};

/// Parameters of a score chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRequest {
    /// Header of the score column, matched ignoring case
    pub column: String,
    /// Highest valid score
    pub max_score: u32,
    /// Chart title
    pub title: String,
}

impl ScoreRequest {
    pub fn new(column: impl Into<String>, max_score: u32, title: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            max_score,
            title: title.into(),
        }
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<()> {
        if self.column.trim().is_empty() {
            return Err(Error::InvalidInput("score column name is empty".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("chart title is empty".to_string()));
        }
        if self.max_score < 1 {
            return Err(Error::InvalidInput("max score must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Count scores `1..=max_score` in the named column.
///
/// Returns the count for every score (zero included) and the number of
/// participants, i.e. rows holding a score in range. Blank cells, text that
/// is not an integer and other cell kinds are skipped; numbers are truncated
/// toward zero.
pub fn score_counts(table: &Table, column: &str, max_score: u32) -> Result<(BTreeMap<u32, usize>, usize)> {
    let index = table
        .column_index_ignore_case(column)
        .ok_or_else(|| Error::ColumnNotFound(column.to_string()))?;

    let mut counts: BTreeMap<u32, usize> = (1..=max_score).map(|s| (s, 0)).collect();
    let mut participants = 0usize;

    for cell in table.column(index) {
        let score = match cell {
            CellValue::Int(i) => *i,
            CellValue::Float(f) if f.is_finite() => f.trunc() as i64,
            CellValue::String(s) => match s.parse::<i64>() {
                Ok(v) => v,
                Err(_) => continue,
            },
            _ => continue,
        };
        if score >= 1 && score <= i64::from(max_score) {
            if let Some(count) = counts.get_mut(&(score as u32)) {
                *count += 1;
            }
            participants += 1;
        }
    }

    debug!(column, participants, "counted scores");
    Ok((counts, participants))
}

/// `count / participants * 100` for every count.
pub fn percentages(counts: &[usize], participants: usize) -> Vec<f64> {
    counts
        .iter()
        .map(|&c| c as f64 / participants as f64 * 100.0)
        .collect()
}

/// Round each percentage half up; any shortfall or excess against 100 goes
/// to the first smallest rounded value.
pub fn round_percentages(values: &[f64]) -> Vec<f64> {
    let mut rounded: Vec<f64> = values.iter().map(|v| (v + 0.5).floor()).collect();
    let total: f64 = rounded.iter().sum();

    if total != 100.0 {
        let difference = 100.0 - total;
        let mut min_index = 0;
        for (i, v) in rounded.iter().enumerate().skip(1) {
            if *v < rounded[min_index] {
                min_index = i;
            }
        }
        if let Some(slot) = rounded.get_mut(min_index) {
            *slot += difference;
        }
    }

    rounded
}

/// Rounded percentage per score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreDistribution {
    /// `(score, rounded percent)` for `1..=max_score`
    pub percentages: Vec<(u32, f64)>,
    pub participants: usize,
}

impl ScoreDistribution {
    /// Build the distribution for `request` from a table.
    pub fn from_table(table: &Table, request: &ScoreRequest) -> Result<Self> {
        request.validate()?;
        let (counts, participants) = score_counts(table, &request.column, request.max_score)?;
        if participants == 0 {
            return Err(Error::NoData(format!(
                "no scores between 1 and {} in column '{}'",
                request.max_score, request.column
            )));
        }

        let raw: Vec<usize> = counts.values().copied().collect();
        let rounded = round_percentages(&percentages(&raw, participants));
        Ok(Self {
            percentages: counts.keys().copied().zip(rounded).collect(),
            participants,
        })
    }

    /// Chart slices: scores with a positive share, labelled `"<score> (<pct>%)"`.
    pub fn slices(&self) -> Vec<(String, f64)> {
        self.percentages
            .iter()
            .filter(|(_, pct)| *pct > 0.0)
            .map(|(score, pct)| (format!("{} ({:.2}%)", score, pct), *pct))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scores(values: Vec<CellValue>) -> Table {
        let mut rows = vec![vec![CellValue::from("Name"), CellValue::from("Score")]];
        rows.extend(
            values
                .into_iter()
                .map(|v| vec![CellValue::from("p"), v]),
        );
        Table::from_rows(rows)
    }

    #[test]
    fn test_request_validation() {
        assert!(ScoreRequest::new("Score", 5, "Title").validate().is_ok());
        assert!(ScoreRequest::new(" ", 5, "Title").validate().is_err());
        assert!(ScoreRequest::new("Score", 5, "").validate().is_err());
        assert!(matches!(
            ScoreRequest::new("Score", 0, "Title").validate(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_score_counts() {
        let table = scores(vec![
            CellValue::Int(1),
            CellValue::Float(2.9),
            CellValue::from("2"),
            CellValue::from("two"),
            CellValue::Empty,
            CellValue::Int(6),
            CellValue::Int(0),
            CellValue::Bool(true),
        ]);
        let (counts, participants) = score_counts(&table, "SCORE", 5).unwrap();
        assert_eq!(participants, 3);
        assert_eq!(counts[&1], 1);
        assert_eq!(counts[&2], 2);
        assert_eq!(counts[&5], 0);
        assert_eq!(counts.len(), 5);
    }

    #[test]
    fn test_missing_column() {
        let table = scores(vec![CellValue::Int(1)]);
        assert!(matches!(
            score_counts(&table, "Rating", 5),
            Err(Error::ColumnNotFound(name)) if name == "Rating"
        ));
    }

    #[test]
    fn test_round_percentages_adjusts_first_minimum() {
        let rounded = round_percentages(&percentages(&[1, 1, 1], 3));
        assert_eq!(rounded, vec![34.0, 33.0, 33.0]);

        let rounded = round_percentages(&[12.5, 12.5, 75.0]);
        // 13 + 13 + 75 = 101, the first 13 absorbs the excess
        assert_eq!(rounded, vec![12.0, 13.0, 75.0]);
    }

    #[test]
    fn test_distribution_slices() {
        let table = scores(vec![CellValue::Int(1), CellValue::Int(3), CellValue::Int(3)]);
        let dist = ScoreDistribution::from_table(&table, &ScoreRequest::new("score", 4, "T")).unwrap();
        assert_eq!(dist.participants, 3);
        assert_eq!(
            dist.slices(),
            vec![("1 (33.00%)".to_string(), 33.0), ("3 (67.00%)".to_string(), 67.0)]
        );
    }

    #[test]
    fn test_no_participants() {
        let table = scores(vec![CellValue::from("n/a"), CellValue::Int(9)]);
        let err = ScoreDistribution::from_table(&table, &ScoreRequest::new("Score", 5, "T")).unwrap_err();
        assert!(matches!(err, Error::NoData(_)));
    }

    proptest! {
        #[test]
        fn rounded_percentages_sum_to_100(counts in prop::collection::vec(0usize..50, 1..12)) {
            let participants: usize = counts.iter().sum();
            prop_assume!(participants > 0);
            let rounded = round_percentages(&percentages(&counts, participants));
            let total: f64 = rounded.iter().sum();
            prop_assert_eq!(total, 100.0);
            prop_assert!(rounded.iter().all(|v| v.fract() == 0.0));
        }
    }
}

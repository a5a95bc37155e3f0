//! Value distributions for pie charts.

use std::collections::HashMap;

use crate::sheet::CellValue;

/// One slice of a distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub label: String,
    pub count: usize,
    /// Share of the total, 0..=100
    pub percent: f64,
}

/// Count distinct values, most frequent first.
///
/// Missing cells are skipped. Numbers are keyed by value, so `4` and `4.0`
/// are the same slice. Equal counts keep the order of first appearance.
pub fn value_distribution<'a, I>(values: I) -> Vec<Share>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    tally(values.into_iter().filter(|v| !v.is_missing()).map(label_of))
}

/// Count `Yes` against `No` over every cell.
///
/// A cell is `Yes` only when its text is `yes` in any case; everything else,
/// blanks and `not yet` included, counts as `No`.
pub fn yes_no_distribution<'a, I>(values: I) -> Vec<Share>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    tally(values.into_iter().map(|value| {
        let yes = value
            .as_str()
            .is_some_and(|s| s.to_lowercase() == "yes");
        if yes { "Yes".to_string() } else { "No".to_string() }
    }))
}

fn label_of(value: &CellValue) -> String {
    match value {
        CellValue::Int(_) | CellValue::Float(_) => value
            .as_f64()
            .map(CellValue::number)
            .unwrap_or(CellValue::Empty)
            .to_string(),
        other => other.to_string(),
    }
}

fn tally<I: Iterator<Item = String>>(labels: I) -> Vec<Share> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut shares: Vec<Share> = Vec::new();

    for label in labels {
        match positions.get(&label) {
            Some(&idx) => shares[idx].count += 1,
            None => {
                positions.insert(label.clone(), shares.len());
                shares.push(Share {
                    label,
                    count: 1,
                    percent: 0.0,
                });
            },
        }
    }

    let total: usize = shares.iter().map(|s| s.count).sum();
    for share in &mut shares {
        share.percent = share.count as f64 / total as f64 * 100.0;
    }
    // Stable sort keeps first-appearance order among equal counts
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::filter::FilteredView;
use super::model::{CellValue, NumericColumn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Arithmetic mean of the non-null cells, `None` when there are none.
pub fn mean(view: &FilteredView<'_>, column: &NumericColumn) -> Option<f64> {
    let (sum, count) = view
        .cells(column.index())
        .filter_map(CellValue::as_f64)
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Number of visible rows per distinct non-null value, ordered by value.
pub fn value_counts(view: &FilteredView<'_>, column: usize) -> Vec<(CellValue, usize)> {
    let mut counts: BTreeMap<&CellValue, usize> = BTreeMap::new();
    for cell in view.cells(column).filter(|c| !c.is_null()) {
        *counts.entry(cell).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(value, count)| (value.clone(), count))
        .collect()
}

/// One equal-width histogram bin covering `[start, end)` (the last bin is closed).
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Bin the visible values of a numeric column into `bins` equal-width bins
/// spanning the visible min..max.
pub fn numeric_histogram(view: &FilteredView<'_>, column: &NumericColumn, bins: usize) -> Vec<Bin> {
    let values: Vec<f64> = view
        .cells(column.index())
        .filter_map(CellValue::as_f64)
        .collect();
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range.abs() < f64::EPSILON {
        return vec![Bin {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let width = range / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in values {
        let slot = (((v - min) / width) as usize).min(bins - 1);
        counts[slot] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: min + i as f64 * width,
            end: if i + 1 == bins { max } else { min + (i + 1) as f64 * width },
            count,
        })
        .collect()
}

/// Grouped means: one row per group value, sorted by the mean.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub group_column: String,
    pub value_column: String,
    pub rows: Vec<(CellValue, f64)>,
}

/// Mean of `target` per distinct value of the `group` column over the
/// visible rows. Rows with a null group key are skipped and groups whose
/// target is entirely null are dropped.
pub fn group_mean(
    view: &FilteredView<'_>,
    group: usize,
    target: &NumericColumn,
    order: SortOrder,
) -> AggregateResult {
    let mut sums: BTreeMap<&CellValue, (f64, usize)> = BTreeMap::new();
    for row in view.rows().filter(|row| !row[group].is_null()) {
        if let Some(v) = row[target.index()].as_f64() {
            let entry = sums.entry(&row[group]).or_insert((0.0, 0));
            entry.0 += v;
            entry.1 += 1;
        }
    }

    let mut rows: Vec<(CellValue, f64)> = sums
        .into_iter()
        .map(|(key, (sum, count))| (key.clone(), sum / count as f64))
        .collect();
    // Stable sort keeps the group-value order for ties.
    rows.sort_by(|a, b| match order {
        SortOrder::Ascending => a.1.total_cmp(&b.1),
        SortOrder::Descending => b.1.total_cmp(&a.1),
    });

    AggregateResult {
        group_column: view.table.columns[group].name.clone(),
        value_column: target.name().to_string(),
        rows,
    }
}

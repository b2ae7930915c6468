use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, ColumnKind, Table};

// ---------------------------------------------------------------------------
// Filter state: which values / ranges are selected per column
// ---------------------------------------------------------------------------

/// The selection of a single filter widget.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    /// Multi-select: keep rows whose value is one of these.
    Members(BTreeSet<CellValue>),
    /// Slider: keep rows whose value lies in `[low, high]`.
    Range { low: f64, high: f64 },
}

/// Per-column selection state: maps column_name → filter.
/// Columns absent from the map are unconstrained.
pub type FilterState = BTreeMap<String, ColumnFilter>;

/// Full-domain filter for a column: every distinct value for categorical
/// columns, the observed `[min, max]` for numeric ones.
pub fn default_filter(table: &Table, column: &str) -> Option<ColumnFilter> {
    match table.kind(column)? {
        ColumnKind::Categorical => table
            .unique_values
            .get(column)
            .map(|vals| ColumnFilter::Members(vals.clone())),
        ColumnKind::Numeric => table
            .numeric_ranges
            .get(column)
            .map(|&(low, high)| ColumnFilter::Range { low, high }),
    }
}

/// Initialise a [`FilterState`] with everything selected (i.e., show all rows).
pub fn init_filter_state(table: &Table, columns: &[String]) -> FilterState {
    columns
        .iter()
        .filter_map(|col| match default_filter(table, col) {
            Some(filter) => Some((col.clone(), filter)),
            None => {
                log::warn!("Filter column '{col}' not found in the table, skipping it");
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Compiled predicate
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum Test<'a> {
    Members(&'a BTreeSet<CellValue>),
    Range { low: f64, high: f64 },
}

#[derive(Debug)]
struct Clause<'a> {
    index: usize,
    test: Test<'a>,
}

/// A [`FilterState`] resolved against one table: column indices looked up,
/// full-domain clauses dropped.
#[derive(Debug)]
pub struct Predicate<'a> {
    clauses: Vec<Clause<'a>>,
    rejects_all: bool,
}

impl<'a> Predicate<'a> {
    pub fn compile(table: &Table, filters: &'a FilterState) -> Self {
        let mut clauses = Vec::new();
        let mut rejects_all = false;

        for (col, filter) in filters {
            let Some(index) = table.column_index(col) else {
                log::warn!("Ignoring filter on unknown column '{col}'");
                continue;
            };
            match filter {
                ColumnFilter::Members(selected) => {
                    if selected.is_empty() {
                        // Nothing selected for this column → hide everything
                        rejects_all = true;
                        continue;
                    }
                    // All unique values selected → no effective filter
                    if table.unique_values.get(col) == Some(selected) {
                        continue;
                    }
                    clauses.push(Clause {
                        index,
                        test: Test::Members(selected),
                    });
                }
                &ColumnFilter::Range { low, high } => {
                    if let Some(&(min, max)) = table.numeric_ranges.get(col) {
                        if low <= min && high >= max {
                            continue;
                        }
                    }
                    clauses.push(Clause {
                        index,
                        test: Test::Range { low, high },
                    });
                }
            }
        }

        Predicate {
            clauses,
            rejects_all,
        }
    }

    /// Whether a row satisfies every clause.
    pub fn matches(&self, row: &[CellValue]) -> bool {
        if self.rejects_all {
            return false;
        }
        self.clauses.iter().all(|clause| {
            let cell = &row[clause.index];
            match &clause.test {
                Test::Members(selected) => selected.contains(cell),
                Test::Range { low, high } => cell
                    .as_f64()
                    .is_some_and(|v| *low <= v && v <= *high),
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// The rows of a table that pass the current filters. Borrowed, never copied.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    pub table: &'a Table,
    /// Ascending indices into `table.rows`.
    pub indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [CellValue]> + '_ {
        let table = self.table;
        self.indices.iter().map(move |&i| table.rows[i].as_slice())
    }

    /// The cells of one column across the visible rows.
    pub fn cells(&self, column: usize) -> impl Iterator<Item = &'a CellValue> + '_ {
        self.rows().map(move |row| &row[column])
    }

    /// The first `n` visible rows.
    pub fn head(&self, n: usize) -> impl Iterator<Item = &'a [CellValue]> + '_ {
        self.rows().take(n)
    }
}

/// Apply the filters to the table. Linear in rows × active clauses.
pub fn filter_table<'a>(table: &'a Table, filters: &FilterState) -> FilteredView<'a> {
    let predicate = Predicate::compile(table, filters);
    let indices = table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| predicate.matches(row))
        .map(|(i, _)| i)
        .collect();
    FilteredView { table, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn sample() -> Table {
        Table::new(
            vec!["region".into(), "stage".into(), "cost".into()],
            vec![
                vec![text("A"), text("I"), CellValue::Float(100.0)],
                vec![text("B"), text("II"), CellValue::Float(250.0)],
                vec![text("A"), text("II"), CellValue::Null],
                vec![CellValue::Null, text("I"), CellValue::Float(400.0)],
                vec![text("B"), text("III"), CellValue::Float(50.0)],
            ],
        )
    }

    fn all_columns(table: &Table) -> Vec<String> {
        table.column_names().map(str::to_string).collect()
    }

    #[test]
    fn default_filters_keep_every_row() {
        let table = sample();
        let filters = init_filter_state(&table, &all_columns(&table));

        assert_eq!(filters.len(), 3);
        assert_eq!(
            filters["cost"],
            ColumnFilter::Range {
                low: 50.0,
                high: 400.0
            }
        );
        let view = filter_table(&table, &filters);
        assert_eq!(view.indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn unknown_filter_columns_are_skipped() {
        let table = sample();
        let filters = init_filter_state(&table, &["region".to_string(), "missing".to_string()]);
        assert_eq!(filters.keys().collect::<Vec<_>>(), vec!["region"]);
    }

    #[test]
    fn members_and_range_compose_with_and() {
        let table = sample();
        let mut filters = init_filter_state(&table, &all_columns(&table));
        filters.insert(
            "region".into(),
            ColumnFilter::Members([text("B")].into_iter().collect()),
        );
        filters.insert(
            "cost".into(),
            ColumnFilter::Range {
                low: 60.0,
                high: 300.0,
            },
        );

        let view = filter_table(&table, &filters);
        assert_eq!(view.indices, vec![1]);
    }

    #[test]
    fn kept_rows_match_and_dropped_rows_do_not() {
        let table = sample();
        let mut filters = init_filter_state(&table, &all_columns(&table));
        filters.insert(
            "stage".into(),
            ColumnFilter::Members([text("II"), text("III")].into_iter().collect()),
        );
        filters.insert(
            "cost".into(),
            ColumnFilter::Range {
                low: 0.0,
                high: 260.0,
            },
        );

        let predicate = Predicate::compile(&table, &filters);
        let view = filter_table(&table, &filters);
        for (i, row) in table.rows.iter().enumerate() {
            assert_eq!(view.indices.contains(&i), predicate.matches(row), "row {i}");
        }
        // row 2 has a null cost and an active cost range
        assert_eq!(view.indices, vec![1, 4]);
    }

    #[test]
    fn empty_selection_yields_empty_view() {
        let table = sample();
        let mut filters = init_filter_state(&table, &all_columns(&table));
        filters.insert("region".into(), ColumnFilter::Members(BTreeSet::new()));

        let view = filter_table(&table, &filters);
        assert!(view.is_empty());
    }

    #[test]
    fn inverted_range_yields_empty_view() {
        let table = sample();
        let mut filters = FilterState::new();
        filters.insert(
            "cost".into(),
            ColumnFilter::Range {
                low: 300.0,
                high: 200.0,
            },
        );
        assert!(filter_table(&table, &filters).is_empty());
    }

    #[test]
    fn null_member_can_be_selected() {
        let table = sample();
        let mut filters = FilterState::new();
        filters.insert(
            "region".into(),
            ColumnFilter::Members([CellValue::Null].into_iter().collect()),
        );
        assert_eq!(filter_table(&table, &filters).indices, vec![3]);
    }

    #[test]
    fn head_limits_rows() {
        let table = sample();
        let view = filter_table(&table, &FilterState::new());
        assert_eq!(view.head(2).count(), 2);
        assert_eq!(view.cells(0).next(), Some(&text("A")));
    }
}

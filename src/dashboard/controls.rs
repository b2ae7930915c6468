use std::collections::BTreeMap;

use crate::data::filter::{default_filter, init_filter_state, ColumnFilter, FilterState};
use crate::data::model::{CellValue, Table};

use super::Layout;

/// A single widget interaction. Every event leads to one full render pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// Flip one value of a multi-select.
    Toggle { column: String, value: CellValue },
    /// Reset a filter to its full domain.
    SelectAll(String),
    /// Clear a multi-select.
    SelectNone(String),
    /// Move a range slider.
    SetRange { column: String, low: f64, high: f64 },
    /// Choose (or clear) the column of a picker.
    Pick { key: String, column: Option<String> },
}

/// Live widget state of one dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    pub filters: FilterState,
    pickers: BTreeMap<String, Option<String>>,
}

impl Controls {
    /// Full-domain filters and default picks.
    pub fn new(table: &Table, layout: &Layout) -> Self {
        let filters = init_filter_state(table, &layout.filter_columns());
        let pickers = layout
            .pickers
            .iter()
            .map(|p| (p.key.clone(), p.default_pick(table)))
            .collect();
        Self { filters, pickers }
    }

    /// The column a picker currently selects.
    pub fn picked(&self, key: &str) -> Option<&str> {
        self.pickers.get(key)?.as_deref()
    }

    /// Apply an event. Returns whether anything changed.
    pub fn apply(&mut self, table: &Table, event: ControlEvent) -> bool {
        match event {
            ControlEvent::Toggle { column, value } => match self.filters.get_mut(&column) {
                Some(ColumnFilter::Members(selected)) => {
                    if !selected.remove(&value) {
                        selected.insert(value);
                    }
                    true
                }
                _ => false,
            },
            ControlEvent::SelectAll(column) => match default_filter(table, &column) {
                Some(full) if self.filters.contains_key(&column) => {
                    self.filters.insert(column, full.clone()) != Some(full)
                }
                _ => false,
            },
            ControlEvent::SelectNone(column) => match self.filters.get_mut(&column) {
                Some(ColumnFilter::Members(selected)) if !selected.is_empty() => {
                    selected.clear();
                    true
                }
                _ => false,
            },
            ControlEvent::SetRange { column, low, high } => {
                let Some(&(min, max)) = table.numeric_ranges.get(&column) else {
                    return false;
                };
                let (low, high) = (low.min(high).clamp(min, max), low.max(high).clamp(min, max));
                match self.filters.get_mut(&column) {
                    Some(ColumnFilter::Range { low: l, high: h }) if (*l, *h) != (low, high) => {
                        *l = low;
                        *h = high;
                        true
                    }
                    _ => false,
                }
            }
            ControlEvent::Pick { key, column } => match self.pickers.get_mut(&key) {
                Some(current) if *current != column => {
                    *current = column;
                    true
                }
                _ => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{explorer, Variant};
    use crate::data::filter::filter_table;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn table() -> Table {
        Table::new(
            vec!["Column1".into(), "Column2".into(), "Column3".into()],
            vec![
                vec![text("a"), CellValue::Integer(1), CellValue::Float(0.5)],
                vec![text("b"), CellValue::Integer(5), CellValue::Float(1.5)],
                vec![text("c"), CellValue::Integer(9), CellValue::Float(2.5)],
            ],
        )
    }

    #[test]
    fn defaults_cover_the_full_table() {
        let table = table();
        let layout = explorer::layout(&table);
        let controls = Controls::new(&table, &layout);

        assert_eq!(filter_table(&table, &controls.filters).len(), table.len());
        assert_eq!(controls.picked("x"), Some("Column2"));
        assert_eq!(controls.picked("y"), Some("Column3"));
        assert_eq!(controls.picked("color"), None);
    }

    #[test]
    fn toggle_select_none_and_all() {
        let table = table();
        let layout = Variant::Explorer.layout(&table);
        let mut controls = Controls::new(&table, &layout);

        assert!(controls.apply(
            &table,
            ControlEvent::Toggle {
                column: "Column1".into(),
                value: text("b"),
            }
        ));
        assert_eq!(filter_table(&table, &controls.filters).indices, vec![0, 2]);

        assert!(controls.apply(&table, ControlEvent::SelectNone("Column1".into())));
        assert!(filter_table(&table, &controls.filters).is_empty());
        assert!(!controls.apply(&table, ControlEvent::SelectNone("Column1".into())));

        assert!(controls.apply(&table, ControlEvent::SelectAll("Column1".into())));
        assert_eq!(filter_table(&table, &controls.filters).len(), 3);
        assert!(!controls.apply(&table, ControlEvent::SelectAll("Column1".into())));
    }

    #[test]
    fn set_range_only_applies_to_numeric_filters() {
        let table = table();
        let layout = explorer::layout(&table);
        let mut controls = Controls::new(&table, &layout);

        assert!(controls.apply(
            &table,
            ControlEvent::SetRange {
                column: "Column2".into(),
                low: 2.0,
                high: 9.0,
            }
        ));
        assert_eq!(filter_table(&table, &controls.filters).indices, vec![1, 2]);

        assert!(!controls.apply(
            &table,
            ControlEvent::SetRange {
                column: "Column1".into(),
                low: 0.0,
                high: 1.0,
            }
        ));
    }

    #[test]
    fn set_range_orders_and_clamps_bounds() {
        let table = table();
        let layout = explorer::layout(&table);
        let mut controls = Controls::new(&table, &layout);

        assert!(controls.apply(
            &table,
            ControlEvent::SetRange {
                column: "Column2".into(),
                low: 100.0,
                high: 4.0,
            }
        ));
        assert_eq!(
            controls.filters["Column2"],
            ColumnFilter::Range { low: 4.0, high: 9.0 }
        );
    }

    #[test]
    fn pick_changes_only_known_pickers() {
        let table = table();
        let layout = explorer::layout(&table);
        let mut controls = Controls::new(&table, &layout);

        assert!(controls.apply(
            &table,
            ControlEvent::Pick {
                key: "y".into(),
                column: Some("Column2".into()),
            }
        ));
        assert_eq!(controls.picked("y"), Some("Column2"));
        assert!(!controls.apply(
            &table,
            ControlEvent::Pick {
                key: "nope".into(),
                column: None,
            }
        ));
    }
}

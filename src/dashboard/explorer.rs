//! Generic explorer for files without usable headers.
//!
//! Every column gets a filter (multi-select for low-cardinality categorical
//! columns, range slider for numeric ones) and the charts follow the column
//! pickers.

use crate::color::{GOLDENROD, INDIAN_RED, STEEL_BLUE};
use crate::data::aggregate::SortOrder;
use crate::data::model::{ColumnKind, Table};

use super::{
    ChartKind, ChartSpec, ColumnChoice, ColumnRef, FilterSpec, Layout, MetricSpec, NumberFormat,
    PickerSpec,
};

pub const DATA_FILE: &str = "data.csv";

/// Categorical columns with more distinct values than this get no filter.
pub const MAX_CATEGORIES: usize = 50;

fn picker(key: &str, label: &str, choice: ColumnChoice, default: Option<usize>) -> PickerSpec {
    PickerSpec {
        key: key.to_string(),
        label: label.to_string(),
        choice,
        optional: default.is_none(),
        default,
    }
}

fn filters(table: &Table) -> Vec<FilterSpec> {
    table
        .columns
        .iter()
        .filter(|col| match col.kind {
            ColumnKind::Numeric => true,
            ColumnKind::Categorical => table
                .unique_values
                .get(&col.name)
                .is_some_and(|vals| vals.len() <= MAX_CATEGORIES),
        })
        .map(|col| FilterSpec {
            column: col.name.clone(),
            label: col.name.clone(),
        })
        .collect()
}

pub fn layout(table: &Table) -> Layout {
    Layout {
        title: "Data Explorer".into(),
        description: format!(
            "{} rows, {} columns. Columns are named by position.",
            table.len(),
            table.columns.len()
        ),
        filter_heading: "Filters".into(),
        preview_heading: "Preview".into(),
        metrics_heading: "Metrics".into(),
        filters: filters(table),
        pickers: vec![
            picker("x", "X axis", ColumnChoice::Numeric, Some(0)),
            picker("y", "Y axis", ColumnChoice::Numeric, Some(1)),
            picker("color", "Color by", ColumnChoice::Categorical, None),
            picker("histogram", "Histogram column", ColumnChoice::Any, Some(0)),
            picker("group", "Group by", ColumnChoice::Categorical, Some(0)),
            picker("target", "Average of", ColumnChoice::Numeric, Some(0)),
        ],
        metrics: vec![
            MetricSpec::Count {
                label: "Rows".into(),
            },
            MetricSpec::Mean {
                label: None,
                column: ColumnRef::picked("x"),
                format: NumberFormat::Grouped2,
            },
            MetricSpec::Mean {
                label: None,
                column: ColumnRef::picked("y"),
                format: NumberFormat::Grouped2,
            },
        ],
        charts: vec![
            ChartSpec {
                heading: "Distribution".into(),
                title: "Histogram".into(),
                kind: ChartKind::Histogram {
                    column: ColumnRef::picked("histogram"),
                },
                x_label: None,
                y_label: None,
                color: INDIAN_RED,
            },
            ChartSpec {
                heading: "Relationship".into(),
                title: "Scatter".into(),
                kind: ChartKind::Scatter {
                    x: ColumnRef::picked("x"),
                    y: ColumnRef::picked("y"),
                    color_by: Some(ColumnRef::picked("color")),
                },
                x_label: None,
                y_label: None,
                color: STEEL_BLUE,
            },
            ChartSpec {
                heading: "Group averages".into(),
                title: "Mean per group".into(),
                kind: ChartKind::RankedBar {
                    group: ColumnRef::picked("group"),
                    target: ColumnRef::picked("target"),
                    order: SortOrder::Descending,
                },
                x_label: None,
                y_label: None,
                color: GOLDENROD,
            },
        ],
    }
}

//! Dashboard definitions and the render pass.
//!
//! A [`Layout`] describes one dashboard declaratively: which columns get
//! filter widgets, which column pickers exist, which metric cards and charts
//! are shown. [`controls::Controls`] holds the live widget state and
//! [`render::render_pass`] turns (table, layout, controls) into a
//! [`render::DashboardView`] that the UI draws.

use eframe::egui::Color32;
use serde::{Deserialize, Serialize};

use crate::data::aggregate::SortOrder;
use crate::data::loader::{HeaderMode, LoadOptions};
use crate::data::model::{ColumnKind, Table};

pub mod cancer;
pub mod controls;
pub mod explorer;
pub mod format;
pub mod render;

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

/// The dashboards this binary can show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Global cancer patients 2015-2024.
    #[default]
    Cancer,
    /// Any delimited file, positional column names.
    Explorer,
}

impl Variant {
    pub fn layout(self, table: &Table) -> Layout {
        match self {
            Variant::Cancer => cancer::layout(),
            Variant::Explorer => explorer::layout(table),
        }
    }

    /// Where the variant reads its data when no path is given.
    pub fn default_source(self) -> LoadOptions {
        match self {
            Variant::Cancer => LoadOptions::new(cancer::DATA_FILE),
            Variant::Explorer => LoadOptions {
                header: HeaderMode::Positional,
                ..LoadOptions::new(explorer::DATA_FILE)
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Layout description
// ---------------------------------------------------------------------------

/// A column named directly, or whatever a picker currently selects.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnRef {
    Fixed(String),
    Picked(String),
}

impl ColumnRef {
    pub fn fixed(name: &str) -> Self {
        ColumnRef::Fixed(name.to_string())
    }

    pub fn picked(key: &str) -> Self {
        ColumnRef::Picked(key.to_string())
    }
}

/// Which columns a picker offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnChoice {
    Numeric,
    Categorical,
    Any,
}

impl ColumnChoice {
    pub fn options(self, table: &Table) -> Vec<String> {
        match self {
            ColumnChoice::Numeric => table.columns_of_kind(ColumnKind::Numeric),
            ColumnChoice::Categorical => table.columns_of_kind(ColumnKind::Categorical),
            ColumnChoice::Any => table.column_names().map(str::to_string).collect(),
        }
    }
}

/// A single-select widget choosing a column (e.g. the scatter X axis).
#[derive(Debug, Clone, PartialEq)]
pub struct PickerSpec {
    pub key: String,
    pub label: String,
    pub choice: ColumnChoice,
    /// Whether "nothing selected" is an allowed state.
    pub optional: bool,
    /// Index into the options of the initial pick; clamped to the last option.
    pub default: Option<usize>,
}

impl PickerSpec {
    pub fn options(&self, table: &Table) -> Vec<String> {
        self.choice.options(table)
    }

    pub fn default_pick(&self, table: &Table) -> Option<String> {
        let options = self.options(table);
        self.default
            .and_then(|i| options.get(i).or(options.last()))
            .cloned()
    }
}

/// A filter widget over one column. The widget type follows the column kind.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub column: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// `12,345.68`
    Grouped2,
    /// `12.35`
    Fixed2,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetricSpec {
    /// Number of visible rows.
    Count { label: String },
    /// Mean of a numeric column over the visible rows. Without a label the
    /// card is titled after the column.
    Mean {
        label: Option<String>,
        column: ColumnRef,
        format: NumberFormat,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    /// Row count per category, or per numeric bin for numeric columns.
    Histogram { column: ColumnRef },
    /// Two numeric columns, optionally coloured by a third column.
    Scatter {
        x: ColumnRef,
        y: ColumnRef,
        color_by: Option<ColumnRef>,
    },
    /// Mean of `target` per `group` value, sorted.
    RankedBar {
        group: ColumnRef,
        target: ColumnRef,
        order: SortOrder,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub heading: String,
    pub title: String,
    pub kind: ChartKind,
    /// Axis titles; the column names are used when absent.
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub color: Color32,
}

/// Everything that defines one dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub title: String,
    pub description: String,
    pub filter_heading: String,
    pub preview_heading: String,
    pub metrics_heading: String,
    pub filters: Vec<FilterSpec>,
    pub pickers: Vec<PickerSpec>,
    pub metrics: Vec<MetricSpec>,
    pub charts: Vec<ChartSpec>,
}

impl Layout {
    pub fn filter_columns(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.column.clone()).collect()
    }

    pub fn picker(&self, key: &str) -> Option<&PickerSpec> {
        self.pickers.iter().find(|p| p.key == key)
    }
}

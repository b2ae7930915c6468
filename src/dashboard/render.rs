use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use thiserror::Error;

use crate::color::ColorMap;
use crate::data::aggregate::{group_mean, mean, numeric_histogram, value_counts};
use crate::data::error::DataError;
use crate::data::filter::{filter_table, FilteredView};
use crate::data::model::{CellValue, Table};

use super::controls::Controls;
use super::format::{format_count, format_mean, NO_DATA};
use super::{ChartKind, ChartSpec, ColumnRef, Layout, MetricSpec};

// ---------------------------------------------------------------------------
// Render options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub preview_rows: usize,
    pub histogram_bins: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            histogram_bins: 20,
        }
    }
}

// ---------------------------------------------------------------------------
// Output of a render pass
// ---------------------------------------------------------------------------

/// Everything the UI needs to draw one dashboard frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub title: String,
    pub description: String,
    pub preview_heading: String,
    pub metrics_heading: String,
    pub total_rows: usize,
    pub visible_rows: usize,
    pub preview: Preview,
    pub metrics: Vec<MetricCard>,
    pub panels: Vec<Panel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub heading: String,
    pub content: PanelContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    Chart(Chart),
    Warning(PanelWarning),
}

/// Why a panel shows a message instead of its chart.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PanelWarning {
    #[error("Select a column for '{0}'.")]
    Unpicked(String),
    #[error("Column '{0}' is not in the dataset.")]
    Missing(String),
    #[error("Select two different columns for the X and Y axes.")]
    SameAxes,
    #[error("Column '{0}' is not numeric.")]
    NotNumeric(String),
}

impl From<DataError> for PanelWarning {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotNumeric(col) => PanelWarning::NotNumeric(col),
            DataError::MissingColumn(col) => PanelWarning::Missing(col),
            other => PanelWarning::Missing(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Bars(BarsData),
    Scatter(ScatterData),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarsData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub color: Color32,
    /// Bars sit at 0, 1, 2, ... and the x axis shows their labels.
    pub categorical: bool,
    pub bars: Vec<BarDatum>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub label: String,
    pub center: f64,
    pub width: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ScatterSeries>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub name: String,
    pub color: Color32,
    pub points: Vec<[f64; 2]>,
}

// ---------------------------------------------------------------------------
// The render pass
// ---------------------------------------------------------------------------

/// Filter, aggregate and lay out one dashboard from the current controls.
///
/// Pure: the table is never modified and nothing is cached between passes.
pub fn render_pass(
    table: &Table,
    layout: &Layout,
    controls: &Controls,
    options: &RenderOptions,
) -> DashboardView {
    let view = filter_table(table, &controls.filters);
    if view.is_empty() {
        log::debug!("Filters exclude all {} rows", table.len());
    }
    let ctx = PassContext {
        table,
        layout,
        controls,
        view: &view,
    };

    let metrics = layout.metrics.iter().map(|m| ctx.metric_card(m)).collect();

    let panels = layout
        .charts
        .iter()
        .map(|spec| {
            let content = match ctx.chart(spec, options) {
                Ok(chart) => PanelContent::Chart(chart),
                Err(warning) => {
                    log::warn!("Skipping chart '{}': {warning}", spec.title);
                    PanelContent::Warning(warning)
                }
            };
            Panel {
                heading: spec.heading.clone(),
                content,
            }
        })
        .collect();

    DashboardView {
        title: layout.title.clone(),
        description: layout.description.clone(),
        preview_heading: layout.preview_heading.clone(),
        metrics_heading: layout.metrics_heading.clone(),
        total_rows: table.len(),
        visible_rows: view.len(),
        preview: preview(&view, options.preview_rows),
        metrics,
        panels,
    }
}

fn preview(view: &FilteredView<'_>, n: usize) -> Preview {
    let columns = view.table.column_names().map(str::to_string).collect();
    let rows = view
        .head(n)
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    CellValue::Null => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect();
    Preview { columns, rows }
}

struct PassContext<'a> {
    table: &'a Table,
    layout: &'a Layout,
    controls: &'a Controls,
    view: &'a FilteredView<'a>,
}

impl<'a> PassContext<'a> {
    fn resolve(&self, column: &'a ColumnRef) -> Result<&'a str, PanelWarning> {
        let name = match column {
            ColumnRef::Fixed(name) => name.as_str(),
            ColumnRef::Picked(key) => self.controls.picked(key).ok_or_else(|| {
                let label = self.layout.picker(key).map_or(key.as_str(), |p| p.label.as_str());
                PanelWarning::Unpicked(label.to_string())
            })?,
        };
        if self.table.column_index(name).is_none() {
            return Err(PanelWarning::Missing(name.to_string()));
        }
        Ok(name)
    }

    fn metric_card(&self, spec: &'a MetricSpec) -> MetricCard {
        match spec {
            MetricSpec::Count { label } => MetricCard {
                label: label.clone(),
                value: format_count(self.view.len()),
            },
            MetricSpec::Mean {
                label,
                column,
                format,
            } => {
                let resolved = self.resolve(column).ok();
                let label = match (label, resolved) {
                    (Some(label), _) => label.clone(),
                    (None, Some(name)) => format!("Mean {name}"),
                    (None, None) => "Mean".to_string(),
                };
                let value = match resolved.map(|name| self.table.numeric(name)) {
                    Some(Ok(col)) => format_mean(mean(self.view, &col), *format),
                    _ => NO_DATA.to_string(),
                };
                MetricCard { label, value }
            }
        }
    }

    fn chart(&self, spec: &'a ChartSpec, options: &RenderOptions) -> Result<Chart, PanelWarning> {
        match &spec.kind {
            ChartKind::Histogram { column } => self.histogram(spec, column, options.histogram_bins),
            ChartKind::Scatter { x, y, color_by } => self.scatter(spec, x, y, color_by.as_ref()),
            ChartKind::RankedBar {
                group,
                target,
                order,
            } => {
                let group = self.resolve(group)?;
                let target = self.table.numeric(self.resolve(target)?)?;
                let group_idx = self
                    .table
                    .column_index(group)
                    .ok_or_else(|| PanelWarning::Missing(group.to_string()))?;
                let result = group_mean(self.view, group_idx, &target, *order);
                let bars = result
                    .rows
                    .into_iter()
                    .enumerate()
                    .map(|(i, (key, value))| BarDatum {
                        label: key.to_string(),
                        center: i as f64,
                        width: 0.7,
                        value,
                    })
                    .collect();
                Ok(Chart::Bars(BarsData {
                    title: spec.title.clone(),
                    x_label: spec.x_label.clone().unwrap_or(result.group_column),
                    y_label: spec.y_label.clone().unwrap_or(result.value_column),
                    color: spec.color,
                    categorical: true,
                    bars,
                }))
            }
        }
    }

    fn histogram(&self, spec: &ChartSpec, column: &'a ColumnRef, bins: usize) -> Result<Chart, PanelWarning> {
        let name = self.resolve(column)?;
        let (bars, categorical) = match self.table.numeric(name) {
            Ok(col) => {
                let bars = numeric_histogram(self.view, &col, bins)
                    .into_iter()
                    .map(|bin| BarDatum {
                        label: format!("{:.2} to {:.2}", bin.start, bin.end),
                        center: (bin.start + bin.end) / 2.0,
                        width: (bin.end - bin.start).max(f64::EPSILON),
                        value: bin.count as f64,
                    })
                    .collect();
                (bars, false)
            }
            Err(_) => {
                let idx = self
                    .table
                    .column_index(name)
                    .ok_or_else(|| PanelWarning::Missing(name.to_string()))?;
                let bars = value_counts(self.view, idx)
                    .into_iter()
                    .enumerate()
                    .map(|(i, (value, count))| BarDatum {
                        label: value.to_string(),
                        center: i as f64,
                        width: 0.9,
                        value: count as f64,
                    })
                    .collect();
                (bars, true)
            }
        };
        Ok(Chart::Bars(BarsData {
            title: spec.title.clone(),
            x_label: spec.x_label.clone().unwrap_or_else(|| name.to_string()),
            y_label: spec.y_label.clone().unwrap_or_else(|| "count".to_string()),
            color: spec.color,
            categorical,
            bars,
        }))
    }

    fn scatter(
        &self,
        spec: &ChartSpec,
        x: &'a ColumnRef,
        y: &'a ColumnRef,
        color_by: Option<&'a ColumnRef>,
    ) -> Result<Chart, PanelWarning> {
        let x_name = self.resolve(x)?;
        let y_name = self.resolve(y)?;
        if x_name == y_name {
            return Err(PanelWarning::SameAxes);
        }
        let x_col = self.table.numeric(x_name)?;
        let y_col = self.table.numeric(y_name)?;

        // An unpicked or unknown colour column just means one plain series.
        let color_idx = color_by
            .and_then(|c| self.resolve(c).ok())
            .and_then(|name| self.table.column_index(name).map(|idx| (name, idx)));

        let point = |row: &[CellValue]| -> Option<[f64; 2]> {
            Some([row[x_col.index()].as_f64()?, row[y_col.index()].as_f64()?])
        };

        let series = match color_idx {
            Some((name, idx)) => {
                let mut groups: BTreeMap<&CellValue, Vec<[f64; 2]>> = BTreeMap::new();
                for row in self.view.rows() {
                    if let Some(p) = point(row) {
                        groups.entry(&row[idx]).or_default().push(p);
                    }
                }
                let color_map = match self.table.unique_values.get(name) {
                    Some(domain) => ColorMap::new(domain),
                    None => ColorMap::new(&groups.keys().map(|v| (*v).clone()).collect::<BTreeSet<_>>()),
                };
                groups
                    .into_iter()
                    .map(|(value, points)| ScatterSeries {
                        name: value.to_string(),
                        color: color_map.color_for(value),
                        points,
                    })
                    .collect()
            }
            None => vec![ScatterSeries {
                name: spec.title.clone(),
                color: spec.color,
                points: self.view.rows().filter_map(point).collect(),
            }],
        };

        Ok(Chart::Scatter(ScatterData {
            title: spec.title.clone(),
            x_label: spec.x_label.clone().unwrap_or_else(|| x_name.to_string()),
            y_label: spec.y_label.clone().unwrap_or_else(|| y_name.to_string()),
            series,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::cancer::{self, COUNTRY, MEAN_COST, MEAN_SURVIVAL, TOTAL_PATIENTS};
    use crate::dashboard::controls::ControlEvent;
    use crate::dashboard::explorer;
    use crate::data::filter::ColumnFilter;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn patients() -> Table {
        let rows = [
            ("A", "X", "Stage I", 1000.0, 5.0),
            ("B", "Y", "Stage II", 4000.0, 2.0),
            ("A", "Y", "Stage II", 3000.0, 4.0),
            ("B", "X", "Stage III", 9000.0, 1.0),
            ("A", "X", "Stage III", 2000.0, 3.0),
        ];
        Table::new(
            vec![
                "Country_Region".into(),
                "Cancer_Type".into(),
                "Cancer_Stage".into(),
                "Treatment_Cost_USD".into(),
                "Survival_Years".into(),
            ],
            rows.iter()
                .map(|&(country, kind, stage, cost, years)| {
                    vec![
                        text(country),
                        text(kind),
                        text(stage),
                        CellValue::Float(cost),
                        CellValue::Float(years),
                    ]
                })
                .collect(),
        )
    }

    fn metric<'v>(view: &'v DashboardView, label: &str) -> &'v str {
        &view
            .metrics
            .iter()
            .find(|m| m.label == label)
            .unwrap()
            .value
    }

    fn bars(panel: &Panel) -> &BarsData {
        match &panel.content {
            PanelContent::Chart(Chart::Bars(data)) => data,
            other => panic!("expected bars, got {other:?}"),
        }
    }

    #[test]
    fn default_controls_show_the_whole_table() {
        let table = patients();
        let layout = cancer::layout();
        let controls = Controls::new(&table, &layout);
        let view = render_pass(&table, &layout, &controls, &RenderOptions::default());

        assert_eq!(view.total_rows, 5);
        assert_eq!(view.visible_rows, 5);
        assert_eq!(metric(&view, TOTAL_PATIENTS), "5");
        assert_eq!(metric(&view, MEAN_COST), "3,800.00");
        assert_eq!(metric(&view, MEAN_SURVIVAL), "3.00");
        assert_eq!(view.preview.rows.len(), 5);
        assert_eq!(view.panels.len(), 5);
        assert!(view
            .panels
            .iter()
            .all(|p| matches!(p.content, PanelContent::Chart(_))));
    }

    #[test]
    fn filtering_one_country_restricts_every_output() {
        let table = patients();
        let layout = cancer::layout();
        let mut controls = Controls::new(&table, &layout);
        assert!(controls.apply(
            &table,
            ControlEvent::Toggle {
                column: COUNTRY.into(),
                value: text("B"),
            }
        ));

        let view = render_pass(&table, &layout, &controls, &RenderOptions::default());

        assert_eq!(view.visible_rows, 3);
        assert!(view.preview.rows.iter().all(|row| row[0] == "A"));
        assert_eq!(metric(&view, TOTAL_PATIENTS), "3");
        // (1000 + 3000 + 2000) / 3
        assert_eq!(metric(&view, MEAN_COST), "2,000.00");

        let countries = bars(&view.panels[0]);
        assert!(countries.categorical);
        assert_eq!(countries.bars.len(), 1);
        assert_eq!(countries.bars[0].label, "A");
        assert_eq!(countries.bars[0].value, 3.0);

        let mean_cost = bars(&view.panels[3]);
        let ranked: Vec<(&str, f64)> = mean_cost
            .bars
            .iter()
            .map(|b| (b.label.as_str(), b.value))
            .collect();
        assert_eq!(ranked, vec![("Y", 3000.0), ("X", 1500.0)]);

        let survival = bars(&view.panels[4]);
        let values: Vec<f64> = survival.bars.iter().map(|b| b.value).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn empty_selection_reports_no_data() {
        let table = patients();
        let layout = cancer::layout();
        let mut controls = Controls::new(&table, &layout);
        controls.apply(&table, ControlEvent::SelectNone(COUNTRY.into()));

        let view = render_pass(&table, &layout, &controls, &RenderOptions::default());

        assert_eq!(view.visible_rows, 0);
        assert_eq!(metric(&view, TOTAL_PATIENTS), "0");
        assert_eq!(metric(&view, MEAN_COST), NO_DATA);
        assert_eq!(metric(&view, MEAN_SURVIVAL), NO_DATA);
        assert!(view.preview.rows.is_empty());
        assert!(bars(&view.panels[0]).bars.is_empty());
        match &view.panels[2].content {
            PanelContent::Chart(Chart::Scatter(data)) => {
                assert!(data.series.iter().all(|s| s.points.is_empty()))
            }
            other => panic!("expected scatter, got {other:?}"),
        }
    }

    #[test]
    fn scatter_series_follow_the_colour_column() {
        let table = patients();
        let layout = cancer::layout();
        let controls = Controls::new(&table, &layout);
        let view = render_pass(&table, &layout, &controls, &RenderOptions::default());

        let PanelContent::Chart(Chart::Scatter(data)) = &view.panels[2].content else {
            panic!("expected scatter");
        };
        let names: Vec<&str> = data.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Stage I", "Stage II", "Stage III"]);
        assert_eq!(data.series.iter().map(|s| s.points.len()).sum::<usize>(), 5);
        assert_eq!(data.x_label, "Custo do Tratamento (USD)");
    }

    fn positional() -> Table {
        Table::new(
            vec!["Column1".into(), "Column2".into(), "Column3".into()],
            vec![
                vec![text("a"), CellValue::Integer(1), CellValue::Float(10.0)],
                vec![text("b"), CellValue::Integer(2), CellValue::Float(30.0)],
                vec![text("a"), CellValue::Integer(3), CellValue::Float(20.0)],
            ],
        )
    }

    #[test]
    fn identical_axes_warn_and_other_charts_still_render() {
        let table = positional();
        let layout = explorer::layout(&table);
        let mut controls = Controls::new(&table, &layout);
        controls.apply(
            &table,
            ControlEvent::Pick {
                key: "y".into(),
                column: Some("Column2".into()),
            },
        );
        assert_eq!(controls.picked("x"), Some("Column2"));

        let view = render_pass(&table, &layout, &controls, &RenderOptions::default());

        assert_eq!(
            view.panels[1].content,
            PanelContent::Warning(PanelWarning::SameAxes)
        );
        assert!(matches!(view.panels[0].content, PanelContent::Chart(_)));
        assert!(matches!(view.panels[2].content, PanelContent::Chart(_)));
        assert_eq!(metric(&view, "Rows"), "3");
    }

    #[test]
    fn numeric_histogram_and_picked_metrics() {
        let table = positional();
        let layout = explorer::layout(&table);
        let mut controls = Controls::new(&table, &layout);
        controls.apply(
            &table,
            ControlEvent::Pick {
                key: "histogram".into(),
                column: Some("Column3".into()),
            },
        );
        let options = RenderOptions {
            preview_rows: 2,
            histogram_bins: 2,
        };
        let view = render_pass(&table, &layout, &controls, &options);

        assert_eq!(view.preview.rows.len(), 2);
        assert_eq!(metric(&view, "Mean Column2"), "2.00");
        assert_eq!(metric(&view, "Mean Column3"), "20.00");

        let hist = bars(&view.panels[0]);
        assert!(!hist.categorical);
        assert_eq!(hist.bars.iter().map(|b| b.value).sum::<f64>(), 3.0);
        assert_eq!(hist.y_label, "count");
    }

    #[test]
    fn unpicked_and_missing_columns_become_warnings() {
        let table = Table::new(vec!["Column1".into()], vec![vec![text("only")]]);
        let layout = explorer::layout(&table);
        let controls = Controls::new(&table, &layout);
        let view = render_pass(&table, &layout, &controls, &RenderOptions::default());

        assert_eq!(
            view.panels[1].content,
            PanelContent::Warning(PanelWarning::Unpicked("X axis".into()))
        );
        assert_eq!(
            view.panels[2].content,
            PanelContent::Warning(PanelWarning::Unpicked("Average of".into()))
        );
        assert_eq!(metric(&view, "Mean"), NO_DATA);

        let cancer_layout = cancer::layout();
        let cancer_controls = Controls::new(&table, &cancer_layout);
        let view = render_pass(&table, &cancer_layout, &cancer_controls, &RenderOptions::default());
        assert_eq!(
            view.panels[0].content,
            PanelContent::Warning(PanelWarning::Missing(COUNTRY.into()))
        );
    }

    #[test]
    fn non_numeric_target_is_a_warning() {
        let table = patients();
        let mut layout = cancer::layout();
        layout.charts[3].kind = ChartKind::RankedBar {
            group: ColumnRef::fixed("Cancer_Type"),
            target: ColumnRef::fixed("Cancer_Stage"),
            order: crate::data::aggregate::SortOrder::Descending,
        };
        let mut controls = Controls::new(&table, &layout);
        controls.filters.insert(
            COUNTRY.into(),
            ColumnFilter::Members([text("A")].into_iter().collect()),
        );
        let view = render_pass(&table, &layout, &controls, &RenderOptions::default());
        assert_eq!(
            view.panels[3].content,
            PanelContent::Warning(PanelWarning::NotNumeric("Cancer_Stage".into()))
        );
    }
}

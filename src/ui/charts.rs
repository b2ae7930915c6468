use eframe::egui::{RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Plot, Points};

use crate::dashboard::render::{BarsData, Chart, DashboardView, PanelContent, Preview, ScatterData};

const PLOT_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Draw the result of the last render pass.
pub fn dashboard(ui: &mut Ui, view: &DashboardView) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new(&view.title).size(24.0));
            ui.label(&view.description);
            ui.add_space(8.0);

            ui.heading(&view.preview_heading);
            preview_table(ui, &view.preview);
            ui.add_space(8.0);

            ui.heading(&view.metrics_heading);
            if !view.metrics.is_empty() {
                ui.columns(view.metrics.len(), |cols| {
                    for (col, card) in cols.iter_mut().zip(&view.metrics) {
                        col.label(&card.label);
                        col.label(RichText::new(&card.value).size(28.0).strong());
                    }
                });
            }

            for (i, panel) in view.panels.iter().enumerate() {
                ui.add_space(12.0);
                ui.heading(&panel.heading);
                match &panel.content {
                    PanelContent::Warning(warning) => {
                        ui.colored_label(ui.visuals().warn_fg_color, format!("⚠ {warning}"));
                    }
                    PanelContent::Chart(Chart::Bars(data)) => bar_plot(ui, i, data),
                    PanelContent::Chart(Chart::Scatter(data)) => scatter_plot(ui, i, data),
                }
            }
        });
}

fn preview_table(ui: &mut Ui, preview: &Preview) {
    ScrollArea::horizontal()
        .id_salt("preview_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .columns(Column::auto().at_least(60.0), preview.columns.len())
                .header(20.0, |mut header| {
                    for name in &preview.columns {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|mut body| {
                    for row in &preview.rows {
                        body.row(18.0, |mut table_row| {
                            for cell in row {
                                table_row.col(|ui| {
                                    ui.label(cell);
                                });
                            }
                        });
                    }
                });
        });
}

fn bar_plot(ui: &mut Ui, id: usize, data: &BarsData) {
    ui.label(RichText::new(&data.title).strong());

    let bars: Vec<Bar> = data
        .bars
        .iter()
        .map(|b| {
            Bar::new(b.center, b.value)
                .width(b.width)
                .name(&b.label)
                .fill(data.color)
        })
        .collect();

    let mut plot = Plot::new(("bar_plot", id))
        .height(PLOT_HEIGHT)
        .x_axis_label(data.x_label.clone())
        .y_axis_label(data.y_label.clone())
        .allow_scroll(false);

    if data.categorical {
        let labels: Vec<String> = data.bars.iter().map(|b| b.label.clone()).collect();
        plot = plot.x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        });
    }

    plot.show(ui, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).color(data.color).name(&data.title));
    });
}

fn scatter_plot(ui: &mut Ui, id: usize, data: &ScatterData) {
    ui.label(RichText::new(&data.title).strong());

    Plot::new(("scatter_plot", id))
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(data.x_label.clone())
        .y_axis_label(data.y_label.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &data.series {
                let points = Points::new(series.points.clone())
                    .radius(4.0)
                    .color(series.color)
                    .name(&series.name);
                plot_ui.points(points);
            }
        });
}

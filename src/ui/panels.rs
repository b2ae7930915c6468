use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::dashboard::controls::ControlEvent;
use crate::data::filter::ColumnFilter;
use crate::data::model::CellValue;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Widget changes are applied after the panel
/// is drawn, so the whole panel sees one consistent state.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading(&state.layout.filter_heading);
    ui.separator();

    let mut events = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            pickers(ui, state, &mut events);

            for spec in &state.layout.filters {
                let Some(filter) = state.controls.filters.get(&spec.column) else {
                    continue;
                };
                match filter {
                    ColumnFilter::Members(selected) => {
                        let Some(all_values) = state.table.unique_values.get(&spec.column) else {
                            continue;
                        };
                        multi_select(ui, &spec.column, &spec.label, all_values, selected, &mut events);
                    }
                    &ColumnFilter::Range { low, high } => {
                        let Some(&(min, max)) = state.table.numeric_ranges.get(&spec.column) else {
                            continue;
                        };
                        range_slider(ui, &spec.column, &spec.label, (min, max), (low, high), &mut events);
                    }
                }
            }
        });

    state.handle(events);
}

/// Column pickers (axis / colour / group selectors).
fn pickers(ui: &mut Ui, state: &AppState, events: &mut Vec<ControlEvent>) {
    if state.layout.pickers.is_empty() {
        return;
    }
    for picker in &state.layout.pickers {
        let current = state.controls.picked(&picker.key);
        ui.strong(&picker.label);
        egui::ComboBox::from_id_salt(("picker", &picker.key))
            .selected_text(current.unwrap_or("(none)"))
            .show_ui(ui, |ui: &mut Ui| {
                if picker.optional && ui.selectable_label(current.is_none(), "(none)").clicked() {
                    events.push(ControlEvent::Pick {
                        key: picker.key.clone(),
                        column: None,
                    });
                }
                for col in picker.options(&state.table) {
                    if ui.selectable_label(current == Some(col.as_str()), &col).clicked() {
                        events.push(ControlEvent::Pick {
                            key: picker.key.clone(),
                            column: Some(col),
                        });
                    }
                }
            });
    }
    ui.separator();
}

fn multi_select(
    ui: &mut Ui,
    column: &str,
    label: &str,
    all_values: &BTreeSet<CellValue>,
    selected: &BTreeSet<CellValue>,
    events: &mut Vec<ControlEvent>,
) {
    // Show count of selected / total in the header
    let header_text = format!("{label}  ({}/{})", selected.len(), all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(column)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    events.push(ControlEvent::SelectAll(column.to_string()));
                }
                if ui.small_button("None").clicked() {
                    events.push(ControlEvent::SelectNone(column.to_string()));
                }
            });

            for val in all_values {
                let mut checked = selected.contains(val);
                if ui.checkbox(&mut checked, val.to_string()).changed() {
                    events.push(ControlEvent::Toggle {
                        column: column.to_string(),
                        value: val.clone(),
                    });
                }
            }
        });
}

fn range_slider(
    ui: &mut Ui,
    column: &str,
    label: &str,
    (min, max): (f64, f64),
    (mut low, mut high): (f64, f64),
    events: &mut Vec<ControlEvent>,
) {
    egui::CollapsingHeader::new(RichText::new(label).strong())
        .id_salt(column)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            let low_changed = ui
                .add(egui::Slider::new(&mut low, min..=max).text("min"))
                .changed();
            let high_changed = ui
                .add(egui::Slider::new(&mut high, min..=max).text("max"))
                .changed();
            if ui.small_button("Reset").clicked() {
                events.push(ControlEvent::SelectAll(column.to_string()));
            } else if low_changed || high_changed {
                events.push(ControlEvent::SetRange {
                    column: column.to_string(),
                    low,
                    high,
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} rows loaded, {} visible",
            state.view.total_rows, state.view.visible_rows
        ));

        ui.separator();
        ui.label(state.source.path.display().to_string())
            .on_hover_text(format!("{} file(s) parsed this session", state.files_parsed()));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open data file")
        .add_filter("Supported files", &["csv", "tsv", "txt", "json"])
        .add_filter("Delimited text", &["csv", "tsv", "txt"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open(path);
    }
}

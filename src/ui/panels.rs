use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::state::{AppState, View};
use crate::stats::DESCRIBE_STATS;
use crate::ui::plot::tab_label;

// ---------------------------------------------------------------------------
// Left side panel – category filter
// ---------------------------------------------------------------------------

/// Render the left category panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading(state.config.category.as_str());
    ui.separator();

    let Some(values) = state.report.dataset.unique_values(&state.config.category) else {
        ui.label(format!("No '{}' column.", state.config.category));
        return;
    };

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for val in &values {
                let text = RichText::new(val.to_string()).color(state.color_map.color_for(val));
                let mut checked = state.filters.contains(val);
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_filter_value(val);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu and the chart tabs.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for (i, chart) in state.report.charts.iter().enumerate() {
            ui.selectable_value(&mut state.view, View::Chart(i), tab_label(chart));
        }
        ui.selectable_value(&mut state.view, View::Summary, "Summary");

        ui.separator();

        ui.label(format!(
            "{}: {} rows, {} visible",
            state.report.source,
            state.report.dataset.n_rows(),
            state.visible_indices.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Summary tables
// ---------------------------------------------------------------------------

/// Descriptive statistics and grouped means as tables.
pub fn summary_view(ui: &mut Ui, state: &AppState) {
    let report = &state.report;
    ScrollArea::both().show(ui, |ui: &mut Ui| {
        ui.heading("Descriptive statistics");
        ui.push_id("describe", |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .column(TableColumn::auto())
                .columns(TableColumn::auto(), report.describe.columns.len())
                .header(20.0, |mut header| {
                    header.col(|_ui| {});
                    for (name, _) in &report.describe.columns {
                        header.col(|ui| {
                            ui.strong(name.as_str());
                        });
                    }
                })
                .body(|mut body| {
                    for (row, stat) in DESCRIBE_STATS.iter().enumerate() {
                        body.row(18.0, |mut cells| {
                            cells.col(|ui| {
                                ui.strong(*stat);
                            });
                            for (_, summary) in &report.describe.columns {
                                cells.col(|ui| {
                                    ui.label(format!("{:.4}", summary.as_row()[row]));
                                });
                            }
                        });
                    }
                });
        });

        let Some(groups) = &report.groups else {
            return;
        };
        ui.add_space(12.0);
        ui.heading(format!("Mean values grouped by {}", groups.category));
        ui.push_id("group_means", |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .column(TableColumn::auto())
                .columns(TableColumn::auto(), groups.columns.len())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong(groups.category.as_str());
                    });
                    for name in &groups.columns {
                        header.col(|ui| {
                            ui.strong(name.as_str());
                        });
                    }
                })
                .body(|mut body| {
                    for (key, means) in &groups.rows {
                        body.row(18.0, |mut cells| {
                            cells.col(|ui| {
                                ui.label(RichText::new(key.to_string()).color(state.color_map.color_for(key)));
                            });
                            for mean in means {
                                cells.col(|ui| {
                                    ui.label(format!("{mean:.4}"));
                                });
                            }
                        });
                    }
                });
        });
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open dataset")
        .add_filter("Supported files", &["csv", "tsv", "txt", "json", "parquet", "pq"])
        .add_filter("CSV / TSV", &["csv", "tsv", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match state.open(&path) {
            Ok(()) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    state.report.dataset.n_rows(),
                    state.report.dataset.column_names()
                );
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::labels::{Category, Season, Weather};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Data");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Copy what we need so we can mutate state inside the closures.
    let bounds = dataset.date_bounds;
    let seasons: Vec<Season> = dataset.seasons.iter().copied().collect();
    let weathers: Vec<Weather> = dataset.weathers.iter().copied().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range ----
            ui.strong("Date range");
            let mut changed = false;
            egui::Grid::new("date_range").num_columns(2).show(ui, |ui: &mut Ui| {
                ui.label("From");
                changed |= ui
                    .add(DatePickerButton::new(&mut state.filters.start).id_salt("date_start"))
                    .changed();
                ui.end_row();
                ui.label("To");
                changed |= ui
                    .add(DatePickerButton::new(&mut state.filters.end).id_salt("date_end"))
                    .changed();
                ui.end_row();
            });
            if changed {
                // Pickers are not bounded, so keep the selection inside the data.
                if let Some((lo, hi)) = bounds {
                    state.filters.start = state.filters.start.clamp(lo, hi);
                    state.filters.end = state.filters.end.clamp(lo, hi);
                }
                state.refilter();
            }
            if state.filters.start > state.filters.end {
                ui.label(RichText::new("Start date is after end date").color(Color32::YELLOW));
            }
            ui.separator();

            // ---- Seasons ----
            let header = format!("Seasons  ({}/{})", state.filters.seasons.len(), seasons.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("season_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_seasons();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_seasons();
                        }
                    });
                    for &season in &seasons {
                        let mut checked = state.filters.seasons.contains(&season);
                        let text = RichText::new(season.label())
                            .color(state.season_colors.color_for(season.label()));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_season(season);
                        }
                    }
                });

            // ---- Weather ----
            let header = format!("Weather  ({}/{})", state.filters.weathers.len(), weathers.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("weather_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_weathers();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_weathers();
                        }
                    });
                    for &weather in &weathers {
                        let mut checked = state.filters.weathers.contains(&weather);
                        let text = RichText::new(weather.label())
                            .color(state.weather_colors.color_for(weather.label()));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_weather(weather);
                        }
                    }
                });
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
            let can_export = state.dataset.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export summary…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} days loaded, {} visible",
                ds.len(),
                state.visible_rows
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open daily rental data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

fn export_dialog(state: &mut AppState) {
    let file: Option<PathBuf> = rfd::FileDialog::new()
        .set_title("Export summary")
        .set_file_name("summary.json")
        .add_filter("JSON", &["json"])
        .save_file();

    let Some(path) = file else {
        return;
    };
    match crate::data::export::export_report(&path, &state.filters, &state.report) {
        Ok(()) => {
            log::info!("Exported summary to {}", path.display());
            state.status_message = None;
        }
        Err(e) => {
            log::error!("Failed to export summary: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints};

use crate::color::ColorMap;
use crate::data::aggregate::{CategoryMean, DailyTotal, MonthlyTotal};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;
const MONTH_COLOR: Color32 = Color32::from_rgb(135, 206, 235); // skyblue

// ---------------------------------------------------------------------------
// Dashboard charts (central panel)
// ---------------------------------------------------------------------------

/// Render every chart for the current report.
pub fn dashboard_charts(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view rentals  (File → Open…)");
        });
        return;
    }
    let report = &state.report;

    ui.heading("Daily Rentals Over Time");
    daily_chart(ui, &report.by_day);
    ui.add_space(12.0);

    ui.heading("Total Rentals per Month");
    monthly_chart(ui, &report.by_month);
    ui.add_space(12.0);

    ui.heading("Average Rentals by Season");
    category_chart(ui, "season_chart", "Season", &report.by_season, &state.season_colors);
    ui.add_space(12.0);

    ui.heading("Average Rentals by Weather Situation");
    category_chart(
        ui,
        "weather_chart",
        "Weather Situation",
        &report.by_weather,
        &state.weather_colors,
    );
}

fn no_data(ui: &mut Ui) {
    ui.weak("No rentals match the current filters.");
}

/// Line chart of `by_day`. The x axis is days since the common era.
fn daily_chart(ui: &mut Ui, rows: &[DailyTotal]) {
    if rows.is_empty() {
        no_data(ui);
        return;
    }
    let points: PlotPoints = rows
        .iter()
        .map(|r| [f64::from(r.date.num_days_from_ce()), r.rental_total as f64])
        .collect();

    Plot::new("daily_chart")
        .height(CHART_HEIGHT)
        .x_axis_label("Date")
        .y_axis_label("Rentals")
        .x_axis_formatter(|mark: GridMark, _range| format_day(mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).name("rental_count").width(1.5));
        });
}

fn format_day(value: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn monthly_chart(ui: &mut Ui, rows: &[MonthlyTotal]) {
    let bars: Vec<(&str, f64, Color32)> = rows
        .iter()
        .map(|r| (r.month, r.rental_total as f64, MONTH_COLOR))
        .collect();
    bar_chart(ui, "month_chart", "Month", "Total Rentals", &bars);
}

fn category_chart(ui: &mut Ui, id: &str, x_label: &str, rows: &[CategoryMean], colors: &ColorMap) {
    let bars: Vec<(&str, f64, Color32)> = rows
        .iter()
        .map(|r| (r.label, r.rental_mean, colors.color_for(r.label)))
        .collect();
    bar_chart(ui, id, x_label, "Average Rentals", &bars);
}

/// One bar per `(label, value, colour)`, placed at x = 0, 1, 2, … in order.
fn bar_chart(ui: &mut Ui, id: &str, x_label: &str, y_label: &str, rows: &[(&str, f64, Color32)]) {
    if rows.is_empty() {
        no_data(ui);
        return;
    }
    let labels: Vec<String> = rows.iter().map(|(l, _, _)| l.to_string()).collect();
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, &(label, value, color))| {
            Bar::new(i as f64, value).name(label).fill(color).width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark: GridMark, _range| category_tick(&labels, mark.value))
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(y_label));
        });
}

/// Tick text for a bar chart axis: the label at whole positions, blank between.
fn category_tick(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

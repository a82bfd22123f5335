use eframe::egui::{RichText, Ui};

use crate::data::aggregate::Summary;

/// Format an optional count, `N/A` when the selection is empty.
pub fn format_count(value: Option<u64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

/// Format the mean with two decimals, `N/A` when the selection is empty.
pub fn format_mean(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(label);
        ui.label(RichText::new(value).heading().strong());
    });
}

/// Render the four summary metrics in two columns.
pub fn metrics_row(ui: &mut Ui, summary: &Summary) {
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Total And Average Rentals");
        metric(&mut cols[0], "Total Rentals", summary.total.to_string());
        metric(&mut cols[0], "Average Daily Rentals", format_mean(summary.mean));

        cols[1].strong("Max and Min Daily Rentals");
        metric(&mut cols[1], "Maximum Daily Rentals", format_count(summary.max));
        metric(&mut cols[1], "Minimum Daily Rentals", format_count(summary.min));
    });
}

use eframe::egui::{self, ScrollArea};

use crate::state::AppState;
use crate::ui::{metrics, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BikeshareApp {
    pub state: AppState,
}

impl BikeshareApp {
    /// Start with `state` already holding the start-up dataset, if any.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for BikeshareApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.heading("Bike Sharing Analysis Dashboard");
                    if self.state.dataset.is_some() {
                        metrics::metrics_row(ui, &self.state.report.summary);
                        ui.add_space(12.0);
                    }
                    plot::dashboard_charts(ui, &self.state);
                });
        });
    }
}

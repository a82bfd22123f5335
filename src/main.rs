mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::BikeshareApp;
use clap::Parser;
use config::Config;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();
    let config = Config::parse();

    // Load once before the window opens; every recompute borrows this snapshot.
    let mut state = AppState::default();
    if let Some(path) = config.startup_data() {
        state.load_path(&path);
    }
    if let Err(e) = state.apply_selection(config.from, config.to, &config.seasons, &config.weathers) {
        log::error!("Invalid start-up selection: {e}");
        state.status_message = Some(format!("Error: {e}"));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width, config.height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bikeshare Dash – Rental Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(BikeshareApp::new(state)))),
    )
}

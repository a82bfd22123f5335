use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

/// Data file loaded at start-up when `--data` is not given.
pub const DEFAULT_DATA_PATH: &str = "dashboard/day.csv";

#[derive(Debug, Parser)]
#[command(version, about = "Bike-sharing rental dashboard")]
pub struct Config {
    /// Daily rental dataset (.csv, .json or .parquet)
    #[arg(short, long, env = "BIKESHARE_DATA")]
    pub data: Option<PathBuf>,

    /// First date of the initial selection (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last date of the initial selection (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Season to select initially; repeat for several (default: all)
    #[arg(long = "season", value_name = "LABEL")]
    pub seasons: Vec<String>,

    /// Weather condition to select initially; repeat for several (default: all)
    #[arg(long = "weather", value_name = "LABEL")]
    pub weathers: Vec<String>,

    /// Initial window width in points
    #[arg(long, default_value_t = 1200.0)]
    pub width: f32,

    /// Initial window height in points
    #[arg(long, default_value_t = 800.0)]
    pub height: f32,
}

impl Config {
    /// The file to load at start-up: the explicit `--data` path, else the
    /// default path if it exists.
    pub fn startup_data(&self) -> Option<PathBuf> {
        if let Some(path) = &self.data {
            return Some(path.clone());
        }
        let default = PathBuf::from(DEFAULT_DATA_PATH);
        if default.exists() {
            Some(default)
        } else {
            log::warn!("{DEFAULT_DATA_PATH} not found, starting without data");
            None
        }
    }
}

use std::path::Path;

use chrono::NaiveDate;

use crate::color::{ColorMap, Tone};
use crate::data::aggregate::Report;
use crate::data::error::DataError;
use crate::data::filter::{FilterState, filter_records, init_filter_state};
use crate::data::labels::{Category, Season, Weather};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Dataset>,

    /// Current date range and label selections.
    pub filters: FilterState,

    /// Number of records passing the current filters.
    pub visible_rows: usize,

    /// Derived tables for the current filters (recomputed on every change).
    pub report: Report,

    /// Bar colours, one per fixed label.
    pub season_colors: ColorMap,
    pub weather_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            filters: FilterState::default(),
            visible_rows: 0,
            report: Report::default(),
            season_colors: ColorMap::new(Season::ALL.map(Season::label), Tone::Pastel),
            weather_colors: ColorMap::new(Weather::ALL.map(Weather::label), Tone::Muted),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset, select everything and compute the report.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.filters = init_filter_state(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Load `path` and make it the active dataset. On failure the previous
    /// dataset stays active and the error is shown in the status line.
    pub fn load_path(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} daily records from {} (range {:?})",
                    dataset.len(),
                    path.display(),
                    dataset.date_bounds
                );
                if dataset.is_empty() {
                    log::warn!("{} contains no records", path.display());
                }
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Narrow the selection from outside the UI (command-line flags). `None`
    /// dates and empty label lists keep the current value.
    pub fn apply_selection(
        &mut self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        season_labels: &[String],
        weather_labels: &[String],
    ) -> Result<(), DataError> {
        let current = &self.filters;
        let seasons: Vec<&str> = if season_labels.is_empty() {
            current.seasons.iter().map(|s| s.label()).collect()
        } else {
            season_labels.iter().map(String::as_str).collect()
        };
        let weathers: Vec<&str> = if weather_labels.is_empty() {
            current.weathers.iter().map(|w| w.label()).collect()
        } else {
            weather_labels.iter().map(String::as_str).collect()
        };
        self.filters = FilterState::from_labels(
            from.unwrap_or(current.start),
            to.unwrap_or(current.end),
            seasons,
            weathers,
        )?;
        self.refilter();
        Ok(())
    }

    /// Recompute the filtered set and every derived table after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            let rows = filter_records(ds, &self.filters);
            log::debug!("{} of {} records pass the filters", rows.len(), ds.len());
            self.visible_rows = rows.len();
            self.report = Report::build(&rows);
        }
    }

    /// Toggle a single season in the selection.
    pub fn toggle_season(&mut self, season: Season) {
        if !self.filters.seasons.remove(&season) {
            self.filters.seasons.insert(season);
        }
        self.refilter();
    }

    /// Toggle a single weather condition in the selection.
    pub fn toggle_weather(&mut self, weather: Weather) {
        if !self.filters.weathers.remove(&weather) {
            self.filters.weathers.insert(weather);
        }
        self.refilter();
    }

    /// Select every season present in the dataset.
    pub fn select_all_seasons(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters.seasons = ds.seasons.clone();
            self.refilter();
        }
    }

    pub fn select_no_seasons(&mut self) {
        self.filters.seasons.clear();
        self.refilter();
    }

    /// Select every weather condition present in the dataset.
    pub fn select_all_weathers(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters.weathers = ds.weathers.clone();
            self.refilter();
        }
    }

    pub fn select_no_weathers(&mut self) {
        self.filters.weathers.clear();
        self.refilter();
    }
}

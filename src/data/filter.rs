use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::error::DataError;
use super::labels::{Category, Season, Weather};
use super::model::{Dataset, DayRecord};

// ---------------------------------------------------------------------------
// Filter selection: date range plus allowed seasons and weather conditions
// ---------------------------------------------------------------------------

/// The user's current selection. All three predicates are ANDed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    /// Inclusive lower bound.
    pub start: NaiveDate,
    /// Inclusive upper bound.
    pub end: NaiveDate,
    /// Allowed seasons. Empty means nothing passes.
    pub seasons: BTreeSet<Season>,
    /// Allowed weather conditions. Empty means nothing passes.
    pub weathers: BTreeSet<Weather>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
            seasons: Season::ALL.into_iter().collect(),
            weathers: Weather::ALL.into_iter().collect(),
        }
    }
}

impl FilterState {
    /// Build a selection from display labels, e.g. the values of a multiselect.
    pub fn from_labels<S, W>(
        start: NaiveDate,
        end: NaiveDate,
        season_labels: S,
        weather_labels: W,
    ) -> Result<Self, DataError>
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        let seasons = season_labels
            .into_iter()
            .map(|l| Season::from_label(l.as_ref()))
            .collect::<Result<_, _>>()?;
        let weathers = weather_labels
            .into_iter()
            .map(|l| Weather::from_label(l.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            start,
            end,
            seasons,
            weathers,
        })
    }

    /// Whether a single record passes every predicate.
    pub fn matches(&self, rec: &DayRecord) -> bool {
        self.start <= rec.date
            && rec.date <= self.end
            && self.seasons.contains(&rec.season)
            && self.weathers.contains(&rec.weather)
    }
}

/// Initialise a [`FilterState`] covering the whole dataset: full date range and
/// every season / weather condition that occurs in it.
pub fn init_filter_state(dataset: &Dataset) -> FilterState {
    let (start, end) = dataset
        .date_bounds
        .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));
    FilterState {
        start,
        end,
        seasons: dataset.seasons.clone(),
        weathers: dataset.weathers.clone(),
    }
}

/// Return the records that pass `filter`, in dataset order.
///
/// An inverted range or an empty season / weather set yields an empty result.
pub fn filter_records(dataset: &Dataset, filter: &FilterState) -> Vec<DayRecord> {
    dataset
        .records
        .iter()
        .filter(|rec| filter.matches(rec))
        .copied()
        .collect()
}

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::labels::{Season, Weather};

// ---------------------------------------------------------------------------
// DayRecord – one row of the source table
// ---------------------------------------------------------------------------

/// Rentals on one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub season: Season,
    pub weather: Weather,
    /// Total rentals on `date`.
    pub count: u64,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded records plus the indices the filter widgets are built from.
///
/// Built once per file and never mutated afterwards; every recompute borrows it.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records, in file order.
    pub records: Vec<DayRecord>,
    /// Earliest and latest date, `None` for an empty file.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
    /// Seasons that occur at least once.
    pub seasons: BTreeSet<Season>,
    /// Weather conditions that occur at least once.
    pub weathers: BTreeSet<Weather>,
}

impl Dataset {
    /// Build the column indices from the loaded records.
    pub fn from_records(records: Vec<DayRecord>) -> Self {
        let mut seasons = BTreeSet::new();
        let mut weathers = BTreeSet::new();
        let mut date_bounds: Option<(NaiveDate, NaiveDate)> = None;

        for rec in &records {
            seasons.insert(rec.season);
            weathers.insert(rec.weather);
            date_bounds = Some(match date_bounds {
                None => (rec.date, rec.date),
                Some((lo, hi)) => (lo.min(rec.date), hi.max(rec.date)),
            });
        }

        Dataset {
            records,
            date_bounds,
            seasons,
            weathers,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub(crate) fn record(date: NaiveDate, season: Season, weather: Weather, count: u64) -> DayRecord {
        DayRecord {
            date,
            season,
            weather,
            count,
        }
    }

    /// The three-row table used throughout the aggregate tests.
    pub(crate) fn sample_records() -> Vec<DayRecord> {
        vec![
            record(day(2021, 1, 1), Season::Winter, Weather::Clear, 100),
            record(day(2021, 1, 2), Season::Winter, Weather::MistCloudy, 200),
            record(day(2021, 2, 1), Season::Winter, Weather::Clear, 50),
        ]
    }

    #[test]
    fn indices_cover_present_values_only() {
        let mut records = sample_records();
        records.push(record(day(2020, 7, 4), Season::Summer, Weather::Clear, 10));
        let ds = Dataset::from_records(records);

        assert_eq!(ds.len(), 4);
        assert_eq!(ds.date_bounds, Some((day(2020, 7, 4), day(2021, 2, 1))));
        assert_eq!(ds.seasons.iter().copied().collect::<Vec<_>>(), [Season::Winter, Season::Summer]);
        assert_eq!(
            ds.weathers.iter().copied().collect::<Vec<_>>(),
            [Weather::Clear, Weather::MistCloudy]
        );
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let ds = Dataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.date_bounds, None);
        assert!(ds.seasons.is_empty());
    }
}

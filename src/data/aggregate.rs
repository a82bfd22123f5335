use std::collections::BTreeMap;

use chrono::{Datelike, Month, NaiveDate};
use serde::Serialize;

use super::labels::Category;
use super::model::DayRecord;

// ---------------------------------------------------------------------------
// Derived table rows
// ---------------------------------------------------------------------------

/// Summed rentals for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub rental_total: u64,
}

/// Mean daily rentals for one season or weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryMean {
    pub label: &'static str,
    pub rental_mean: f64,
    /// Records in the group; `rental_mean * days` gives back the group total.
    pub days: usize,
}

/// Summed rentals for one calendar month (any year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    pub month: &'static str,
    pub rental_total: u64,
}

/// Scalar metrics over the unaggregated filtered set.
/// `None` when the set is empty.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    pub total: u64,
    pub mean: Option<f64>,
    pub max: Option<u64>,
    pub min: Option<u64>,
}

// ---------------------------------------------------------------------------
// Generic group → reduce → label
// ---------------------------------------------------------------------------

/// Group `records` by `key_fn`, reduce each group's counts with `reduce_fn` and
/// turn each `(key, reduced)` pair into an output row with `label_fn`.
///
/// Rows come out in ascending key order; keys without records produce no row.
pub fn group_and_reduce<K, V, R>(
    records: &[DayRecord],
    key_fn: impl Fn(&DayRecord) -> K,
    reduce_fn: impl Fn(&[u64]) -> V,
    label_fn: impl Fn(K, V) -> R,
) -> Vec<R>
where
    K: Ord,
{
    let mut groups: BTreeMap<K, Vec<u64>> = BTreeMap::new();
    for rec in records {
        groups.entry(key_fn(rec)).or_default().push(rec.count);
    }
    groups
        .into_iter()
        .map(|(key, counts)| label_fn(key, reduce_fn(&counts)))
        .collect()
}

fn sum(counts: &[u64]) -> u64 {
    counts.iter().sum()
}

fn mean(counts: &[u64]) -> (f64, usize) {
    (sum(counts) as f64 / counts.len() as f64, counts.len())
}

fn category_mean<C: Category>(records: &[DayRecord], key_fn: impl Fn(&DayRecord) -> C) -> Vec<CategoryMean> {
    group_and_reduce(records, key_fn, mean, |cat, (rental_mean, days)| CategoryMean {
        label: cat.label(),
        rental_mean,
        days,
    })
}

// ---------------------------------------------------------------------------
// The four aggregators
// ---------------------------------------------------------------------------

/// Total rentals per date, ascending by date.
pub fn by_day(records: &[DayRecord]) -> Vec<DailyTotal> {
    group_and_reduce(records, |r| r.date, sum, |date, rental_total| DailyTotal {
        date,
        rental_total,
    })
}

/// Mean rentals per season, in season code order.
pub fn by_season(records: &[DayRecord]) -> Vec<CategoryMean> {
    category_mean(records, |r| r.season)
}

/// Mean rentals per weather condition, in weather code order.
pub fn by_weather(records: &[DayRecord]) -> Vec<CategoryMean> {
    category_mean(records, |r| r.weather)
}

/// Total rentals per calendar month, January first.
pub fn by_month(records: &[DayRecord]) -> Vec<MonthlyTotal> {
    group_and_reduce(records, |r| r.date.month0(), sum, |m0, rental_total| MonthlyTotal {
        month: month_name(m0),
        rental_total,
    })
}

fn month_name(month0: u32) -> &'static str {
    // month0 comes from a valid NaiveDate, so 0..=11 always converts.
    u8::try_from(month0 + 1)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or("", |m| m.name())
}

impl Summary {
    pub fn of(records: &[DayRecord]) -> Self {
        let total: u64 = records.iter().map(|r| r.count).sum();
        let mean = (!records.is_empty()).then(|| total as f64 / records.len() as f64);
        Summary {
            total,
            mean,
            max: records.iter().map(|r| r.count).max(),
            min: records.iter().map(|r| r.count).min(),
        }
    }
}

// ---------------------------------------------------------------------------
// Report – everything the dashboard shows for one selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Report {
    pub summary: Summary,
    pub by_day: Vec<DailyTotal>,
    pub by_season: Vec<CategoryMean>,
    pub by_weather: Vec<CategoryMean>,
    pub by_month: Vec<MonthlyTotal>,
}

impl Report {
    /// Compute every derived table from a filtered record set.
    pub fn build(records: &[DayRecord]) -> Self {
        Report {
            summary: Summary::of(records),
            by_day: by_day(records),
            by_season: by_season(records),
            by_weather: by_weather(records),
            by_month: by_month(records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::labels::{Season, Weather};
    use crate::data::model::tests::{day, record, sample_records};

    fn year_of_records() -> Vec<DayRecord> {
        let seasons = Season::ALL;
        let weathers = Weather::ALL;
        (0..365u64)
            .map(|i| {
                let date = day(2011, 1, 1) + chrono::Days::new(i);
                record(
                    date,
                    seasons[(i % 4) as usize],
                    weathers[(i % 3) as usize],
                    100 + (i * 37) % 500,
                )
            })
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn by_day_on_sample() {
        assert_eq!(
            by_day(&sample_records()),
            vec![
                DailyTotal { date: day(2021, 1, 1), rental_total: 100 },
                DailyTotal { date: day(2021, 1, 2), rental_total: 200 },
                DailyTotal { date: day(2021, 2, 1), rental_total: 50 },
            ]
        );
    }

    #[test]
    fn by_season_on_sample() {
        let rows = by_season(&sample_records());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "Winter");
        assert_eq!(format!("{:.2}", rows[0].rental_mean), "116.67");
        assert_eq!(rows[0].days, 3);
    }

    #[test]
    fn by_weather_on_sample() {
        let rows = by_weather(&sample_records());
        let labels: Vec<&str> = rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, ["Clear", "Mist + Cloudy"]);
        assert!(approx(rows[0].rental_mean, 75.0));
        assert!(approx(rows[1].rental_mean, 200.0));
    }

    #[test]
    fn by_month_on_sample() {
        assert_eq!(
            by_month(&sample_records()),
            vec![
                MonthlyTotal { month: "January", rental_total: 300 },
                MonthlyTotal { month: "February", rental_total: 50 },
            ]
        );
    }

    #[test]
    fn by_day_sums_duplicate_dates_and_sorts() {
        let records = vec![
            record(day(2021, 3, 5), Season::Spring, Weather::Clear, 5),
            record(day(2021, 3, 1), Season::Spring, Weather::Clear, 1),
            record(day(2021, 3, 5), Season::Spring, Weather::MistCloudy, 10),
        ];
        assert_eq!(
            by_day(&records),
            vec![
                DailyTotal { date: day(2021, 3, 1), rental_total: 1 },
                DailyTotal { date: day(2021, 3, 5), rental_total: 15 },
            ]
        );
    }

    #[test]
    fn by_month_merges_years_and_orders_by_month_number() {
        let records = vec![
            record(day(2012, 12, 1), Season::Winter, Weather::Clear, 3),
            record(day(2011, 3, 1), Season::Spring, Weather::Clear, 2),
            record(day(2011, 12, 31), Season::Winter, Weather::Clear, 4),
        ];
        assert_eq!(
            by_month(&records),
            vec![
                MonthlyTotal { month: "March", rental_total: 2 },
                MonthlyTotal { month: "December", rental_total: 7 },
            ]
        );
    }

    #[test]
    fn category_rows_follow_code_order() {
        let records = vec![
            record(day(2021, 9, 1), Season::Fall, Weather::HeavyRainSnow, 1),
            record(day(2021, 6, 1), Season::Summer, Weather::LightSnowRain, 2),
            record(day(2021, 1, 1), Season::Winter, Weather::Clear, 3),
        ];
        let seasons: Vec<&str> = by_season(&records).iter().map(|r| r.label).collect();
        assert_eq!(seasons, ["Winter", "Summer", "Fall"]);
        let weathers: Vec<&str> = by_weather(&records).iter().map(|r| r.label).collect();
        assert_eq!(weathers, ["Clear", "Light Snow/Rain", "Heavy Rain/Snow"]);
    }

    #[test]
    fn totals_are_preserved() {
        let records = year_of_records();
        let total: u64 = records.iter().map(|r| r.count).sum();

        let day_rows = by_day(&records);
        assert_eq!(day_rows.len(), 365);
        assert_eq!(day_rows.iter().map(|r| r.rental_total).sum::<u64>(), total);

        let month_rows = by_month(&records);
        assert_eq!(month_rows.len(), 12);
        assert_eq!(month_rows.iter().map(|r| r.rental_total).sum::<u64>(), total);

        for rows in [by_season(&records), by_weather(&records)] {
            assert!(rows.len() <= 4);
            let rebuilt: f64 = rows.iter().map(|r| r.rental_mean * r.days as f64).sum();
            assert!(approx(rebuilt, total as f64));
        }
    }

    #[test]
    fn empty_input_gives_empty_tables() {
        let report = Report::build(&[]);
        assert!(report.by_day.is_empty());
        assert!(report.by_season.is_empty());
        assert!(report.by_weather.is_empty());
        assert!(report.by_month.is_empty());
        assert_eq!(
            report.summary,
            Summary { total: 0, mean: None, max: None, min: None }
        );
    }

    #[test]
    fn summary_over_filtered_rows() {
        let summary = Summary::of(&sample_records());
        assert_eq!(summary.total, 350);
        assert_eq!(format!("{:.2}", summary.mean.unwrap()), "116.67");
        assert_eq!(summary.max, Some(200));
        assert_eq!(summary.min, Some(50));
    }

    #[test]
    fn report_is_deterministic() {
        let records = year_of_records();
        assert_eq!(Report::build(&records), Report::build(&records));
    }

    #[test]
    fn group_and_reduce_with_custom_key() {
        let rows = group_and_reduce(
            &sample_records(),
            |r| r.date.day(),
            |counts| counts.len(),
            |d, n| (d, n),
        );
        assert_eq!(rows, [(1, 2), (2, 1)]);
    }
}

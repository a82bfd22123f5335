/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, decode codes → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<DayRecord>, date bounds, present labels
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range ∧ season set ∧ weather set → Vec<DayRecord>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  by_day, by_season, by_weather, by_month, summary → Report
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod export;
pub mod filter;
pub mod labels;
pub mod loader;
pub mod model;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use chrono::{Datelike, Days, NaiveDate};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const OUT_DIR: &str = "dashboard";
const DAYS: u64 = 731;

/// One row in the layout of the public bike-sharing `day.csv`.
#[derive(Debug, Serialize)]
struct DayRow {
    instant: i64,
    dteday: String,
    season: i64,
    yr: i64,
    mnth: i64,
    weathersit: i64,
    temp: f64,
    cnt: i64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Meteorological season code: Dec–Feb winter, Mar–May spring, and so on.
fn season_code(month: u32) -> i64 {
    match month {
        12 | 1 | 2 => 1,
        3..=5 => 2,
        6..=8 => 3,
        _ => 4,
    }
}

/// Mostly clear, some mist, rare rain, very rare storms.
fn weather_code(rng: &mut SimpleRng) -> i64 {
    match rng.next_f64() {
        p if p < 0.62 => 1,
        p if p < 0.92 => 2,
        p if p < 0.99 => 3,
        _ => 4,
    }
}

fn generate_rows(rng: &mut SimpleRng) -> Result<Vec<DayRow>> {
    let start = NaiveDate::from_ymd_opt(2011, 1, 1).context("invalid start date")?;
    (0..DAYS)
        .map(|i| {
            let date = start
                .checked_add_days(Days::new(i))
                .context("date out of range")?;
            let year_offset = i64::from(date.year() - 2011);

            // Temperature peaks in mid-July.
            let phase = (f64::from(date.ordinal()) - 196.0) / 365.0 * 2.0 * std::f64::consts::PI;
            let temp = (0.5 + 0.3 * phase.cos() + rng.gauss(0.0, 0.04)).clamp(0.05, 0.95);

            let weathersit = weather_code(rng);
            let weather_factor = [1.0, 0.85, 0.45, 0.2][(weathersit - 1) as usize];
            let base = 1500.0 + 5500.0 * temp + 1800.0 * year_offset as f64;
            let cnt = (base * weather_factor + rng.gauss(0.0, 350.0)).max(20.0).round() as i64;

            Ok(DayRow {
                instant: i as i64 + 1,
                dteday: date.format("%Y-%m-%d").to_string(),
                season: season_code(date.month()),
                yr: year_offset,
                mnth: i64::from(date.month()),
                weathersit,
                temp: (temp * 1e6).round() / 1e6,
                cnt,
            })
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[DayRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn to_batch(rows: &[DayRow]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("instant", DataType::Int64, false),
        Field::new("dteday", DataType::Utf8, false),
        Field::new("season", DataType::Int64, false),
        Field::new("yr", DataType::Int64, false),
        Field::new("mnth", DataType::Int64, false),
        Field::new("weathersit", DataType::Int64, false),
        Field::new("temp", DataType::Float64, false),
        Field::new("cnt", DataType::Int64, false),
    ]));
    let int_col = |f: fn(&DayRow) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from_iter_values(rows.iter().map(f)))
    };
    let columns: Vec<ArrayRef> = vec![
        int_col(|r| r.instant),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.dteday.as_str()))),
        int_col(|r| r.season),
        int_col(|r| r.yr),
        int_col(|r| r.mnth),
        int_col(|r| r.weathersit),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.temp))),
        int_col(|r| r.cnt),
    ];
    RecordBatch::try_new(schema, columns).context("building record batch")
}

fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    let rows = generate_rows(&mut rng)?;
    let batch = to_batch(&rows)?;

    let out_dir = Path::new(OUT_DIR);
    std::fs::create_dir_all(out_dir).context("creating output directory")?;

    let csv_path = out_dir.join("day.csv");
    write_csv(&csv_path, &rows)?;
    log::info!("Wrote {} rows to {}", rows.len(), csv_path.display());

    let parquet_path = out_dir.join("day.parquet");
    write_parquet(&parquet_path, &batch)?;
    log::info!("Wrote {} rows to {}", batch.num_rows(), parquet_path.display());

    let preview = pretty_format_batches(&[batch.slice(0, 5)]).context("formatting preview")?;
    println!("{preview}");
    Ok(())
}

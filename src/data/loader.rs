use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Int32Type, Int64Type, TimeUnit, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType,
};
use arrow::temporal_conversions::{
    date32_to_datetime, timestamp_ms_to_datetime, timestamp_ns_to_datetime,
    timestamp_s_to_datetime, timestamp_us_to_datetime,
};
use arrow::record_batch::RecordBatch;
use chrono::{NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::labels::{Category, Season, Weather};
use super::model::{Dataset, DayRecord};

/// Column names every input format must provide.
const DATE_COL: &str = "dteday";
const SEASON_COL: &str = "season";
const WEATHER_COL: &str = "weathersit";
const COUNT_COL: &str = "cnt";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a daily rental dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `dteday`, `season`, `weathersit`, `cnt`
/// * `.json`    – `[{ "dteday": "2011-01-01", "season": 1, ... }, ...]`
/// * `.parquet` – same column names, `dteday` as string, Date32 or Timestamp
///
/// Any invalid row aborts the load; no row is dropped silently.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)
        }
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedFormat(other.to_string()).into()),
    }
}

/// Decode the raw integer fields of one row into a typed record.
fn build_record(row: usize, date: NaiveDate, season: i64, weather: i64, count: i64) -> Result<DayRecord> {
    let count = u64::try_from(count).map_err(|_| DataError::Parse {
        row,
        message: format!("'{COUNT_COL}' must be non-negative, got {count}"),
    })?;
    Ok(DayRecord {
        date,
        season: Season::from_code(season).with_context(|| format!("row {row}"))?,
        weather: Weather::from_code(weather).with_context(|| format!("row {row}"))?,
        count,
    })
}

/// Index the loaded records. Rejects files whose counts overflow a `u64`
/// total, so every sum over a subset of the dataset fits.
fn into_dataset(records: Vec<DayRecord>) -> Result<Dataset> {
    let mut total: u64 = 0;
    for (i, rec) in records.iter().enumerate() {
        total = total.checked_add(rec.count).ok_or_else(|| DataError::Parse {
            row: i + 1,
            message: format!("'{COUNT_COL}' total overflows"),
        })?;
    }
    Ok(Dataset::from_records(records))
}

/// Parse a `dteday` cell. Accepts a plain ISO date or an ISO date-time whose
/// time part is discarded.
fn parse_date(s: &str, row: usize) -> Result<NaiveDate, DataError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .map_err(|_| DataError::Parse {
            row,
            message: format!("'{DATE_COL}' value '{s}' is not a date"),
        })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// One CSV row; columns not named here are ignored.
#[derive(Debug, Deserialize)]
struct CsvRow {
    dteday: String,
    season: i64,
    weathersit: i64,
    cnt: i64,
}

/// Read CSV from any reader. Row numbers in errors are 1-based data rows.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers().context("reading CSV headers")?.clone();
    for col in [DATE_COL, SEASON_COL, WEATHER_COL, COUNT_COL] {
        if !headers.iter().any(|h| h == col) {
            return Err(DataError::MissingColumn(col.to_string()).into());
        }
    }

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row_no = i + 1;
        let raw = result.map_err(|e| DataError::Parse {
            row: row_no,
            message: e.to_string(),
        })?;
        let date = parse_date(&raw.dteday, row_no)?;
        records.push(build_record(row_no, date, raw.season, raw.weathersit, raw.cnt)?);
    }

    into_dataset(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`
/// with `date_format='iso'`):
///
/// ```json
/// [
///   { "dteday": "2011-01-01", "season": 1, "weathersit": 2, "cnt": 985 },
///   ...
/// ]
/// ```
pub fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let rows = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());

    for (i, rec) in rows.iter().enumerate() {
        let row_no = i + 1;
        let obj = rec.as_object().ok_or_else(|| DataError::Parse {
            row: row_no,
            message: "not a JSON object".to_string(),
        })?;

        let date_str = obj
            .get(DATE_COL)
            .and_then(JsonValue::as_str)
            .ok_or_else(|| missing_or_invalid(row_no, DATE_COL))?;
        let date = parse_date(date_str, row_no)?;

        let int = |col: &str| {
            obj.get(col)
                .and_then(JsonValue::as_i64)
                .ok_or_else(|| missing_or_invalid(row_no, col))
        };

        records.push(build_record(
            row_no,
            date,
            int(SEASON_COL)?,
            int(WEATHER_COL)?,
            int(COUNT_COL)?,
        )?);
    }

    into_dataset(records)
}

fn missing_or_invalid(row: usize, col: &str) -> DataError {
    DataError::Parse {
        row,
        message: format!("missing or invalid '{col}'"),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of daily records.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`, which stores
/// a parsed `dteday` as a nanosecond timestamp) and **Polars**
/// (`df.write_parquet()`, Date32).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let date_col = required_column(&batch, DATE_COL)?;
        let season_col = required_column(&batch, SEASON_COL)?;
        let weather_col = required_column(&batch, WEATHER_COL)?;
        let count_col = required_column(&batch, COUNT_COL)?;

        for row in 0..batch.num_rows() {
            let row_no = records.len() + 1;
            let date = extract_date(date_col, row, row_no)?;
            records.push(build_record(
                row_no,
                date,
                extract_i64(season_col, row, row_no, SEASON_COL)?,
                extract_i64(weather_col, row, row_no, WEATHER_COL)?,
                extract_i64(count_col, row, row_no, COUNT_COL)?,
            )?);
        }
    }

    into_dataset(records)
}

// -- Parquet / Arrow helpers --

fn required_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| DataError::MissingColumn(name.to_string()).into())
}

fn extract_i64(col: &ArrayRef, row: usize, row_no: usize, name: &str) -> Result<i64> {
    if col.is_null(row) {
        bail!(missing_or_invalid(row_no, name));
    }
    match col.data_type() {
        DataType::Int32 => Ok(i64::from(col.as_primitive::<Int32Type>().value(row))),
        DataType::Int64 => Ok(col.as_primitive::<Int64Type>().value(row)),
        other => bail!(DataError::Parse {
            row: row_no,
            message: format!("'{name}' has type {other:?}, expected Int32 or Int64"),
        }),
    }
}

fn extract_date(col: &ArrayRef, row: usize, row_no: usize) -> Result<NaiveDate> {
    if col.is_null(row) {
        bail!(missing_or_invalid(row_no, DATE_COL));
    }
    let datetime = match col.data_type() {
        DataType::Utf8 => return Ok(parse_date(col.as_string::<i32>().value(row), row_no)?),
        DataType::LargeUtf8 => return Ok(parse_date(col.as_string::<i64>().value(row), row_no)?),
        DataType::Date32 => date32_to_datetime(col.as_primitive::<Date32Type>().value(row)),
        DataType::Timestamp(unit, _) => match unit {
            TimeUnit::Second => {
                timestamp_s_to_datetime(col.as_primitive::<TimestampSecondType>().value(row))
            }
            TimeUnit::Millisecond => {
                timestamp_ms_to_datetime(col.as_primitive::<TimestampMillisecondType>().value(row))
            }
            TimeUnit::Microsecond => {
                timestamp_us_to_datetime(col.as_primitive::<TimestampMicrosecondType>().value(row))
            }
            TimeUnit::Nanosecond => {
                timestamp_ns_to_datetime(col.as_primitive::<TimestampNanosecondType>().value(row))
            }
        },
        other => bail!(DataError::Parse {
            row: row_no,
            message: format!("'{DATE_COL}' has type {other:?}, expected a string, date or timestamp"),
        }),
    };
    datetime
        .map(|dt| dt.date())
        .ok_or_else(|| missing_or_invalid(row_no, DATE_COL).into())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use arrow::array::{
        Date32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
        TimestampMillisecondArray, TimestampNanosecondArray,
    };
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    fn data_error(err: &anyhow::Error) -> &DataError {
        err.downcast_ref::<DataError>()
            .or_else(|| err.root_cause().downcast_ref::<DataError>())
            .expect("expected a DataError")
    }

    const DAY_CSV: &str = "\
instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,cnt
1,2011-01-01,1,0,1,0,6,0,2,0.344167,985
2,2011-01-02,1,0,1,0,0,0,2,0.363478,801
3,2011-01-03,1,0,1,0,1,1,1,0.196364,1349
";

    #[test]
    fn csv_with_extra_columns() {
        let ds = read_csv(DAY_CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.records[0],
            DayRecord {
                date: NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
                season: Season::Winter,
                weather: Weather::MistCloudy,
                count: 985,
            }
        );
        assert_eq!(ds.records[2].weather, Weather::Clear);
    }

    #[test]
    fn csv_accepts_datetime_strings() {
        let csv = "dteday,season,weathersit,cnt\n2012-06-30 00:00:00,3,1,5000\n";
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.records[0].date, NaiveDate::from_ymd_opt(2012, 6, 30).unwrap());
    }

    #[test]
    fn csv_bad_date_aborts() {
        let csv = "dteday,season,weathersit,cnt\n2011-01-01,1,1,10\nnot-a-date,1,1,10\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(data_error(&err), DataError::Parse { row: 2, .. }));
    }

    #[test]
    fn csv_non_numeric_count_aborts() {
        let csv = "dteday,season,weathersit,cnt\n2011-01-01,1,1,lots\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(data_error(&err), DataError::Parse { row: 1, .. }));
    }

    #[test]
    fn csv_negative_count_aborts() {
        let csv = "dteday,season,weathersit,cnt\n2011-01-01,1,1,-4\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(data_error(&err), DataError::Parse { row: 1, .. }));
    }

    #[test]
    fn csv_unknown_code_aborts() {
        let csv = "dteday,season,weathersit,cnt\n2011-01-01,1,7,10\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(
            data_error(&err),
            &DataError::UnknownCode { kind: "weather", code: 7 }
        );
    }

    #[test]
    fn csv_missing_column() {
        let csv = "dteday,season,cnt\n2011-01-01,1,10\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(data_error(&err), &DataError::MissingColumn("weathersit".into()));
    }

    #[test]
    fn json_records() {
        let text = r#"[
            {"dteday": "2011-01-01", "season": 1, "weathersit": 2, "cnt": 985, "temp": 0.34},
            {"dteday": "2011-07-01T00:00:00", "season": 3, "weathersit": 1, "cnt": 5000}
        ]"#;
        let ds = parse_json(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].season, Season::Summer);
        assert_eq!(ds.records[1].date, NaiveDate::from_ymd_opt(2011, 7, 1).unwrap());
    }

    #[test]
    fn json_missing_field_aborts() {
        let text = r#"[{"dteday": "2011-01-01", "season": 1, "cnt": 985}]"#;
        let err = parse_json(text).unwrap_err();
        assert!(matches!(data_error(&err), DataError::Parse { row: 1, .. }));
    }

    #[test]
    fn unsupported_extension() {
        let err = load_file(Path::new("day.xlsx")).unwrap_err();
        assert_eq!(data_error(&err), &DataError::UnsupportedFormat("xlsx".into()));
    }

    fn temp_parquet(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "bikeshare-dash-{name}-{}.parquet",
            std::process::id()
        ))
    }

    fn write_batch(path: &Path, batch: &RecordBatch) {
        let file = std::fs::File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(batch).unwrap();
        writer.close().unwrap();
    }

    /// Load a one-row parquet file whose `dteday` column is `dates`.
    fn load_with_dates(name: &str, dates: ArrayRef) -> Result<Dataset> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("dteday", dates.data_type().clone(), true),
            Field::new("season", DataType::Int32, false),
            Field::new("weathersit", DataType::Int64, false),
            Field::new("cnt", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                dates,
                Arc::new(Int32Array::from(vec![1])),
                Arc::new(Int64Array::from(vec![1])),
                Arc::new(Int64Array::from(vec![10])),
            ],
        )
        .unwrap();

        let path = temp_parquet(name);
        write_batch(&path, &batch);
        let result = load_file(&path);
        std::fs::remove_file(&path).unwrap();
        result
    }

    fn jan_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2011, 1, 1).unwrap()
    }

    fn days_since_epoch(date: NaiveDate) -> i64 {
        (date - NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()).num_days()
    }

    #[test]
    fn parquet_round_trip_through_file() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("dteday", DataType::Utf8, false),
            Field::new("season", DataType::Int64, false),
            Field::new("weathersit", DataType::Int32, false),
            Field::new("cnt", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["2011-01-01", "2011-04-02"])),
                Arc::new(Int64Array::from(vec![1, 2])),
                Arc::new(Int32Array::from(vec![3, 4])),
                Arc::new(Int64Array::from(vec![10, 20])),
            ],
        )
        .unwrap();

        let path = temp_parquet("utf8");
        write_batch(&path, &batch);
        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].weather, Weather::LightSnowRain);
        assert_eq!(ds.records[1].season, Season::Spring);
        assert_eq!(ds.records[1].count, 20);
    }

    #[test]
    fn parquet_date32_column() {
        let days = days_since_epoch(jan_first()) as i32;
        let ds = load_with_dates("date32", Arc::new(Date32Array::from(vec![days]))).unwrap();
        assert_eq!(ds.records[0].date, jan_first());
    }

    #[test]
    fn parquet_nanosecond_timestamp_column() {
        let nanos = days_since_epoch(jan_first()) * 86_400 * 1_000_000_000;
        let ds = load_with_dates("ts-ns", Arc::new(TimestampNanosecondArray::from(vec![nanos])))
            .unwrap();
        assert_eq!(ds.records[0].date, jan_first());
    }

    #[test]
    fn parquet_millisecond_timestamp_with_timezone() {
        // Noon keeps the date regardless of where the time part is dropped.
        let millis = days_since_epoch(jan_first()) * 86_400_000 + 12 * 3_600_000;
        let dates = TimestampMillisecondArray::from(vec![millis]).with_timezone("UTC");
        let ds = load_with_dates("ts-ms", Arc::new(dates)).unwrap();
        assert_eq!(ds.records[0].date, jan_first());
    }

    #[test]
    fn parquet_large_utf8_column() {
        let ds = load_with_dates("large-utf8", Arc::new(LargeStringArray::from(vec!["2011-01-01"])))
            .unwrap();
        assert_eq!(ds.records[0].date, jan_first());
    }

    #[test]
    fn parquet_float_date_column_is_rejected() {
        let err = load_with_dates("float", Arc::new(Float64Array::from(vec![14975.0]))).unwrap_err();
        assert!(matches!(data_error(&err), DataError::Parse { row: 1, .. }));
    }

    #[test]
    fn parquet_null_date_is_rejected() {
        let err = load_with_dates("null", Arc::new(StringArray::from(vec![None::<&str>])))
            .unwrap_err();
        assert!(matches!(data_error(&err), DataError::Parse { row: 1, .. }));
    }

    #[test]
    fn overflowing_count_total_aborts() {
        let max = i64::MAX;
        let csv = format!(
            "dteday,season,weathersit,cnt\n2011-01-01,1,1,{max}\n2011-01-02,1,1,{max}\n2011-01-03,1,1,{max}\n"
        );
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(data_error(&err), DataError::Parse { row: 3, .. }));
    }

    #[test]
    fn largest_accepted_total_builds_a_report() {
        // Two rows of i64::MAX still fit in a u64 total.
        let max = i64::MAX;
        let csv = format!("dteday,season,weathersit,cnt\n2011-01-01,1,1,{max}\n2011-01-02,1,1,{max}\n");
        let ds = read_csv(csv.as_bytes()).unwrap();
        let report = crate::data::aggregate::Report::build(&ds.records);
        assert_eq!(report.summary.total, 2 * max as u64);
        assert_eq!(report.by_month[0].rental_total, 2 * max as u64);
    }
}

/// Shared parsing for SWPC JSON tables.
///
/// SWPC publishes its products in two layouts:
/// - an array of objects (`planetary_k_index_1m.json`, `alerts.json`)
/// - an array of arrays whose first row names the columns
///   (`noaa-planetary-k-index.json`)
///
/// Both are flattened into `Record`s keyed by column name, after which the
/// same column parsers apply regardless of layout.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::model::{DisplayZone, FeedError, Reading};

/// One row of a feed, keyed by column name.
pub type Record = Map<String, Value>;

/// Naive timestamp layouts seen across SWPC products. All are UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

// ---------------------------------------------------------------------------
// Table layout
// ---------------------------------------------------------------------------

/// Parses a feed body into records, detecting the layout from the first row.
///
/// An empty array is a valid, empty table. Anything other than a top-level
/// array, or an array mixing layouts, is a parse error.
pub fn parse_records(body: &str) -> Result<Vec<Record>, FeedError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Array(rows) = value else {
        return Err(FeedError::Parse {
            message: "expected a top-level JSON array".to_string(),
        });
    };

    match rows.first() {
        None => Ok(Vec::new()),
        Some(Value::Array(_)) => records_from_header_rows(rows),
        Some(Value::Object(_)) => records_from_objects(rows),
        Some(other) => Err(FeedError::Parse {
            message: format!("unexpected row type: {}", other),
        }),
    }
}

fn records_from_objects(rows: Vec<Value>) -> Result<Vec<Record>, FeedError> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| match row {
            Value::Object(record) => Ok(record),
            _ => Err(FeedError::Parse {
                message: format!("row {} is not an object", i),
            }),
        })
        .collect()
}

/// Re-keys every data row by the header in row 0.
///
/// Cells beyond the header width are ignored; short rows simply lack the
/// trailing columns.
fn records_from_header_rows(rows: Vec<Value>) -> Result<Vec<Record>, FeedError> {
    let mut rows = rows.into_iter();
    let header: Vec<String> = match rows.next() {
        Some(Value::Array(cells)) => cells
            .into_iter()
            .map(|cell| match cell {
                Value::String(name) => Ok(name),
                other => Err(FeedError::Parse {
                    message: format!("header cell is not a string: {}", other),
                }),
            })
            .collect::<Result<_, _>>()?,
        _ => {
            return Err(FeedError::Parse {
                message: "missing header row".to_string(),
            })
        }
    };

    rows.enumerate()
        .map(|(i, row)| match row {
            Value::Array(cells) => Ok(header.iter().cloned().zip(cells).collect::<Record>()),
            _ => Err(FeedError::Parse {
                message: format!("row {} is not an array", i + 1),
            }),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Column parsers
// ---------------------------------------------------------------------------

/// Parses a UTC timestamp string and converts it into `zone`.
///
/// Naive timestamps are taken as UTC. Timestamps carrying an explicit offset
/// are converted from that offset rather than re-labelled.
pub fn parse_utc_timestamp(raw: &str, zone: DisplayZone) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(zone.convert(with_offset.with_timezone(&Utc)));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| zone.convert(naive.and_utc()))
}

/// Reads `column` from `record` as a timestamp in `zone`.
pub fn time_column(
    record: &Record,
    column: &str,
    zone: DisplayZone,
) -> Option<DateTime<FixedOffset>> {
    record
        .get(column)
        .and_then(Value::as_str)
        .and_then(|raw| parse_utc_timestamp(raw, zone))
}

/// Reads `column` from `record` as a real number. Accepts JSON numbers and
/// numeric strings; rejects non-finite values.
pub fn numeric_column(record: &Record, column: &str) -> Option<f64> {
    let value = match record.get(column)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

/// Reads `column` from `record` as text, or an empty string when absent.
pub fn text_column(record: &Record, column: &str) -> String {
    match record.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Timestamped series
// ---------------------------------------------------------------------------

/// Extracts a Kp series from `records`, keeping only rows where both the
/// time column and the value column parse. Rows are returned in feed order.
pub fn parse_timestamped_series(
    records: &[Record],
    time_col: &str,
    value_col: &str,
    zone: DisplayZone,
) -> Vec<Reading> {
    let readings: Vec<Reading> = records
        .iter()
        .filter_map(|record| {
            let timestamp = time_column(record, time_col, zone)?;
            let kp_value = numeric_column(record, value_col)?;
            Reading::new(timestamp, kp_value)
        })
        .collect();

    let discarded = records.len() - readings.len();
    if discarded > 0 {
        tracing::debug!(
            time_col,
            value_col,
            discarded,
            kept = readings.len(),
            "dropped rows with unparseable time or value"
        );
    }
    readings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

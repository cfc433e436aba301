/// 1-minute planetary K-index feed.
///
/// Raw rows look like
/// `{"time_tag": "2024-05-10T17:00:00", "kp_index": 8, "estimated_kp": 8.33, ...}`.
/// Only `time_tag` and `kp_index` are used.

use crate::ingest::feeds::{Feed, FeedSource};
use crate::ingest::table::{self, Record};
use crate::model::{DisplayZone, FeedError, FeedOutcome, Reading};

pub const TIME_COLUMN: &str = "time_tag";
pub const KP_COLUMN: &str = "kp_index";

/// Converts parsed records into a chronologically ordered Kp series.
pub fn normalize_records(records: &[Record], zone: DisplayZone) -> Vec<Reading> {
    let mut readings = table::parse_timestamped_series(records, TIME_COLUMN, KP_COLUMN, zone);
    readings.sort_by_key(|reading| reading.timestamp);
    readings
}

/// Parses a raw feed body. Fails only if the body is not a usable table.
pub fn normalize(body: &str, zone: DisplayZone) -> Result<Vec<Reading>, FeedError> {
    let records = table::parse_records(body)?;
    Ok(normalize_records(&records, zone))
}

/// Fetches and normalizes the feed. Never fails; see `FeedOutcome`.
pub fn fetch_and_normalize(source: &dyn FeedSource, zone: DisplayZone) -> FeedOutcome<Reading> {
    super::fetch_soft(source, Feed::KpIndex, |records| {
        normalize_records(records, zone)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

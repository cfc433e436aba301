/// Storm-level readings from the 3-hourly planetary K-index product.
///
/// The product is a table whose first row is the header:
///
/// ```text
/// [["time_tag","Kp","a_running","station_count"],
///  ["2024-05-10 18:00:00.000","8.67","207","8"], ...]
/// ```
///
/// Readings with Kp >= 5 are kept and tagged with their storm level.

use crate::ingest::feeds::{Feed, FeedSource};
use crate::ingest::table::{self, Record};
use crate::model::{DisplayZone, FeedError, FeedOutcome, StormEvent};
use crate::severity;

pub const TIME_COLUMN: &str = "time_tag";
pub const KP_COLUMN: &str = "Kp";

/// Kp at or above which a reading counts as a geomagnetic storm (G1).
pub const STORM_THRESHOLD_KP: f64 = 5.0;

/// Converts records into storm events, most recent first.
pub fn normalize_records(records: &[Record], zone: DisplayZone) -> Vec<StormEvent> {
    let mut events: Vec<StormEvent> =
        table::parse_timestamped_series(records, TIME_COLUMN, KP_COLUMN, zone)
            .into_iter()
            .filter(|reading| reading.kp_value >= STORM_THRESHOLD_KP)
            .filter_map(|reading| {
                Some(StormEvent {
                    g_level: severity::g_level(reading.kp_value)?,
                    timestamp: reading.timestamp,
                    kp_value: reading.kp_value,
                })
            })
            .collect();
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    events
}

pub fn normalize(body: &str, zone: DisplayZone) -> Result<Vec<StormEvent>, FeedError> {
    let records = table::parse_records(body)?;
    Ok(normalize_records(&records, zone))
}

/// Fetches and normalizes the feed. Never fails; see `FeedOutcome`.
pub fn fetch_and_normalize(
    source: &dyn FeedSource,
    zone: DisplayZone,
) -> FeedOutcome<StormEvent> {
    super::fetch_soft(source, Feed::StormEvents, |records| {
        normalize_records(records, zone)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// Space weather alert bulletins.
///
/// Upstream rows are `{"product_id", "issue_datetime", "message"}` and are
/// renamed to `Alert { alert_type, issue_time, message }`.

use crate::ingest::feeds::{Feed, FeedSource};
use crate::ingest::table::{self, Record};
use crate::model::{Alert, DisplayZone, FeedError, FeedOutcome};

pub const ISSUE_TIME_COLUMN: &str = "issue_datetime";
pub const TYPE_COLUMN: &str = "product_id";
pub const MESSAGE_COLUMN: &str = "message";

/// How many alerts the dashboard shows.
pub const DISPLAY_LIMIT: usize = 5;

/// Converts records into alerts ordered oldest first. Rows whose issue time
/// does not parse are dropped; duplicates are kept.
pub fn normalize_records(records: &[Record], zone: DisplayZone) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = records
        .iter()
        .filter_map(|record| {
            Some(Alert {
                issue_time: table::time_column(record, ISSUE_TIME_COLUMN, zone)?,
                alert_type: table::text_column(record, TYPE_COLUMN),
                message: table::text_column(record, MESSAGE_COLUMN),
            })
        })
        .collect();
    alerts.sort_by_key(|alert| alert.issue_time);
    alerts
}

pub fn normalize(body: &str, zone: DisplayZone) -> Result<Vec<Alert>, FeedError> {
    let records = table::parse_records(body)?;
    Ok(normalize_records(&records, zone))
}

/// Fetches and normalizes the feed. Never fails; see `FeedOutcome`.
pub fn fetch_and_normalize(source: &dyn FeedSource, zone: DisplayZone) -> FeedOutcome<Alert> {
    super::fetch_soft(source, Feed::Alerts, |records| {
        normalize_records(records, zone)
    })
}

/// The `limit` most recent alerts, newest first.
///
/// The sort is stable, so alerts sharing an issue time keep their relative
/// order from `alerts`.
pub fn select_recent(alerts: &[Alert], limit: usize) -> Vec<Alert> {
    let mut recent = alerts.to_vec();
    recent.sort_by(|a, b| b.issue_time.cmp(&a.issue_time));
    recent.truncate(limit);
    recent
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

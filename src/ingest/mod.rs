/// Data ingestion from the NOAA Space Weather Prediction Center.
///
/// Submodules:
/// - `feeds`        — feed registry and HTTP transport.
/// - `table`        — shared table and column parsing.
/// - `kp_index`     — 1-minute planetary K-index series.
/// - `alerts`       — alert, watch, and warning bulletins.
/// - `storm_events` — storm-level readings from the 3-hourly K-index.
///
/// Every `fetch_and_normalize` follows the same soft-failure contract: any
/// transport or parse failure is logged and turned into an empty
/// `FeedOutcome` carrying a warning, never an error.

pub mod alerts;
pub mod feeds;
pub mod kp_index;
pub mod storm_events;
pub mod table;

use crate::logging;
use crate::model::FeedOutcome;
use feeds::{Feed, FeedSource};
use table::Record;

/// Fetches `feed`, splits it into records, and hands them to `normalize`.
pub(crate) fn fetch_soft<T>(
    source: &dyn FeedSource,
    feed: Feed,
    normalize: impl FnOnce(&[Record]) -> Vec<T>,
) -> FeedOutcome<T> {
    let records = source
        .fetch(feed)
        .and_then(|body| table::parse_records(&body));

    match records {
        Ok(records) => {
            let rows = normalize(&records);
            logging::log_fetch_summary(feed, records.len(), rows.len());
            FeedOutcome::ok(rows)
        }
        Err(err) => {
            logging::log_feed_failure(feed, &source.url(feed), &err);
            FeedOutcome::failed(format!("{} fetch failed: {}", feed.display_name(), err))
        }
    }
}

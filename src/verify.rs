//! Feed Verification Module
//!
//! Checks each configured SWPC feed against the live service: is it
//! reachable, does it parse as a table, and how many of its rows survive
//! normalization. Useful after changing feed URLs or when SWPC announces a
//! product format change.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::ingest::feeds::{Feed, FeedSource};
use crate::ingest::{alerts, kp_index, storm_events, table};
use crate::model::DisplayZone;

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub results: Vec<FeedVerification>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub working: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedVerification {
    pub feed: Feed,
    pub url: String,
    pub status: VerificationStatus,
    pub reachable: bool,
    /// Rows in the table, excluding a header row.
    pub total_rows: usize,
    /// Rows with a parseable time (and value, where the feed has one).
    pub usable_rows: usize,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum VerificationStatus {
    /// Reachable, parseable, and at least one usable row.
    Success,
    /// Reachable and parseable, but no usable rows.
    PartialSuccess,
    Failed,
}

// ============================================================================
// Single Feed
// ============================================================================

/// Rows that survive the feed's own parsing rules, before any storm filter.
fn usable_rows(feed: Feed, records: &[table::Record]) -> usize {
    let zone = DisplayZone::Utc;
    match feed {
        Feed::KpIndex => kp_index::normalize_records(records, zone).len(),
        Feed::Alerts => alerts::normalize_records(records, zone).len(),
        Feed::StormEvents => table::parse_timestamped_series(
            records,
            storm_events::TIME_COLUMN,
            storm_events::KP_COLUMN,
            zone,
        )
        .len(),
    }
}

pub fn verify_feed(source: &dyn FeedSource, feed: Feed) -> FeedVerification {
    let mut result = FeedVerification {
        feed,
        url: source.url(feed),
        status: VerificationStatus::Failed,
        reachable: false,
        total_rows: 0,
        usable_rows: 0,
        error_message: None,
    };

    let body = match source.fetch(feed) {
        Ok(body) => body,
        Err(e) => {
            result.error_message = Some(format!("Request failed: {}", e));
            return result;
        }
    };
    result.reachable = true;

    match table::parse_records(&body) {
        Ok(records) => {
            result.total_rows = records.len();
            result.usable_rows = usable_rows(feed, &records);
            result.status = if result.usable_rows > 0 {
                VerificationStatus::Success
            } else {
                VerificationStatus::PartialSuccess
            };
        }
        Err(e) => {
            result.error_message = Some(e.to_string());
        }
    }

    result
}

// ============================================================================
// Full Verification Runner
// ============================================================================

pub fn run_full_verification(source: &dyn FeedSource) -> VerificationReport {
    let results: Vec<FeedVerification> = Feed::ALL
        .iter()
        .map(|&feed| verify_feed(source, feed))
        .collect();

    let working = results
        .iter()
        .filter(|r| r.status != VerificationStatus::Failed)
        .count();

    VerificationReport {
        timestamp: Utc::now().to_rfc3339(),
        summary: VerificationSummary {
            total: results.len(),
            working,
            failed: results.len() - working,
        },
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::feeds::StaticFeedSource;

    #[test]
    fn test_report_classifies_each_feed() {
        let source = StaticFeedSource::new()
            .with_body(
                Feed::KpIndex,
                r#"[{"time_tag": "2024-05-10T17:00:00", "kp_index": 8}, {"time_tag": "x", "kp_index": 1}]"#,
            )
            .with_body(Feed::Alerts, "not json");

        let report = run_full_verification(&source);
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.working, 1);
        assert_eq!(report.summary.failed, 2);

        let kp = &report.results[0];
        assert_eq!(kp.status, VerificationStatus::Success);
        assert_eq!((kp.total_rows, kp.usable_rows), (2, 1));

        let alerts = &report.results[1];
        assert!(alerts.reachable);
        assert_eq!(alerts.status, VerificationStatus::Failed);
        assert!(alerts.error_message.as_deref().unwrap().starts_with("Parse error"));

        let storms = &report.results[2];
        assert!(!storms.reachable);
        assert!(storms.error_message.as_deref().unwrap().contains("404"));
    }

    #[test]
    fn test_quiet_storm_feed_is_still_usable() {
        // No storm-level rows is normal; the feed itself is healthy.
        let source = StaticFeedSource::new().with_body(
            Feed::StormEvents,
            r#"[["time_tag","Kp"],["2024-05-10 00:00:00.000","1.33"]]"#,
        );
        let result = verify_feed(&source, Feed::StormEvents);
        assert_eq!(result.status, VerificationStatus::Success);
        assert_eq!(result.usable_rows, 1);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = run_full_verification(&StaticFeedSource::new());
        let json = serde_json::to_string(&report).expect("report is serializable");
        assert!(json.contains("\"feed\":\"KpIndex\""));
        assert!(json.contains("\"status\":\"Failed\""));
    }
}

/// Assembles everything one render needs.
///
/// The display zone and the current instant are explicit parameters; the
/// three feeds go through a caller-owned `FeedCache` keyed by zone, since
/// timezone conversion happens inside each fetch.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::analysis::buckets::bucket_last_24h;
use crate::cache::TtlCache;
use crate::ingest::feeds::FeedSource;
use crate::ingest::{alerts, kp_index, storm_events};
use crate::model::{Alert, BucketedReading, DisplayZone, FeedOutcome, Reading, StormEvent};
use crate::severity::{self, BlockColor, StormTier};
use crate::time_context::TimeContext;

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// One TTL cache per feed, each keyed by display zone.
#[derive(Debug, Clone)]
pub struct FeedCache {
    kp_index: TtlCache<DisplayZone, FeedOutcome<Reading>>,
    alerts: TtlCache<DisplayZone, FeedOutcome<Alert>>,
    storm_events: TtlCache<DisplayZone, FeedOutcome<StormEvent>>,
}

impl FeedCache {
    pub fn new(ttl: Duration) -> Self {
        FeedCache {
            kp_index: TtlCache::new(ttl),
            alerts: TtlCache::new(ttl),
            storm_events: TtlCache::new(ttl),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One coloured status block for a 3-hour bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusBlock {
    pub time_label: String, // "HH:MM <zone>"
    pub kp_text: String,    // one decimal, e.g. "5.3"
    pub level_label: &'static str,
    pub tier: StormTier,
    pub color: BlockColor,
}

impl StatusBlock {
    pub fn from_bucket(bucket: &BucketedReading, zone: DisplayZone) -> Self {
        let (level_label, tier) = severity::classify(bucket.mean_kp);
        StatusBlock {
            time_label: format!("{} {}", bucket.bucket_start.format("%H:%M"), zone.abbreviation()),
            kp_text: format!("{:.1}", bucket.mean_kp),
            level_label,
            tier,
            color: BlockColor::for_kp(bucket.mean_kp),
        }
    }
}

/// Everything the presentation layer reads for one render.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub zone: DisplayZone,
    pub time: TimeContext,
    pub kp_blocks: Vec<StatusBlock>,
    pub storm_events: Vec<StormEvent>,
    /// Most recent alerts, newest first, at most `alerts::DISPLAY_LIMIT`.
    pub alerts: Vec<Alert>,
    /// User-visible warnings for feeds that failed, in feed order.
    pub notices: Vec<String>,
}

/// Fetches (or reuses) the three feeds and derives the display tables.
pub fn build_snapshot_at(
    source: &dyn FeedSource,
    cache: &mut FeedCache,
    zone: DisplayZone,
    now_utc: DateTime<Utc>,
    now_instant: Instant,
) -> DashboardSnapshot {
    let time = TimeContext::at(now_utc, zone);

    let kp = cache.kp_index.get_or_populate_at(zone, now_instant, || {
        kp_index::fetch_and_normalize(source, zone)
    });
    let alert_feed = cache.alerts.get_or_populate_at(zone, now_instant, || {
        alerts::fetch_and_normalize(source, zone)
    });
    let storms = cache.storm_events.get_or_populate_at(zone, now_instant, || {
        storm_events::fetch_and_normalize(source, zone)
    });

    let notices: Vec<String> = [&kp.warning, &alert_feed.warning, &storms.warning]
        .into_iter()
        .flatten()
        .cloned()
        .collect();

    let kp_blocks = bucket_last_24h(&kp.rows, time.now)
        .iter()
        .map(|bucket| StatusBlock::from_bucket(bucket, zone))
        .collect();

    DashboardSnapshot {
        zone,
        kp_blocks,
        storm_events: storms.rows,
        alerts: alerts::select_recent(&alert_feed.rows, alerts::DISPLAY_LIMIT),
        notices,
        time,
    }
}

/// `build_snapshot_at` with the system clocks.
pub fn build_snapshot(
    source: &dyn FeedSource,
    cache: &mut FeedCache,
    zone: DisplayZone,
) -> DashboardSnapshot {
    build_snapshot_at(source, cache, zone, Utc::now(), Instant::now())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::feeds::{Feed, StaticFeedSource};
    use chrono::TimeZone;

    fn now_utc() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 22, 0, 0).unwrap()
    }

    fn source() -> StaticFeedSource {
        StaticFeedSource::new()
            .with_body(
                Feed::KpIndex,
                r#"[
                    {"time_tag": "2024-05-10T16:00:00", "kp_index": 5},
                    {"time_tag": "2024-05-10T16:01:00", "kp_index": 6},
                    {"time_tag": "2024-05-10T19:30:00", "kp_index": 8},
                    {"time_tag": "2024-05-10T21:00:00", "kp_index": 3}
                ]"#,
            )
            .with_body(
                Feed::Alerts,
                r#"[{"product_id": "K07A", "issue_datetime": "2024-05-10 17:59:49.193", "message": "K-index of 7"}]"#,
            )
            .with_body(
                Feed::StormEvents,
                r#"[["time_tag","Kp"],["2024-05-10 18:00:00.000","8.67"]]"#,
            )
    }

    #[test]
    fn test_snapshot_from_all_feeds() {
        let source = source();
        let mut cache = FeedCache::new(Duration::from_secs(600));
        let snapshot = build_snapshot_at(&source, &mut cache, DisplayZone::Utc, now_utc(), Instant::now());

        assert!(snapshot.notices.is_empty());
        let labels: Vec<(&str, &str, &str)> = snapshot
            .kp_blocks
            .iter()
            .map(|b| (b.time_label.as_str(), b.kp_text.as_str(), b.level_label))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("15:00 UTC", "5.5", "G5 (Extreme)"),
                ("18:00 UTC", "8.0", "G4 (Severe)"),
                ("21:00 UTC", "3.0", "G0 (Quiet)"),
            ]
        );
        assert_eq!(snapshot.kp_blocks[2].color, BlockColor::Safe);
        assert_eq!(snapshot.kp_blocks[1].color, BlockColor::Alert);
        assert_eq!(snapshot.storm_events.len(), 1);
        assert_eq!(snapshot.alerts[0].alert_type, "K07A");
        assert_eq!(snapshot.time.banner(), "Time until next forecast block (00:00 UTC): 2:00:00");
    }

    #[test]
    fn test_one_failed_feed_does_not_affect_the_others() {
        let source = source().with_body(Feed::Alerts, "{malformed");
        let mut cache = FeedCache::new(Duration::from_secs(600));
        let snapshot = build_snapshot_at(&source, &mut cache, DisplayZone::Utc, now_utc(), Instant::now());

        assert!(snapshot.alerts.is_empty());
        assert_eq!(snapshot.notices.len(), 1);
        assert!(snapshot.notices[0].starts_with("Alerts fetch failed"));
        assert_eq!(snapshot.kp_blocks.len(), 3);
        assert_eq!(snapshot.storm_events.len(), 1);
    }

    #[test]
    fn test_cache_is_keyed_by_zone() {
        let source = source();
        let mut cache = FeedCache::new(Duration::from_secs(600));
        let instant = Instant::now();

        build_snapshot_at(&source, &mut cache, DisplayZone::Utc, now_utc(), instant);
        assert_eq!(source.fetch_count(), 3);

        build_snapshot_at(&source, &mut cache, DisplayZone::Utc, now_utc(), instant + Duration::from_secs(60));
        assert_eq!(source.fetch_count(), 3, "second render within TTL reuses results");

        let ist = build_snapshot_at(&source, &mut cache, DisplayZone::Ist, now_utc(), instant);
        assert_eq!(source.fetch_count(), 6, "a different zone is a different key");
        assert!(ist.kp_blocks.iter().all(|b| b.time_label.ends_with("IST")));

        build_snapshot_at(&source, &mut cache, DisplayZone::Utc, now_utc(), instant + Duration::from_secs(600));
        assert_eq!(source.fetch_count(), 9, "expired entries are fetched again");
    }
}

/// Plain-text rendering of a dashboard snapshot.
///
/// Every section has an explicit "no data" line, so an empty feed is never
/// rendered as a blank section.

use std::fmt::Write;

use crate::dashboard::DashboardSnapshot;

pub const TITLE: &str = "Geomagnetic Storm Dashboard";
pub const ATTRIBUTION: &str = "Data from NOAA SWPC: https://www.swpc.noaa.gov";

const ALERT_ICON: &str = "🚨";
const RULE: &str = "------------------------------------------------------------";

pub fn render_text(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_page(&mut out, snapshot);
    out
}

fn write_page(out: &mut String, snapshot: &DashboardSnapshot) -> std::fmt::Result {
    let zone = snapshot.zone.abbreviation();

    writeln!(out, "{}", TITLE)?;
    writeln!(
        out,
        "Real-time monitoring of geomagnetic activity, alerts, and Kp index trends from NOAA SWPC."
    )?;
    writeln!(out, "Timezone: {}", snapshot.zone)?;
    writeln!(out)?;
    writeln!(out, "⏳ {}", snapshot.time.banner())?;

    for notice in &snapshot.notices {
        writeln!(out, "⚠ {}", notice)?;
    }

    writeln!(out)?;
    writeln!(out, "Latest Kp Index (Last 24 Hours, Block View)")?;
    writeln!(out, "{}", RULE)?;
    if snapshot.kp_blocks.is_empty() {
        writeln!(out, "No recent Kp index data available.")?;
    } else {
        for block in &snapshot.kp_blocks {
            writeln!(
                out,
                "[{}] {}  Kp {}  {} {}",
                block.color.hex(),
                block.time_label,
                block.kp_text,
                block.tier.marker(),
                block.level_label
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Detected Geomagnetic Storm Events (Kp >= 5)")?;
    writeln!(out, "{}", RULE)?;
    if snapshot.storm_events.is_empty() {
        writeln!(out, "No recent geomagnetic storms detected.")?;
    } else {
        writeln!(out, "{:<22} {:>5}  {}", "time_tag", "Kp", "G Level")?;
        for event in &snapshot.storm_events {
            writeln!(
                out,
                "{:<22} {:>5.2}  {}",
                format!("{} {}", event.timestamp.format("%Y-%m-%d %H:%M"), zone),
                event.kp_value,
                event.g_level
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Recent NOAA Space Weather Alerts")?;
    writeln!(out, "{}", RULE)?;
    if snapshot.alerts.is_empty() {
        writeln!(out, "No recent alerts available.")?;
    } else {
        for alert in &snapshot.alerts {
            writeln!(
                out,
                "{} 🕒 {} {}",
                ALERT_ICON,
                alert.issue_time.format("%Y-%m-%d %H:%M"),
                zone
            )?;
            writeln!(out, "   {}", alert.alert_type)?;
            for line in alert.message.lines() {
                writeln!(out, "   {}", line)?;
            }
            writeln!(out)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "📡 {}", ATTRIBUTION)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{build_snapshot_at, FeedCache};
    use crate::ingest::feeds::{Feed, StaticFeedSource};
    use crate::model::DisplayZone;
    use chrono::{TimeZone, Utc};
    use std::time::{Duration, Instant};

    fn render(source: &StaticFeedSource, zone: DisplayZone) -> String {
        let mut cache = FeedCache::new(Duration::from_secs(600));
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 22, 0, 0).unwrap();
        render_text(&build_snapshot_at(source, &mut cache, zone, now, Instant::now()))
    }

    #[test]
    fn test_empty_feeds_render_explicit_no_data_states() {
        let source = StaticFeedSource::new()
            .with_body(Feed::KpIndex, "[]")
            .with_body(Feed::Alerts, "[]")
            .with_body(Feed::StormEvents, "[]");
        let page = render(&source, DisplayZone::Utc);
        assert!(page.contains("No recent Kp index data available."));
        assert!(page.contains("No recent geomagnetic storms detected."));
        assert!(page.contains("No recent alerts available."));
        assert!(!page.contains("⚠"), "empty feeds are not failures");
    }

    #[test]
    fn test_failed_feeds_show_notices() {
        let page = render(&StaticFeedSource::new(), DisplayZone::Ist);
        assert!(page.contains("⚠ Kp index fetch failed: HTTP error: 404"));
        assert!(page.contains("⚠ Alerts fetch failed"));
        assert!(page.contains("⚠ Storm data fetch failed"));
        assert!(page.contains("Time until next forecast block (06:00 IST): 2:30:00"));
    }

    #[test]
    fn test_populated_sections() {
        let source = StaticFeedSource::new()
            .with_body(Feed::KpIndex, r#"[{"time_tag": "2024-05-10T19:30:00", "kp_index": 8}]"#)
            .with_body(
                Feed::Alerts,
                r#"[{"product_id": "K07A", "issue_datetime": "2024-05-10 17:59:49.193", "message": "ALERT: K-index of 7\nThreshold Reached"}]"#,
            )
            .with_body(Feed::StormEvents, r#"[["time_tag","Kp"],["2024-05-10 18:00:00.000","8.67"]]"#);
        let page = render(&source, DisplayZone::Utc);
        assert!(page.contains("[#F44336] 18:00 UTC  Kp 8.0  🔴 G4 (Severe)"), "{}", page);
        assert!(page.contains("2024-05-10 18:00 UTC"));
        assert!(page.contains("8.67  G4"));
        assert!(page.contains("🚨 🕒 2024-05-10 17:59 UTC"));
        assert!(page.contains("   Threshold Reached"));
        assert!(page.ends_with(&format!("📡 {}\n", ATTRIBUTION)));
    }
}

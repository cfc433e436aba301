/// Current time, forecast-block boundary, and countdown.
///
/// SWPC issues Kp values for fixed 3-hour blocks starting at hours
/// 0, 3, 6, ..., 21. The dashboard counts down to the start of the next one.
///
/// # Clock injection
/// `TimeContext::at` takes the current instant as a parameter; only
/// `resolve_now` and `TimeContext::now` read the system clock.

use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};

use crate::model::DisplayZone;

/// Length of one forecast block, in hours.
pub const BLOCK_HOURS: u32 = 3;

/// Snapshot of "now" for a single render.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeContext {
    pub zone: DisplayZone,
    pub now: DateTime<FixedOffset>,
    pub next_block_boundary: DateTime<FixedOffset>,
    pub countdown: Duration,
}

impl TimeContext {
    /// Builds the context for an explicit UTC instant.
    pub fn at(now_utc: DateTime<Utc>, zone: DisplayZone) -> Self {
        let now = zone.convert(now_utc);
        let next_block_boundary = next_forecast_block(now);
        TimeContext {
            zone,
            now,
            next_block_boundary,
            countdown: countdown(now, next_block_boundary),
        }
    }

    /// Builds the context from the system clock.
    pub fn now(zone: DisplayZone) -> Self {
        Self::at(Utc::now(), zone)
    }

    /// Banner text, e.g. "Time until next forecast block (09:00 IST): 2:59:59".
    pub fn banner(&self) -> String {
        format!(
            "Time until next forecast block ({} {}): {}",
            self.next_block_boundary.format("%H:%M"),
            self.zone.abbreviation(),
            format_countdown(self.countdown)
        )
    }
}

/// Current instant in the given zone.
pub fn resolve_now(zone: DisplayZone) -> DateTime<FixedOffset> {
    zone.convert(Utc::now())
}

/// Drops minutes, seconds, and sub-second components.
pub(crate) fn truncate_to_hour(instant: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    instant
        - Duration::minutes(i64::from(instant.minute()))
        - Duration::seconds(i64::from(instant.second()))
        - Duration::nanoseconds(i64::from(instant.nanosecond()))
}

/// Start of the next 3-hour block after the one containing `now`.
///
/// Always advances: at exactly 06:00:00 the result is 09:00, not 06:00.
/// From hour 21 onward the result is 00:00 of the following day. Offsets are
/// fixed, so adding whole hours keeps wall-clock alignment.
pub fn next_forecast_block(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let hour = now.hour();
    let next_hour = ((hour / BLOCK_HOURS) + 1) * BLOCK_HOURS; // 3..=24
    truncate_to_hour(now) + Duration::hours(i64::from(next_hour - hour))
}

/// Time remaining until `boundary`, never negative.
pub fn countdown(now: DateTime<FixedOffset>, boundary: DateTime<FixedOffset>) -> Duration {
    let remaining = boundary - now;
    if remaining < Duration::zero() {
        Duration::zero()
    } else {
        remaining
    }
}

/// Formats a countdown as `H:MM:SS`, truncating sub-second precision.
pub fn format_countdown(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    format!(
        "{}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    fn utc_at(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        DisplayZone::Utc.convert(Utc.with_ymd_and_hms(2024, 5, 10, h, m, s).unwrap())
    }

    #[test]
    fn test_mid_block_advances_to_block_end() {
        let next = next_forecast_block(utc_at(5, 0, 0));
        assert_eq!(next, utc_at(6, 0, 0));
    }

    #[test]
    fn test_exact_boundary_advances_a_full_block() {
        let next = next_forecast_block(utc_at(6, 0, 0));
        assert_eq!(next, utc_at(9, 0, 0), "06:00 must advance to 09:00, not stay at 06:00");
    }

    #[test]
    fn test_last_block_rolls_to_next_day_midnight() {
        let next = next_forecast_block(utc_at(22, 0, 0));
        assert_eq!(next.day(), 11);
        assert_eq!((next.hour(), next.minute(), next.second()), (0, 0, 0));

        let from_21 = next_forecast_block(utc_at(21, 0, 0));
        assert_eq!(from_21, next);
    }

    #[test]
    fn test_sub_hour_components_are_zeroed() {
        let now = utc_at(7, 42, 13) + Duration::milliseconds(250);
        let next = next_forecast_block(now);
        assert_eq!(next, utc_at(9, 0, 0));
        assert_eq!(next.nanosecond(), 0);
    }

    #[test]
    fn test_month_end_rollover() {
        let now = DisplayZone::Utc.convert(Utc.with_ymd_and_hms(2024, 2, 29, 23, 30, 0).unwrap());
        let next = next_forecast_block(now);
        assert_eq!((next.month(), next.day(), next.hour()), (3, 1, 0));
    }

    #[test]
    fn test_boundary_is_aligned_in_display_zone() {
        // 02:00 UTC is 07:30 IST; the next IST block starts at 09:00 IST.
        let now_utc = Utc.with_ymd_and_hms(2024, 5, 10, 2, 0, 0).unwrap();
        let ctx = TimeContext::at(now_utc, DisplayZone::Ist);
        assert_eq!(ctx.next_block_boundary.hour(), 9);
        assert_eq!(ctx.next_block_boundary.minute(), 0);
        assert_eq!(ctx.countdown, Duration::minutes(90));
    }

    #[test]
    fn test_countdown_is_never_negative() {
        let now = utc_at(6, 0, 1);
        assert_eq!(countdown(now, utc_at(6, 0, 0)), Duration::zero());
        assert_eq!(countdown(now, next_forecast_block(now)), Duration::seconds(3 * 3600 - 1));
    }

    #[test]
    fn test_format_countdown_truncates_to_seconds() {
        let remaining = Duration::seconds(2 * 3600 + 5 * 60 + 9) + Duration::milliseconds(999);
        assert_eq!(format_countdown(remaining), "2:05:09");
        assert_eq!(format_countdown(Duration::zero()), "0:00:00");
    }

    #[test]
    fn test_banner_names_boundary_and_zone() {
        let now_utc = Utc.with_ymd_and_hms(2024, 5, 10, 5, 0, 0).unwrap();
        let ctx = TimeContext::at(now_utc, DisplayZone::Utc);
        assert_eq!(
            ctx.banner(),
            "Time until next forecast block (06:00 UTC): 1:00:00"
        );
    }

    #[test]
    fn test_resolve_now_uses_requested_offset() {
        assert_eq!(resolve_now(DisplayZone::Ist).offset().local_minus_utc(), 19_800);
    }
}

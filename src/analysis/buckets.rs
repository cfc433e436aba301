/// Trailing 24-hour Kp series in 3-hour blocks.
///
/// Blocks are aligned to hours 0, 3, ..., 21 of the readings' own zone, so an
/// IST dashboard shows IST-aligned blocks. Blocks with no readings are
/// omitted rather than shown as gaps.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, Timelike};

use crate::model::{BucketedReading, Reading};
use crate::time_context::{BLOCK_HOURS, truncate_to_hour};

/// Width of the trailing window, in hours.
pub const WINDOW_HOURS: i64 = 24;

/// Maximum number of blocks returned.
pub const MAX_BUCKETS: usize = 8;

/// Start of the 3-hour block containing `instant`.
pub fn bucket_start(instant: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    truncate_to_hour(instant) - Duration::hours(i64::from(instant.hour() % BLOCK_HOURS))
}

#[derive(Debug, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn new(value: f64) -> Self {
        Accumulator { sum: value, count: 1, min: value, max: value }
    }

    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Summation error can push the mean of near-equal values just past the
    /// extremes; the result is kept inside them.
    fn mean(&self) -> f64 {
        (self.sum / self.count as f64).clamp(self.min, self.max)
    }
}

/// Averages readings newer than `now - 24h` into 3-hour blocks and returns
/// the most recent `MAX_BUCKETS`, oldest first.
pub fn bucket_last_24h(readings: &[Reading], now: DateTime<FixedOffset>) -> Vec<BucketedReading> {
    let cutoff = now - Duration::hours(WINDOW_HOURS);

    let mut buckets: BTreeMap<DateTime<FixedOffset>, Accumulator> = BTreeMap::new();
    for reading in readings.iter().filter(|r| r.timestamp > cutoff) {
        buckets
            .entry(bucket_start(reading.timestamp))
            .and_modify(|acc| acc.push(reading.kp_value))
            .or_insert_with(|| Accumulator::new(reading.kp_value));
    }

    let skip = buckets.len().saturating_sub(MAX_BUCKETS);
    buckets
        .into_iter()
        .skip(skip)
        .map(|(bucket_start, acc)| BucketedReading {
            bucket_start,
            mean_kp: acc.mean(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

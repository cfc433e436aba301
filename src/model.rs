/// Core data types for the geomagnetic monitoring service.
///
/// This module defines the shared domain model imported by all other modules:
/// the display zone, the normalized feed rows, the soft-failure outcome
/// wrapper, and the feed error taxonomy. It contains no I/O.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use snafu::Snafu;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Display zone
// ---------------------------------------------------------------------------

/// Offset of India Standard Time from UTC, in seconds (UTC+05:30).
pub const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Timezone selected for display. Feed timestamps are UTC and are converted
/// into this zone exactly once, at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum DisplayZone {
    #[default]
    Ist,
    Utc,
}

impl DisplayZone {
    /// Fixed UTC offset for this zone. Neither zone observes DST.
    pub fn offset(self) -> FixedOffset {
        match self {
            DisplayZone::Ist => FixedOffset::east_opt(IST_OFFSET_SECS)
                .expect("UTC+05:30 is within the valid offset range"),
            DisplayZone::Utc => FixedOffset::east_opt(0).expect("zero offset is valid"),
        }
    }

    /// Short label used next to rendered times, e.g. "09:00 IST".
    pub fn abbreviation(self) -> &'static str {
        match self {
            DisplayZone::Ist => "IST",
            DisplayZone::Utc => "UTC",
        }
    }

    /// Converts a UTC instant into this zone.
    pub fn convert(self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset())
    }
}

impl fmt::Display for DisplayZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayZone::Ist => write!(f, "IST (Asia/Kolkata)"),
            DisplayZone::Utc => write!(f, "UTC"),
        }
    }
}

impl FromStr for DisplayZone {
    type Err = String;

    /// Accepts "IST", "UTC" in any case, and the selector labels such as
    /// "IST (Asia/Kolkata)".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        if normalized.starts_with("IST") || normalized == "ASIA/KOLKATA" {
            Ok(DisplayZone::Ist)
        } else if normalized == "UTC" {
            Ok(DisplayZone::Utc)
        } else {
            Err(format!("unknown display zone '{}', expected IST or UTC", s))
        }
    }
}

impl TryFrom<String> for DisplayZone {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Normalized rows
// ---------------------------------------------------------------------------

/// Lowest and highest values on the planetary K-index scale.
pub const KP_MIN: f64 = 0.0;
pub const KP_MAX: f64 = 9.0;

/// A single planetary K-index observation, already converted to the
/// display zone.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: DateTime<FixedOffset>,
    pub kp_value: f64,
}

impl Reading {
    /// Builds a reading, rejecting Kp values that are not finite or fall
    /// outside the 0–9 scale.
    pub fn new(timestamp: DateTime<FixedOffset>, kp_value: f64) -> Option<Self> {
        if kp_value.is_finite() && (KP_MIN..=KP_MAX).contains(&kp_value) {
            Some(Reading { timestamp, kp_value })
        } else {
            None
        }
    }
}

/// Mean Kp over one 3-hour block.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketedReading {
    pub bucket_start: DateTime<FixedOffset>,
    pub mean_kp: f64,
}

/// A storm-level reading (Kp >= 5) annotated with its G-scale level.
#[derive(Debug, Clone, PartialEq)]
pub struct StormEvent {
    pub timestamp: DateTime<FixedOffset>,
    pub kp_value: f64,
    pub g_level: String, // "G1".."G5"
}

/// A space weather bulletin from the SWPC alerts product.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub issue_time: DateTime<FixedOffset>,
    pub alert_type: String, // product_id upstream, e.g. "K05A"
    pub message: String,
}

// ---------------------------------------------------------------------------
// Feed outcome
// ---------------------------------------------------------------------------

/// Result of one fetch-and-normalize call.
///
/// Normalizers never return an error: a failed fetch produces empty `rows`
/// and a user-visible `warning` naming the feed. Empty `rows` with no warning
/// is a valid "no data" state.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedOutcome<T> {
    pub rows: Vec<T>,
    pub warning: Option<String>,
}

impl<T> FeedOutcome<T> {
    pub fn ok(rows: Vec<T>) -> Self {
        FeedOutcome { rows, warning: None }
    }

    pub fn failed(warning: String) -> Self {
        FeedOutcome {
            rows: Vec::new(),
            warning: Some(warning),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.warning.is_some()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or parsing an SWPC feed.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FeedError {
    /// Non-2xx HTTP response from SWPC.
    #[snafu(display("HTTP error: {status}"))]
    Http { status: u16 },

    /// The request did not complete within the configured timeout.
    #[snafu(display("Request timed out: {source}"))]
    Timeout { source: reqwest::Error },

    /// Connection, TLS, or body read failure.
    #[snafu(display("Transport error: {source}"))]
    Transport { source: reqwest::Error },

    /// The body was not valid JSON or did not have the expected shape.
    #[snafu(display("Parse error: {message}"))]
    Parse { message: String },
}

impl From<reqwest::Error> for FeedError {
    fn from(source: reqwest::Error) -> Self {
        if source.is_timeout() {
            FeedError::Timeout { source }
        } else if let Some(status) = source.status() {
            FeedError::Http {
                status: status.as_u16(),
            }
        } else {
            FeedError::Transport { source }
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(source: serde_json::Error) -> Self {
        FeedError::Parse {
            message: source.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

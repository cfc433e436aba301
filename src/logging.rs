/// Structured logging for the geomagnetic monitoring service
///
/// Built on `tracing`: a console layer on stderr plus an optional plain-text
/// file layer for unattended runs. Feed failures carry the feed name as a
/// field and are classified so that upstream format changes stand out from
/// ordinary network hiccups.

use std::error::Error;
use std::fmt;
use std::path::Path;

use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use crate::config::LoggingConfig;
use crate::ingest::feeds::Feed;
use crate::model::FeedError;

// ---------------------------------------------------------------------------
// Initialization
// ---------------------------------------------------------------------------

/// Installs the global subscriber.
///
/// `RUST_LOG`, when set, wins over `config.level`. Fails if the log file
/// cannot be created or a subscriber is already installed.
pub fn init_logger(config: &LoggingConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console = tfmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file = config
        .log_file
        .as_deref()
        .map(|path| -> Result<_, InitError> {
            let directory = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "geomon.log".to_string());
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(file_name)
                .build(directory)?;
            Ok(tfmt::layer().with_ansi(false).with_writer(appender))
        })
        .transpose()?;

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Timeouts, connection problems, and 5xx responses; likely to clear on
    /// the next refresh.
    Transient,
    /// 4xx responses and unparseable bodies; usually means the product moved
    /// or changed shape.
    Upstream,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Transient => write!(f, "TRANSIENT"),
            FailureType::Upstream => write!(f, "UPSTREAM"),
        }
    }
}

pub fn classify_feed_failure(err: &FeedError) -> FailureType {
    match err {
        FeedError::Timeout { .. } | FeedError::Transport { .. } => FailureType::Transient,
        FeedError::Http { status } if *status >= 500 => FailureType::Transient,
        FeedError::Http { .. } | FeedError::Parse { .. } => FailureType::Upstream,
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Logs a feed failure at a level matching its classification.
pub fn log_feed_failure(feed: Feed, url: &str, err: &FeedError) {
    let failure_type = classify_feed_failure(err);
    match failure_type {
        FailureType::Transient => {
            tracing::warn!(%feed, url, %failure_type, error = %err, "feed fetch failed")
        }
        FailureType::Upstream => {
            tracing::error!(%feed, url, %failure_type, error = %err, "feed fetch failed")
        }
    }
}

/// Logs how many rows survived normalization.
pub fn log_fetch_summary(feed: Feed, total: usize, kept: usize) {
    tracing::info!(%feed, total, kept, "feed normalized");
}

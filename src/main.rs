//! Renders the geomagnetic dashboard once to stdout.
//!
//! Configuration: `geomon.toml` (or `GEOMON_CONFIG`), plus `GEOMON_ZONE`
//! and `GEOMON_LOG_LEVEL` overrides, optionally from `.env`.

use std::process::ExitCode;

use geomon_service::config::Config;
use geomon_service::dashboard::{self, FeedCache};
use geomon_service::ingest::feeds::HttpFeedSource;
use geomon_service::{logging, render};

fn main() -> ExitCode {
    let config = match Config::load_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init_logger(&config.logging) {
        eprintln!("⚠ Logging disabled: {}", e);
    }

    let source = match HttpFeedSource::new(&config.feeds) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!(error = %e, "could not build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(zone = %config.display.zone, "rendering dashboard");
    let mut cache = FeedCache::new(config.cache.ttl());
    let snapshot = dashboard::build_snapshot(&source, &mut cache, config.display.zone);
    print!("{}", render::render_text(&snapshot));

    ExitCode::SUCCESS
}

/// SWPC feed registry and transport.
///
/// `Feed` is the single source of truth for which products the dashboard
/// reads. Retrieval goes through the `FeedSource` trait so normalizers can be
/// driven by canned bodies in tests; `HttpFeedSource` is the production
/// implementation over a blocking `reqwest` client with a bounded timeout.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::config::FeedsConfig;
use crate::model::FeedError;

pub const SWPC_BASE_URL: &str = "https://services.swpc.noaa.gov";

// ---------------------------------------------------------------------------
// Feed registry
// ---------------------------------------------------------------------------

/// The three SWPC products consumed by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Feed {
    /// Planetary K-index at 1-minute cadence (array of objects).
    KpIndex,
    /// Space weather alerts, watches and warnings (array of objects).
    Alerts,
    /// Derived 3-hourly planetary K-index (header row + array rows).
    StormEvents,
}

impl Feed {
    pub const ALL: [Feed; 3] = [Feed::KpIndex, Feed::Alerts, Feed::StormEvents];

    /// Name used in user-visible notices, e.g. "Kp index fetch failed: ...".
    pub fn display_name(self) -> &'static str {
        match self {
            Feed::KpIndex => "Kp index",
            Feed::Alerts => "Alerts",
            Feed::StormEvents => "Storm data",
        }
    }

    /// Product URL on the public SWPC service.
    pub fn default_url(self) -> String {
        let path = match self {
            Feed::KpIndex => "/json/planetary_k_index_1m.json",
            Feed::Alerts => "/products/alerts.json",
            Feed::StormEvents => "/products/noaa-planetary-k-index.json",
        };
        format!("{}{}", SWPC_BASE_URL, path)
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Something that can return the raw body of a feed.
pub trait FeedSource {
    fn fetch(&self, feed: Feed) -> Result<String, FeedError>;

    /// URL the feed is read from, for logging and verification reports.
    fn url(&self, feed: Feed) -> String {
        feed.default_url()
    }
}

/// Fetches feeds over HTTPS with a per-request timeout.
pub struct HttpFeedSource {
    client: reqwest::blocking::Client,
    config: FeedsConfig,
}

impl HttpFeedSource {
    pub fn new(config: &FeedsConfig) -> Result<Self, FeedError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("geomon_service/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpFeedSource {
            client,
            config: config.clone(),
        })
    }
}

impl FeedSource for HttpFeedSource {
    fn fetch(&self, feed: Feed) -> Result<String, FeedError> {
        let url = self.url(feed);
        tracing::debug!(%feed, %url, "fetching feed");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()?;

        if !response.status().is_success() {
            return Err(FeedError::Http {
                status: response.status().as_u16(),
            });
        }

        Ok(response.text()?)
    }

    fn url(&self, feed: Feed) -> String {
        self.config.url_for(feed).to_string()
    }
}

/// Serves fixed bodies per feed. A feed without a body answers like a 404.
///
/// Used for offline runs and tests; counts how many fetches it has served.
#[derive(Debug, Default)]
pub struct StaticFeedSource {
    bodies: HashMap<Feed, String>,
    fetches: Cell<usize>,
}

impl StaticFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, feed: Feed, body: impl Into<String>) -> Self {
        self.bodies.insert(feed, body.into());
        self
    }

    /// Number of `fetch` calls served so far, successful or not.
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

impl FeedSource for StaticFeedSource {
    fn fetch(&self, feed: Feed) -> Result<String, FeedError> {
        self.fetches.set(self.fetches.get() + 1);
        self.bodies
            .get(&feed)
            .cloned()
            .ok_or(FeedError::Http { status: 404 })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls_point_at_swpc_products() {
        assert_eq!(
            Feed::KpIndex.default_url(),
            "https://services.swpc.noaa.gov/json/planetary_k_index_1m.json"
        );
        assert_eq!(
            Feed::Alerts.default_url(),
            "https://services.swpc.noaa.gov/products/alerts.json"
        );
        assert_eq!(
            Feed::StormEvents.default_url(),
            "https://services.swpc.noaa.gov/products/noaa-planetary-k-index.json"
        );
    }

    #[test]
    fn test_display_names_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for feed in Feed::ALL {
            assert!(seen.insert(feed.display_name()), "duplicate name for {:?}", feed);
        }
    }

    #[test]
    fn test_static_source_serves_bodies_and_counts_fetches() {
        let source = StaticFeedSource::new().with_body(Feed::Alerts, "[]");
        assert_eq!(source.fetch(Feed::Alerts).expect("body present"), "[]");
        assert!(matches!(
            source.fetch(Feed::KpIndex),
            Err(FeedError::Http { status: 404 })
        ));
        assert_eq!(source.fetch_count(), 2);
    }

    #[test]
    fn test_http_source_uses_configured_urls() {
        let mut config = FeedsConfig::default();
        config.alerts_url = "http://localhost:9/alerts.json".to_string();
        let source = HttpFeedSource::new(&config).expect("client builds");
        assert_eq!(source.url(Feed::Alerts), "http://localhost:9/alerts.json");
        assert_eq!(source.url(Feed::KpIndex), Feed::KpIndex.default_url());
    }

    #[test]
    fn test_unreachable_host_is_transport_error() {
        let mut config = FeedsConfig::default();
        config.kp_index_url = "http://127.0.0.1:9/kp.json".to_string();
        config.timeout_secs = 2;
        let source = HttpFeedSource::new(&config).expect("client builds");
        let err = source.fetch(Feed::KpIndex).unwrap_err();
        assert!(
            matches!(err, FeedError::Transport { .. } | FeedError::Timeout { .. }),
            "got {:?}",
            err
        );
    }
}

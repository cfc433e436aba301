/// Service configuration.
///
/// Settings come from an optional TOML file (default `geomon.toml`, or the
/// path in `GEOMON_CONFIG`), with a few environment overrides loaded through
/// `.env`. Every key is optional; anything missing falls back to defaults
/// that match the public SWPC service.
///
/// ```toml
/// [feeds]
/// timeout_secs = 10
///
/// [cache]
/// ttl_secs = 600
///
/// [display]
/// zone = "IST"
///
/// [logging]
/// level = "info"
/// log_file = "logs/geomon.log"
/// ```

use serde::Deserialize;
use snafu::{ResultExt, Snafu};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ingest::feeds::Feed;
use crate::model::DisplayZone;

pub const DEFAULT_CONFIG_PATH: &str = "geomon.toml";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Could not read config file {}: {source}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Invalid config file {}: {source}", path.display()))]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[snafu(display("Invalid value for {key}: {message}"))]
    InvalidValue { key: String, message: String },
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feeds: FeedsConfig,
    pub cache: CacheConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub kp_index_url: String,
    pub alerts_url: String,
    pub storm_events_url: String,
    /// Upper bound on a single feed request, in seconds.
    pub timeout_secs: u64,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        FeedsConfig {
            kp_index_url: Feed::KpIndex.default_url(),
            alerts_url: Feed::Alerts.default_url(),
            storm_events_url: Feed::StormEvents.default_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl FeedsConfig {
    pub fn url_for(&self, feed: Feed) -> &str {
        match feed {
            Feed::KpIndex => &self.kp_index_url,
            Feed::Alerts => &self.alerts_url,
            Feed::StormEvents => &self.storm_events_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a fetched feed may be served before it is fetched again.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub zone: DisplayZone,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            log_file: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).context(ParseFileSnafu { path: origin })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
        Self::from_toml_str(&text, path)
    }

    /// Loads `.env`, then the file named by `GEOMON_CONFIG` (or
    /// `geomon.toml` if present), then applies environment overrides.
    pub fn load_default() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let mut config = match std::env::var("GEOMON_CONFIG") {
            Ok(path) => Self::load(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_PATH))?
            }
            Err(_) => Config::default(),
        };

        config.apply_overrides(
            std::env::var("GEOMON_ZONE").ok().as_deref(),
            std::env::var("GEOMON_LOG_LEVEL").ok().as_deref(),
        )?;
        Ok(config)
    }

    /// Applies the `GEOMON_ZONE` / `GEOMON_LOG_LEVEL` values, when set.
    pub fn apply_overrides(
        &mut self,
        zone: Option<&str>,
        log_level: Option<&str>,
    ) -> Result<(), ConfigError> {
        if let Some(zone) = zone {
            self.display.zone = zone.parse().map_err(|message| ConfigError::InvalidValue {
                key: "GEOMON_ZONE".to_string(),
                message,
            })?;
        }
        if let Some(level) = log_level {
            self.logging.level = level.to_string();
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.feeds.timeout_secs == 0 {
            return InvalidValueSnafu {
                key: "feeds.timeout_secs",
                message: "timeout must be at least one second",
            }
            .fail();
        }
        for feed in Feed::ALL {
            if self.feeds.url_for(feed).trim().is_empty() {
                return InvalidValueSnafu {
                    key: format!("feeds url for {}", feed),
                    message: "url must not be empty",
                }
                .fail();
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("api base_url must be http or https, got: {0}")]
    UnsupportedScheme(String),

    #[error("cache ttl_secs cannot be 0")]
    ZeroTtl,

    #[error("transmit pacing_interval_ms cannot be 0")]
    ZeroPacing,

    #[error("implausible season: {0}")]
    ImplausibleSeason(i32),
}

/// Relay configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RelayConfig {
    /// Season data API
    pub api: ApiConfig,
    /// Document cache behavior
    #[serde(default)]
    pub cache: CacheConfig,
    /// Outbound transmission behavior
    #[serde(default)]
    pub transmit: TransmitConfig,
    /// Season override; defaults to the current calendar year when absent
    #[serde(default)]
    pub season: Option<i32>,
    /// Optional statsd metrics exporter
    #[serde(default)]
    pub statsd: Option<StatsdConfig>,
}

impl RelayConfig {
    /// Validates the relay configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.api.base_url.scheme() {
            "http" | "https" => {}
            other => return Err(ValidationError::UnsupportedScheme(other.to_string())),
        }

        if self.cache.ttl_secs == 0 {
            return Err(ValidationError::ZeroTtl);
        }

        if self.transmit.pacing_interval_ms == 0 {
            return Err(ValidationError::ZeroPacing);
        }

        if let Some(season) = self.season
            && !(1950..=2100).contains(&season)
        {
            return Err(ValidationError::ImplausibleSeason(season));
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the season data API
    ///
    /// Note: Uses the `url::Url` type so invalid URLs are rejected during
    /// config deserialization.
    pub base_url: Url,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CacheConfig {
    /// Cache validity window in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Directory for persisted cache entries; in-memory when absent
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            ttl_secs: default_ttl_secs(),
            storage_dir: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TransmitConfig {
    /// Delay between consecutive item sends in milliseconds
    #[serde(default = "default_pacing_interval_ms")]
    pub pacing_interval_ms: u64,
    /// Chunking strategy for outbound batches
    #[serde(default)]
    pub strategy: TransmitStrategy,
}

impl Default for TransmitConfig {
    fn default() -> Self {
        TransmitConfig {
            pacing_interval_ms: default_pacing_interval_ms(),
            strategy: TransmitStrategy::default(),
        }
    }
}

/// How an outbound batch is mapped onto transport messages.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransmitStrategy {
    /// One count message then one message per record. Safe against the
    /// transport's single-message size ceiling.
    #[default]
    Discrete,
    /// Records joined into pipe-delimited text blobs, one message per
    /// section. Fewer round trips, but large seasons can exceed the size
    /// ceiling.
    Blob,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StatsdConfig {
    pub host: String,
    pub port: u16,
}

fn default_ttl_secs() -> u64 {
    // 12 hours
    60 * 60 * 12
}

fn default_pacing_interval_ms() -> u64 {
    // The real device silently drops bursts that an emulator absorbs, so the
    // default is the conservative real-device interval.
    175
}

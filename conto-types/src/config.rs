//! Configuration surface consumed by the client builder.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Options for the durable request/response cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Name of the store; the backing file is `{cache_dir}/{cache_name}.sqlite`.
    pub cache_name: String,
    /// Directory holding the store file. `None` means the current directory.
    pub cache_dir: Option<PathBuf>,
    /// Entry lifetime. `Duration::ZERO` means entries never expire.
    pub expire_after: Duration,
    /// Serve the stale cached entry when a refetch fails.
    pub stale_if_error: bool,
    /// Include the bearer auth header in the cache key. Off by default so
    /// identical logical requests hit the same entry across token refreshes.
    pub match_headers: bool,
    /// Preserve `Cache-Control`/`ETag` response headers instead of stripping
    /// them. The store's own `expire_after` policy governs freshness either
    /// way.
    pub respect_cache_control: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_name: "conto".to_string(),
            cache_dir: None,
            expire_after: Duration::ZERO,
            stale_if_error: true,
            match_headers: false,
            respect_cache_control: false,
        }
    }
}

/// Bounded retry-with-delay configuration for "too many requests" responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Maximum number of retries before the last 429 response is returned
    /// as-is.
    pub max_retries: u32,
    /// Base delay for the exponential fallback (`base * 2^attempt`), used
    /// when the response carries no parseable `Retry-After` header.
    pub base_delay: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Global configuration for the `Conto` client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the bank account data API.
    pub base_url: String,
    /// Durable cache options.
    pub cache: CacheConfig,
    /// Rate-limit back-off options.
    pub backoff: BackoffConfig,
    /// Maximum number of `next` links followed per transaction listing.
    /// Reaching the cap returns the pages accumulated so far with a warning.
    pub max_pages: u32,
    /// Safety margin subtracted from the server-provided token lifetime, so
    /// an in-flight request never races token expiry.
    pub token_expiry_margin: Duration,
}

impl ClientConfig {
    /// Production endpoint of the GoCardless Bank Account Data API.
    pub const DEFAULT_BASE_URL: &'static str = "https://bankaccountdata.gocardless.com/api/v2";
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            cache: CacheConfig::default(),
            backoff: BackoffConfig::default(),
            max_pages: 100,
            token_expiry_margin: Duration::from_secs(30),
        }
    }
}

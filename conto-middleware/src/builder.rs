//! Composes a transport stack in the conventional layering order.

use std::sync::Arc;

use conto_core::HttpTransport;
use conto_types::{BackoffConfig, CacheConfig, ContoError};

use crate::backoff::BackoffTransport;
use crate::cache::CachingTransport;

/// A fully composed transport stack.
///
/// `transport` is the outermost layer; `cache` keeps a direct handle to the
/// cache layer (when one was requested) for diagnostics such as the cache
/// status probe.
pub struct TransportStack {
    /// The composed transport, outermost layer first.
    pub transport: Arc<dyn HttpTransport>,
    /// Direct handle to the cache layer, if enabled.
    pub cache: Option<Arc<CachingTransport>>,
}

/// Builder for a layered transport stack over a raw transport.
///
/// Layers apply inside-out: the raw transport sits innermost, the cache wraps
/// it so back-off never delays a hit, and back-off wraps the cache so only
/// real network refetches are retried.
pub struct TransportStackBuilder {
    raw: Arc<dyn HttpTransport>,
    cache: Option<CacheConfig>,
    backoff: Option<BackoffConfig>,
}

impl TransportStackBuilder {
    /// Start from a raw transport.
    #[must_use]
    pub fn new(raw: Arc<dyn HttpTransport>) -> Self {
        Self {
            raw,
            cache: None,
            backoff: None,
        }
    }

    /// Add a durable response cache.
    #[must_use]
    pub fn with_cache(mut self, config: CacheConfig) -> Self {
        self.cache = Some(config);
        self
    }

    /// Add bounded 429 back-off.
    #[must_use]
    pub fn with_backoff(mut self, config: BackoffConfig) -> Self {
        self.backoff = Some(config);
        self
    }

    /// Compose the stack.
    ///
    /// # Errors
    /// Returns [`ContoError::Cache`] when the cache database cannot be
    /// opened.
    pub fn build(self) -> Result<TransportStack, ContoError> {
        let mut transport = self.raw;
        let mut cache_handle = None;

        if let Some(config) = self.cache {
            let cache = Arc::new(CachingTransport::new(transport, config)?);
            cache_handle = Some(cache.clone());
            transport = cache;
        }
        if let Some(config) = self.backoff {
            transport = Arc::new(BackoffTransport::new(transport, config));
        }

        Ok(TransportStack {
            transport,
            cache: cache_handle,
        })
    }
}

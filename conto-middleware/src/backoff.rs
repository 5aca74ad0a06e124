//! Bounded retry on 429 responses.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use conto_core::{ApiRequest, HttpTransport, RawResponse};
use conto_types::{BackoffConfig, ContoError};

/// Transport wrapper that retries rate-limited requests with a bounded delay.
///
/// Only 429 triggers a retry; transport failures and every other status pass
/// through untouched. The delay comes from the `Retry-After` header when it
/// parses as a number of seconds, otherwise from exponential doubling of the
/// configured base delay. Once the retries are exhausted the last 429 is
/// returned as-is for the pipeline to convert into an error.
pub struct BackoffTransport {
    inner: Arc<dyn HttpTransport>,
    config: BackoffConfig,
}

impl BackoffTransport {
    /// Wrap `inner` with the given retry policy.
    #[must_use]
    pub fn new(inner: Arc<dyn HttpTransport>, config: BackoffConfig) -> Self {
        Self { inner, config }
    }

    fn delay_for(&self, resp: &RawResponse, attempt: u32) -> Duration {
        // try_from_secs_f64 rejects negative, NaN, infinite, and
        // out-of-range values; any of those count as malformed.
        if let Some(value) = resp.header("Retry-After")
            && let Ok(seconds) = value.trim().parse::<f64>()
            && let Ok(delay) = Duration::try_from_secs_f64(seconds)
        {
            return delay;
        }
        // Exponential: base, 2*base, 4*base, ...
        self.config.base_delay * 2u32.saturating_pow(attempt)
    }
}

#[async_trait]
impl HttpTransport for BackoffTransport {
    async fn execute(&self, req: &ApiRequest) -> Result<RawResponse, ContoError> {
        let mut attempt: u32 = 0;
        loop {
            let resp = self.inner.execute(req).await?;
            if resp.status != 429 || attempt >= self.config.max_retries {
                return Ok(resp);
            }
            let delay = self.delay_for(&resp, attempt);
            warn!(
                url = %req.url,
                attempt = attempt + 1,
                max = self.config.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "rate limited, backing off"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

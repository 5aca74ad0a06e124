use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use conto_core::models::{TokenPair, TokenRefresh};
use conto_core::{
    ApiRequest, HttpTransport, Method, RequestBody, RequestPipeline, ReqwestTransport, TokenManager,
};
use conto_middleware::{CacheStatus, CachingTransport, TransportStackBuilder};
use conto_types::{BackoffConfig, CacheConfig, ClientConfig, ContoError};

/// The client facade.
///
/// Holds the composed transport stack and the token manager; every resource
/// method goes through the authenticated pipeline, while token acquisition
/// talks to the raw transport directly so credentials are never cached or
/// rate-limit delayed.
pub struct Conto {
    pub(crate) pipeline: RequestPipeline,
    pub(crate) max_pages: u32,
    raw: Arc<dyn HttpTransport>,
    cache: Option<Arc<CachingTransport>>,
    secret_id: String,
    secret_key: String,
}

/// Builder for [`Conto`].
pub struct ContoBuilder {
    secret_id: String,
    secret_key: String,
    config: ClientConfig,
    cache_enabled: bool,
    backoff_enabled: bool,
    http_client: Option<reqwest::Client>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl ContoBuilder {
    /// Create a builder with the given API secrets and default configuration.
    ///
    /// Behavior and trade-offs:
    /// - Defaults target the production endpoint with a durable cache whose
    ///   entries never expire, stale-on-error serving, and three 429 retries.
    /// - Token refresh happens lazily on first use; construction performs no
    ///   network or disk work beyond opening the cache database.
    #[must_use]
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
            config: ClientConfig::default(),
            cache_enabled: true,
            backoff_enabled: true,
            http_client: None,
            transport: None,
        }
    }

    /// Override the API base URL (e.g. for a sandbox deployment).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Replace the cache options.
    #[must_use]
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.config.cache = config;
        self.cache_enabled = true;
        self
    }

    /// Disable the durable cache entirely; every call hits the network.
    #[must_use]
    pub const fn no_cache(mut self) -> Self {
        self.cache_enabled = false;
        self
    }

    /// Replace the rate-limit back-off options.
    #[must_use]
    pub const fn backoff(mut self, config: BackoffConfig) -> Self {
        self.config.backoff = config;
        self.backoff_enabled = true;
        self
    }

    /// Disable 429 back-off; rate-limit responses surface immediately.
    #[must_use]
    pub const fn no_backoff(mut self) -> Self {
        self.backoff_enabled = false;
        self
    }

    /// Cap the number of `next` links followed per transaction listing.
    #[must_use]
    pub const fn max_pages(mut self, pages: u32) -> Self {
        self.config.max_pages = pages;
        self
    }

    /// Safety margin subtracted from the token lifetime.
    #[must_use]
    pub const fn token_expiry_margin(mut self, margin: Duration) -> Self {
        self.config.token_expiry_margin = margin;
        self
    }

    /// Use a caller-configured `reqwest::Client` (proxies, timeouts, TLS).
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Substitute the raw transport, primarily for scripted test transports.
    /// Takes precedence over [`http_client`](Self::http_client).
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Compose the transport stack and build the client.
    ///
    /// # Errors
    /// - [`ContoError::InvalidArg`] when either secret is empty.
    /// - [`ContoError::Cache`] when the cache database cannot be opened.
    pub fn build(self) -> Result<Conto, ContoError> {
        if self.secret_id.trim().is_empty() || self.secret_key.trim().is_empty() {
            return Err(ContoError::InvalidArg(
                "secret_id and secret_key must be non-empty".to_string(),
            ));
        }

        let raw: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => match self.http_client {
                Some(client) => Arc::new(ReqwestTransport::with_client(client)),
                None => Arc::new(ReqwestTransport::new()),
            },
        };

        let mut stack = TransportStackBuilder::new(raw.clone());
        if self.cache_enabled {
            stack = stack.with_cache(self.config.cache.clone());
        }
        if self.backoff_enabled {
            stack = stack.with_backoff(self.config.backoff);
        }
        let stack = stack.build()?;

        let tokens = TokenManager::new(
            raw.clone(),
            &self.config.base_url,
            self.secret_id.clone(),
            self.secret_key.clone(),
            self.config.token_expiry_margin,
        );
        let pipeline = RequestPipeline::new(stack.transport, tokens, self.config.base_url);

        Ok(Conto {
            pipeline,
            max_pages: self.config.max_pages,
            raw,
            cache: stack.cache,
            secret_id: self.secret_id,
            secret_key: self.secret_key,
        })
    }
}

impl Conto {
    /// Start building a client.
    #[must_use]
    pub fn builder(secret_id: impl Into<String>, secret_key: impl Into<String>) -> ContoBuilder {
        ContoBuilder::new(secret_id, secret_key)
    }

    /// Base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.pipeline.base_url()
    }

    /// Probe the cache for a would-be request without executing it.
    ///
    /// Returns `None` when the client was built without a cache. The current
    /// bearer token (if any) is attached the same way a real request would,
    /// so the probed key matches the executed one under `match_headers`.
    #[must_use]
    pub fn cache_status(
        &self,
        method: Method,
        path: &str,
        params: Vec<(String, String)>,
        body: Option<RequestBody>,
    ) -> Option<CacheStatus> {
        let cache = self.cache.as_ref()?;
        let url = if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url(), path)
        };
        let mut req = ApiRequest {
            method,
            url,
            params,
            body,
            bearer: None,
        };
        if let Some(cred) = self.pipeline.tokens().current() {
            req.bearer = Some(cred.access);
        }
        let status = cache.status(&req);
        debug!(
            endpoint = path,
            exists = status.exists,
            expired = ?status.is_expired,
            "cache status"
        );
        Some(status)
    }

    /// Obtain a fresh token pair from the API.
    ///
    /// Resource methods manage tokens automatically; this exists for callers
    /// that persist the refresh token themselves.
    ///
    /// # Errors
    /// Returns [`ContoError::Authentication`] when the secrets are rejected
    /// or the endpoint is unreachable.
    pub async fn obtain_token(&self) -> Result<TokenPair, ContoError> {
        let req = ApiRequest::post(
            format!("{}/token/new/", self.base_url()),
            RequestBody::Form(vec![
                ("secret_id".to_string(), self.secret_id.clone()),
                ("secret_key".to_string(), self.secret_key.clone()),
            ]),
        );
        let resp = self
            .raw
            .execute(&req)
            .await
            .map_err(|e| ContoError::authentication(e.to_string()))?;
        if !resp.is_success() {
            return Err(ContoError::authentication(format!(
                "token endpoint returned status {}: {}",
                resp.status,
                resp.text()
            )));
        }
        resp.json("/token/new/")
            .map_err(|e| ContoError::authentication(e.to_string()))
    }

    /// Exchange a refresh token for a fresh access token.
    ///
    /// # Errors
    /// Returns [`ContoError::Authentication`] when the refresh token is
    /// rejected or the endpoint is unreachable.
    pub async fn refresh_token(&self, refresh: &str) -> Result<TokenRefresh, ContoError> {
        let req = ApiRequest::post(
            format!("{}/token/refresh/", self.base_url()),
            RequestBody::Form(vec![("refresh".to_string(), refresh.to_string())]),
        );
        let resp = self
            .raw
            .execute(&req)
            .await
            .map_err(|e| ContoError::authentication(e.to_string()))?;
        if !resp.is_success() {
            return Err(ContoError::authentication(format!(
                "token refresh returned status {}: {}",
                resp.status,
                resp.text()
            )));
        }
        resp.json("/token/refresh/")
            .map_err(|e| ContoError::authentication(e.to_string()))
    }
}

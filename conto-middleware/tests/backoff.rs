use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use conto_core::{ApiRequest, HttpTransport, RawResponse};
use conto_middleware::{BackoffTransport, TransportStackBuilder};
use conto_types::{BackoffConfig, CacheConfig, ContoError};

struct Scripted {
    responses: Mutex<VecDeque<RawResponse>>,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(responses: Vec<RawResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for Scripted {
    async fn execute(&self, req: &ApiRequest) -> Result<RawResponse, ContoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ContoError::transport(req.url.clone(), "script exhausted"))
    }
}

fn status(code: u16) -> RawResponse {
    RawResponse {
        status: code,
        headers: Vec::new(),
        body: Vec::new(),
    }
}

fn rate_limited(retry_after: &str) -> RawResponse {
    RawResponse {
        status: 429,
        headers: vec![("Retry-After".to_string(), retry_after.to_string())],
        body: Vec::new(),
    }
}

fn config(max_retries: u32) -> BackoffConfig {
    BackoffConfig {
        max_retries,
        base_delay: Duration::from_secs(1),
    }
}

#[tokio::test(start_paused = true)]
async fn retries_until_success() {
    let inner = Scripted::new(vec![status(429), status(429), status(200)]);
    let transport = BackoffTransport::new(inner.clone(), config(3));

    let resp = transport.execute(&ApiRequest::get("u")).await.unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(inner.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn honors_numeric_retry_after() {
    let inner = Scripted::new(vec![rate_limited("5"), status(200)]);
    let transport = BackoffTransport::new(inner.clone(), config(3));

    let start = tokio::time::Instant::now();
    transport.execute(&ApiRequest::get("u")).await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn exponential_delay_without_header() {
    let inner = Scripted::new(vec![status(429), status(429), status(200)]);
    let transport = BackoffTransport::new(inner.clone(), config(3));

    let start = tokio::time::Instant::now();
    transport.execute(&ApiRequest::get("u")).await.unwrap();
    // 1s after the first 429, 2s after the second.
    assert_eq!(start.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn malformed_retry_after_falls_back_to_exponential() {
    let inner = Scripted::new(vec![rate_limited("soon"), status(200)]);
    let transport = BackoffTransport::new(inner.clone(), config(3));

    let start = tokio::time::Instant::now();
    transport.execute(&ApiRequest::get("u")).await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn unrepresentable_retry_after_falls_back_to_exponential() {
    // Parses as f64 but cannot become a Duration; must degrade like any
    // other malformed header instead of crashing.
    let inner = Scripted::new(vec![
        rate_limited("10000000000000000000000"),
        rate_limited("inf"),
        rate_limited("-3"),
        status(200),
    ]);
    let transport = BackoffTransport::new(inner.clone(), config(3));

    let start = tokio::time::Instant::now();
    let resp = transport.execute(&ApiRequest::get("u")).await.unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(start.elapsed(), Duration::from_secs(1 + 2 + 4));
}

#[tokio::test(start_paused = true)]
async fn composed_stack_honors_retry_after_through_the_cache() {
    // The cache sits between the back-off layer and the network; a 429 is
    // not cacheable and must reach the executor with its headers intact.
    let dir = tempfile::tempdir().unwrap();
    let inner = Scripted::new(vec![rate_limited("5"), status(200)]);
    let stack = TransportStackBuilder::new(inner.clone())
        .with_cache(CacheConfig {
            cache_dir: Some(dir.path().to_path_buf()),
            ..CacheConfig::default()
        })
        .with_backoff(config(3))
        .build()
        .unwrap();

    let start = tokio::time::Instant::now();
    let resp = stack
        .transport
        .execute(&ApiRequest::get("https://example.test/api/v2/accounts/acc-1/"))
        .await
        .unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(inner.calls(), 2);
    assert_eq!(start.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn exhaustion_returns_last_rate_limit_response() {
    let inner = Scripted::new(vec![status(429), status(429), status(429), status(429)]);
    let transport = BackoffTransport::new(inner.clone(), config(3));

    let resp = transport.execute(&ApiRequest::get("u")).await.unwrap();
    assert_eq!(resp.status, 429);
    // Initial attempt plus three retries.
    assert_eq!(inner.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn other_statuses_pass_through_untouched() {
    let inner = Scripted::new(vec![status(500)]);
    let transport = BackoffTransport::new(inner.clone(), config(3));

    let start = tokio::time::Instant::now();
    let resp = transport.execute(&ApiRequest::get("u")).await.unwrap();
    assert_eq!(resp.status, 500);
    assert_eq!(inner.calls(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn transport_failure_is_not_retried() {
    let inner = Scripted::new(vec![]);
    let transport = BackoffTransport::new(inner.clone(), config(3));

    let err = transport.execute(&ApiRequest::get("u")).await.unwrap_err();
    assert!(matches!(err, ContoError::Transport { .. }));
    assert_eq!(inner.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn zero_retries_returns_first_rate_limit() {
    let inner = Scripted::new(vec![status(429)]);
    let transport = BackoffTransport::new(inner.clone(), config(0));

    let resp = transport.execute(&ApiRequest::get("u")).await.unwrap();
    assert_eq!(resp.status, 429);
    assert_eq!(inner.calls(), 1);
}

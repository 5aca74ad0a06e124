use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use conto_core::{ApiRequest, HttpTransport, Method, RawResponse, RequestBody};
use conto_middleware::{CachingTransport, TransportStackBuilder};
use conto_types::{CacheConfig, ContoError};

struct Scripted {
    responses: Mutex<VecDeque<Result<RawResponse, ContoError>>>,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(responses: Vec<Result<RawResponse, ContoError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        })
    }

    /// Serves the same response forever.
    fn repeating(resp: RawResponse) -> Arc<Self> {
        let this = Self::new(Vec::new());
        *this.responses.lock().unwrap() = VecDeque::from(vec![Ok(resp)]);
        this
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for Scripted {
    async fn execute(&self, req: &ApiRequest) -> Result<RawResponse, ContoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock().unwrap();
        if responses.len() == 1 {
            return responses.front().cloned().unwrap();
        }
        responses
            .pop_front()
            .unwrap_or_else(|| Err(ContoError::transport(req.url.clone(), "script exhausted")))
    }
}

fn ok_json(body: serde_json::Value) -> RawResponse {
    RawResponse {
        status: 200,
        headers: vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("X-Request-Id".to_string(), "abc-123".to_string()),
            ("Set-Cookie".to_string(), "session=s3cret".to_string()),
        ],
        body: serde_json::to_vec(&body).unwrap(),
    }
}

fn config(dir: &tempfile::TempDir) -> CacheConfig {
    CacheConfig {
        cache_dir: Some(dir.path().to_path_buf()),
        ..CacheConfig::default()
    }
}

fn cache(inner: Arc<Scripted>, config: CacheConfig) -> CachingTransport {
    CachingTransport::new(inner, config).unwrap()
}

#[tokio::test]
async fn repeated_get_hits_cache() {
    let dir = tempfile::tempdir().unwrap();
    let inner = Scripted::repeating(ok_json(json!({"id": "acc-1"})));
    let transport = cache(inner.clone(), config(&dir));

    let req = ApiRequest::get("https://example.test/api/v2/accounts/acc-1/");
    let first = transport.execute(&req).await.unwrap();
    let second = transport.execute(&req).await.unwrap();

    assert_eq!(inner.calls(), 1);
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn cache_survives_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let req = ApiRequest::get("https://example.test/api/v2/accounts/acc-1/");

    let inner = Scripted::repeating(ok_json(json!({"id": "acc-1"})));
    let transport = cache(inner.clone(), config(&dir));
    transport.execute(&req).await.unwrap();
    drop(transport);

    // A fresh instance over the same store should not touch the network.
    let cold = Scripted::new(Vec::new());
    let transport = cache(cold.clone(), config(&dir));
    let resp = transport.execute(&req).await.unwrap();

    assert_eq!(cold.calls(), 0);
    assert_eq!(resp.status, 200);
}

#[tokio::test]
async fn key_ignores_param_order() {
    let dir = tempfile::tempdir().unwrap();
    let inner = Scripted::repeating(ok_json(json!({})));
    let transport = cache(inner.clone(), config(&dir));

    let url = "https://example.test/api/v2/accounts/acc-1/transactions/";
    let a = ApiRequest::get(url).with_params(vec![
        ("date_from".to_string(), "2024-01-01".to_string()),
        ("date_to".to_string(), "2024-02-01".to_string()),
    ]);
    let b = ApiRequest::get(url).with_params(vec![
        ("date_to".to_string(), "2024-02-01".to_string()),
        ("date_from".to_string(), "2024-01-01".to_string()),
    ]);

    transport.execute(&a).await.unwrap();
    transport.execute(&b).await.unwrap();
    assert_eq!(inner.calls(), 1);
    assert_eq!(transport.cache_key(&a), transport.cache_key(&b));
}

#[tokio::test]
async fn different_params_miss() {
    let dir = tempfile::tempdir().unwrap();
    let inner = Scripted::repeating(ok_json(json!({})));
    let transport = cache(inner.clone(), config(&dir));

    let url = "https://example.test/api/v2/accounts/acc-1/transactions/";
    let a = ApiRequest::get(url)
        .with_params(vec![("date_from".to_string(), "2024-01-01".to_string())]);
    let b = ApiRequest::get(url)
        .with_params(vec![("date_from".to_string(), "2024-03-01".to_string())]);

    transport.execute(&a).await.unwrap();
    transport.execute(&b).await.unwrap();
    assert_eq!(inner.calls(), 2);
}

#[tokio::test]
async fn bearer_rotation_does_not_invalidate_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let inner = Scripted::repeating(ok_json(json!({})));
    let transport = cache(inner.clone(), config(&dir));

    let url = "https://example.test/api/v2/accounts/acc-1/";
    transport
        .execute(&ApiRequest::get(url).with_bearer("token-0"))
        .await
        .unwrap();
    transport
        .execute(&ApiRequest::get(url).with_bearer("token-1"))
        .await
        .unwrap();
    assert_eq!(inner.calls(), 1);
}

#[tokio::test]
async fn match_headers_keys_on_bearer() {
    let dir = tempfile::tempdir().unwrap();
    let inner = Scripted::repeating(ok_json(json!({})));
    let transport = cache(
        inner.clone(),
        CacheConfig {
            match_headers: true,
            ..config(&dir)
        },
    );

    let url = "https://example.test/api/v2/accounts/acc-1/";
    transport
        .execute(&ApiRequest::get(url).with_bearer("token-0"))
        .await
        .unwrap();
    transport
        .execute(&ApiRequest::get(url).with_bearer("token-1"))
        .await
        .unwrap();
    assert_eq!(inner.calls(), 2);
}

#[tokio::test]
async fn volatile_headers_are_stripped() {
    let dir = tempfile::tempdir().unwrap();
    let inner = Scripted::repeating(ok_json(json!({})));
    let transport = cache(inner.clone(), config(&dir));

    let req = ApiRequest::get("https://example.test/api/v2/accounts/acc-1/");
    let fresh = transport.execute(&req).await.unwrap();
    assert_eq!(fresh.header("Content-Type"), Some("application/json"));
    assert_eq!(fresh.header("X-Request-Id"), None);
    assert_eq!(fresh.header("Set-Cookie"), None);

    // The stored copy was stripped too.
    let cached = transport.execute(&req).await.unwrap();
    assert_eq!(cached.header("Content-Type"), Some("application/json"));
    assert_eq!(cached.header("X-Request-Id"), None);
}

#[tokio::test]
async fn only_get_is_cached() {
    let dir = tempfile::tempdir().unwrap();
    let inner = Scripted::repeating(ok_json(json!({"id": "req-1"})));
    let transport = cache(inner.clone(), config(&dir));

    let req = ApiRequest::post(
        "https://example.test/api/v2/requisitions/",
        RequestBody::Json(json!({"institution_id": "BANK_X"})),
    );
    transport.execute(&req).await.unwrap();
    transport.execute(&req).await.unwrap();
    assert_eq!(inner.calls(), 2);
}

#[tokio::test]
async fn error_responses_are_not_stored() {
    let dir = tempfile::tempdir().unwrap();
    let inner = Scripted::new(vec![
        Ok(RawResponse {
            status: 404,
            headers: Vec::new(),
            body: Vec::new(),
        }),
        Ok(ok_json(json!({"id": "acc-1"}))),
    ]);
    let transport = cache(inner.clone(), config(&dir));

    let req = ApiRequest::get("https://example.test/api/v2/accounts/acc-1/");
    assert_eq!(transport.execute(&req).await.unwrap().status, 404);
    assert_eq!(transport.execute(&req).await.unwrap().status, 200);
    assert_eq!(inner.calls(), 2);
}

#[tokio::test]
async fn stale_entry_served_when_refetch_fails() {
    let dir = tempfile::tempdir().unwrap();
    let inner = Scripted::new(vec![
        Ok(ok_json(json!({"id": "acc-1"}))),
        Err(ContoError::transport("u", "connection refused")),
    ]);
    let transport = cache(
        inner.clone(),
        CacheConfig {
            // Entries expire immediately, forcing a refetch on every call.
            expire_after: Duration::from_nanos(1),
            ..config(&dir)
        },
    );

    let req = ApiRequest::get("https://example.test/api/v2/accounts/acc-1/");
    let first = transport.execute(&req).await.unwrap();
    let second = transport.execute(&req).await.unwrap();
    assert_eq!(first.body, second.body);
    assert_eq!(inner.calls(), 2);
}

#[tokio::test]
async fn stale_entry_served_on_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let inner = Scripted::new(vec![
        Ok(ok_json(json!({"id": "acc-1"}))),
        Ok(RawResponse {
            status: 503,
            headers: Vec::new(),
            body: Vec::new(),
        }),
    ]);
    let transport = cache(
        inner.clone(),
        CacheConfig {
            expire_after: Duration::from_nanos(1),
            ..config(&dir)
        },
    );

    let req = ApiRequest::get("https://example.test/api/v2/accounts/acc-1/");
    transport.execute(&req).await.unwrap();
    let second = transport.execute(&req).await.unwrap();
    assert_eq!(second.status, 200);
}

#[tokio::test]
async fn stale_serving_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let inner = Scripted::new(vec![
        Ok(ok_json(json!({"id": "acc-1"}))),
        Err(ContoError::transport("u", "connection refused")),
    ]);
    let transport = cache(
        inner.clone(),
        CacheConfig {
            expire_after: Duration::from_nanos(1),
            stale_if_error: false,
            ..config(&dir)
        },
    );

    let req = ApiRequest::get("https://example.test/api/v2/accounts/acc-1/");
    transport.execute(&req).await.unwrap();
    let err = transport.execute(&req).await.unwrap_err();
    assert!(matches!(err, ContoError::Transport { .. }));
}

#[tokio::test]
async fn status_reports_presence_and_expiry() {
    let dir = tempfile::tempdir().unwrap();
    let inner = Scripted::repeating(ok_json(json!({})));
    let transport = cache(inner.clone(), config(&dir));

    let req = ApiRequest::get("https://example.test/api/v2/accounts/acc-1/");
    let before = transport.status(&req);
    assert!(!before.exists);
    assert_eq!(before.is_expired, None);

    transport.execute(&req).await.unwrap();
    let after = transport.status(&req);
    assert!(after.exists);
    assert_eq!(after.is_expired, Some(false));
    assert_eq!(before.key, after.key);
}

#[tokio::test]
async fn clear_empties_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let inner = Scripted::repeating(ok_json(json!({})));
    let transport = cache(inner.clone(), config(&dir));

    let req = ApiRequest::get("https://example.test/api/v2/accounts/acc-1/");
    transport.execute(&req).await.unwrap();
    transport.clear().unwrap();
    assert!(!transport.status(&req).exists);

    transport.execute(&req).await.unwrap();
    assert_eq!(inner.calls(), 2);
}

#[tokio::test]
async fn builder_layers_cache_and_exposes_handle() {
    let dir = tempfile::tempdir().unwrap();
    let inner = Scripted::repeating(ok_json(json!({})));
    let stack = TransportStackBuilder::new(inner.clone())
        .with_cache(config(&dir))
        .with_backoff(conto_types::BackoffConfig::default())
        .build()
        .unwrap();

    let req = ApiRequest::get("https://example.test/api/v2/accounts/acc-1/");
    stack.transport.execute(&req).await.unwrap();
    stack.transport.execute(&req).await.unwrap();
    assert_eq!(inner.calls(), 1);

    let cache = stack.cache.as_ref().unwrap();
    assert!(cache.status(&req).exists);
    assert_eq!(req.method, Method::Get);
}

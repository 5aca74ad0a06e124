use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use conto_core::{ApiRequest, HttpTransport, RawResponse, RequestBody, TokenManager};
use conto_types::ContoError;

/// Serves a token payload and counts how many times it was asked.
struct TokenServer {
    calls: AtomicUsize,
    status: u16,
    access_expires: u64,
}

impl TokenServer {
    fn ok(access_expires: u64) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            status: 200,
            access_expires,
        }
    }

    fn failing(status: u16) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            status,
            access_expires: 0,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for TokenServer {
    async fn execute(&self, req: &ApiRequest) -> Result<RawResponse, ContoError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(req.url.ends_with("/token/new/"));
        assert!(matches!(req.body, Some(RequestBody::Form(_))));
        let body = if self.status == 200 {
            json!({
                "access": format!("token-{n}"),
                "access_expires": self.access_expires,
                "refresh": "refresh-token",
                "refresh_expires": 2_592_000,
            })
        } else {
            json!({"summary": "Authentication failed"})
        };
        Ok(RawResponse {
            status: self.status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: serde_json::to_vec(&body).unwrap(),
        })
    }
}

#[tokio::test]
async fn second_call_within_window_reuses_credential() {
    let server = Arc::new(TokenServer::ok(86_400));
    let mgr = TokenManager::new(
        server.clone(),
        "https://example.test/api/v2",
        "id",
        "key",
        Duration::from_secs(30),
    );

    let first = mgr.ensure_valid().await.unwrap();
    let second = mgr.ensure_valid().await.unwrap();

    assert_eq!(first.access, "token-0");
    assert_eq!(second.access, "token-0");
    assert_eq!(server.calls(), 1);
}

#[tokio::test]
async fn expired_credential_triggers_one_refresh() {
    // Lifetime below the margin, so the credential is born expired.
    let server = Arc::new(TokenServer::ok(10));
    let mgr = TokenManager::new(
        server.clone(),
        "https://example.test/api/v2",
        "id",
        "key",
        Duration::from_secs(30),
    );

    let first = mgr.ensure_valid().await.unwrap();
    let second = mgr.ensure_valid().await.unwrap();

    assert_eq!(first.access, "token-0");
    assert_eq!(second.access, "token-1");
    assert_eq!(server.calls(), 2);
}

#[tokio::test]
async fn rejected_secrets_surface_as_authentication_error() {
    let server = Arc::new(TokenServer::failing(401));
    let mgr = TokenManager::new(
        server.clone(),
        "https://example.test/api/v2",
        "id",
        "bad-key",
        Duration::from_secs(30),
    );

    let err = mgr.ensure_valid().await.unwrap_err();
    assert!(matches!(err, ContoError::Authentication { .. }));
    assert!(err.to_string().contains("401"));
    // A failed acquisition leaves the slot empty.
    assert!(mgr.current().is_none());
}

#[tokio::test]
async fn current_does_not_refresh() {
    let server = Arc::new(TokenServer::ok(86_400));
    let mgr = TokenManager::new(
        server.clone(),
        "https://example.test/api/v2",
        "id",
        "key",
        Duration::from_secs(30),
    );

    assert!(mgr.current().is_none());
    assert_eq!(server.calls(), 0);

    mgr.ensure_valid().await.unwrap();
    let snap = mgr.current().unwrap();
    assert_eq!(snap.access, "token-0");
    assert_eq!(server.calls(), 1);
}

//! Durable response cache over a SQLite store.
//!
//! Only successful GET responses are stored; POST/DELETE and token calls pass
//! straight through. Responses that enter the store have their headers
//! stripped to a small allow-list, so volatile headers never leak into the
//! store or influence a key. Responses that are not cacheable (non-GET,
//! non-2xx) pass through untouched: the outer back-off layer still needs
//! headers like `Retry-After` on them.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use conto_core::{ApiRequest, HttpTransport, Method, RawResponse};
use conto_types::{CacheConfig, ContoError};

/// Headers preserved on responses; everything else is dropped.
const HEADER_ALLOW_LIST: &[&str] = &[
    "Content-Type",
    "Date",
    "Content-Encoding",
    "Content-Language",
    "Last-Modified",
    "Location",
];

/// Headers additionally preserved when `respect_cache_control` is set.
const CACHE_CONTROL_HEADERS: &[&str] = &["Cache-Control", "ETag"];

/// Diagnostic snapshot of one request's cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatus {
    /// Whether an entry exists for the request.
    pub exists: bool,
    /// Whether the entry has expired; `None` when no entry exists or the
    /// entry could not be read.
    pub is_expired: Option<bool>,
    /// The deterministic cache key the request hashes to.
    pub key: String,
}

struct StoredResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    created_at: i64,
}

/// Transport wrapper that persists successful GET responses in SQLite.
pub struct CachingTransport {
    inner: Arc<dyn HttpTransport>,
    config: CacheConfig,
    db: Mutex<Connection>,
}

impl CachingTransport {
    /// Open (or create) the cache database and wrap `inner`.
    ///
    /// The store lives at `{cache_dir}/{cache_name}.sqlite`, defaulting the
    /// directory to the current directory.
    ///
    /// # Errors
    /// Returns [`ContoError::Cache`] when the database cannot be opened or
    /// its schema cannot be created.
    pub fn new(inner: Arc<dyn HttpTransport>, config: CacheConfig) -> Result<Self, ContoError> {
        let dir: PathBuf = config
            .cache_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&dir)
            .map_err(|e| ContoError::Cache(format!("creating cache dir: {e}")))?;
        let path = dir.join(format!("{}.sqlite", config.cache_name));
        debug!(path = %path.display(), "opening response cache");

        let db = Connection::open(&path).map_err(|e| ContoError::Cache(e.to_string()))?;
        db.execute_batch(
            "CREATE TABLE IF NOT EXISTS responses (
                key        TEXT PRIMARY KEY,
                status     INTEGER NOT NULL,
                headers    TEXT NOT NULL,
                body       BLOB NOT NULL,
                created_at INTEGER NOT NULL
            );",
        )
        .map_err(|e| ContoError::Cache(e.to_string()))?;

        Ok(Self {
            inner,
            config,
            db: Mutex::new(db),
        })
    }

    /// Deterministic key for a request: SHA-256 over the method, URL, sorted
    /// query parameters, and body. The bearer token participates only when
    /// `match_headers` is set, so token rotation does not invalidate entries
    /// by default.
    #[must_use]
    pub fn cache_key(&self, req: &ApiRequest) -> String {
        let mut hasher = Sha256::new();
        hasher.update(req.method.as_str().as_bytes());
        hasher.update(b"\n");
        hasher.update(req.url.as_bytes());
        hasher.update(b"\n");

        let mut params = req.params.clone();
        params.sort();
        for (k, v) in &params {
            hasher.update(k.as_bytes());
            hasher.update(b"=");
            hasher.update(v.as_bytes());
            hasher.update(b"&");
        }
        hasher.update(b"\n");

        match &req.body {
            Some(conto_core::RequestBody::Json(value)) => {
                hasher.update(value.to_string().as_bytes());
            }
            Some(conto_core::RequestBody::Form(fields)) => {
                for (k, v) in fields {
                    hasher.update(k.as_bytes());
                    hasher.update(b"=");
                    hasher.update(v.as_bytes());
                    hasher.update(b"&");
                }
            }
            None => {}
        }
        hasher.update(b"\n");

        if self.config.match_headers
            && let Some(token) = &req.bearer
        {
            hasher.update(token.as_bytes());
        }

        format!("{:x}", hasher.finalize())
    }

    /// Report whether an entry exists for `req` and whether it has expired.
    ///
    /// Never errors: a read failure degrades `is_expired` to `None`.
    ///
    /// # Panics
    /// Panics if the database mutex is poisoned.
    #[must_use]
    pub fn status(&self, req: &ApiRequest) -> CacheStatus {
        let key = self.cache_key(req);
        match self.load(&key) {
            Ok(Some(entry)) => CacheStatus {
                exists: true,
                is_expired: Some(self.is_entry_expired(&entry)),
                key,
            },
            Ok(None) => CacheStatus {
                exists: false,
                is_expired: None,
                key,
            },
            Err(e) => {
                warn!(error = %e, "cache status read failed");
                let exists = self.contains(&key);
                CacheStatus {
                    exists,
                    is_expired: None,
                    key,
                }
            }
        }
    }

    /// Drop every stored entry.
    ///
    /// # Errors
    /// Returns [`ContoError::Cache`] when the delete fails.
    ///
    /// # Panics
    /// Panics if the database mutex is poisoned.
    pub fn clear(&self) -> Result<(), ContoError> {
        self.db
            .lock()
            .expect("cache mutex poisoned")
            .execute("DELETE FROM responses", [])
            .map_err(|e| ContoError::Cache(e.to_string()))?;
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        self.db
            .lock()
            .expect("cache mutex poisoned")
            .query_row(
                "SELECT 1 FROM responses WHERE key = ?1",
                params![key],
                |_| Ok(()),
            )
            .optional()
            .map(|row| row.is_some())
            .unwrap_or(false)
    }

    fn load(&self, key: &str) -> Result<Option<StoredResponse>, ContoError> {
        self.db
            .lock()
            .expect("cache mutex poisoned")
            .query_row(
                "SELECT status, headers, body, created_at FROM responses WHERE key = ?1",
                params![key],
                |row| {
                    Ok((
                        row.get::<_, u16>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Vec<u8>>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| ContoError::Cache(e.to_string()))?
            .map(|(status, headers, body, created_at)| {
                let headers: Vec<(String, String)> = serde_json::from_str(&headers)
                    .map_err(|e| ContoError::Cache(format!("corrupt header record: {e}")))?;
                Ok(StoredResponse {
                    status,
                    headers,
                    body,
                    created_at,
                })
            })
            .transpose()
    }

    fn store(&self, key: &str, resp: &RawResponse) -> Result<(), ContoError> {
        let headers = serde_json::to_string(&resp.headers)
            .map_err(|e| ContoError::Cache(e.to_string()))?;
        self.db
            .lock()
            .expect("cache mutex poisoned")
            .execute(
                "INSERT OR REPLACE INTO responses (key, status, headers, body, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![key, resp.status, headers, resp.body, now_unix()],
            )
            .map_err(|e| ContoError::Cache(e.to_string()))?;
        Ok(())
    }

    fn is_entry_expired(&self, entry: &StoredResponse) -> bool {
        let ttl = self.config.expire_after;
        if ttl.is_zero() {
            return false;
        }
        let age = now_unix().saturating_sub(entry.created_at);
        age >= i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)
    }

    fn strip_headers(&self, mut resp: RawResponse) -> RawResponse {
        resp.headers.retain(|(name, _)| {
            HEADER_ALLOW_LIST
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(name))
                || (self.config.respect_cache_control
                    && CACHE_CONTROL_HEADERS
                        .iter()
                        .any(|allowed| allowed.eq_ignore_ascii_case(name)))
        });
        resp
    }

    fn to_response(entry: &StoredResponse) -> RawResponse {
        RawResponse {
            status: entry.status,
            headers: entry.headers.clone(),
            body: entry.body.clone(),
        }
    }
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[async_trait]
impl HttpTransport for CachingTransport {
    async fn execute(&self, req: &ApiRequest) -> Result<RawResponse, ContoError> {
        if req.method != Method::Get {
            return self.inner.execute(req).await;
        }

        let key = self.cache_key(req);
        let entry = match self.load(&key) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "cache read failed, fetching from network");
                None
            }
        };

        if let Some(stored) = &entry
            && !self.is_entry_expired(stored)
        {
            debug!(url = %req.url, "cache hit");
            return Ok(Self::to_response(stored));
        }

        match self.inner.execute(req).await {
            Ok(resp) if resp.is_success() => {
                let resp = self.strip_headers(resp);
                if let Err(e) = self.store(&key, &resp) {
                    warn!(error = %e, "cache write failed");
                }
                Ok(resp)
            }
            Ok(resp) if resp.status >= 500 && self.config.stale_if_error => match entry {
                Some(stored) => {
                    warn!(url = %req.url, status = resp.status, "refetch failed, serving stale entry");
                    Ok(Self::to_response(&stored))
                }
                None => Ok(resp),
            },
            Ok(resp) => Ok(resp),
            Err(e) if self.config.stale_if_error => match entry {
                Some(stored) => {
                    warn!(url = %req.url, error = %e, "refetch failed, serving stale entry");
                    Ok(Self::to_response(&stored))
                }
                None => Err(e),
            },
            Err(e) => Err(e),
        }
    }
}

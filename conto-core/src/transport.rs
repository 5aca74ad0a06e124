use async_trait::async_trait;
use serde::de::DeserializeOwned;

use conto_types::ContoError;

/// HTTP methods the API surface uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Resource retrieval; the only method the cache layer stores.
    Get,
    /// Resource creation and token calls.
    Post,
    /// Requisition deletion.
    Delete,
}

impl Method {
    /// Wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

/// Request body encodings the API accepts.
///
/// Token acquisition is form-encoded; every other write is JSON.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// JSON-encoded body.
    Json(serde_json::Value),
    /// Form-encoded key/value pairs.
    Form(Vec<(String, String)>),
}

/// A normalized request handed to the transport stack.
///
/// The cache key is a deterministic function of these fields, so anything
/// that varies between logically-identical calls (notably the bearer header,
/// unless header matching is enabled) lives in its own slot rather than a
/// free-form header map.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL. Followed pagination links may carry their own query
    /// string here, in which case `params` stays empty.
    pub url: String,
    /// Query parameters, appended to the URL by the transport.
    pub params: Vec<(String, String)>,
    /// Optional request body.
    pub body: Option<RequestBody>,
    /// Bearer token attached by the pipeline; absent for token acquisition.
    pub bearer: Option<String>,
}

impl ApiRequest {
    /// Build a GET request for a URL.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            params: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    /// Build a POST request with a body.
    #[must_use]
    pub fn post(url: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            params: Vec::new(),
            body: Some(body),
            bearer: None,
        }
    }

    /// Build a DELETE request for a URL.
    #[must_use]
    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            url: url.into(),
            params: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    /// Attach query parameters.
    #[must_use]
    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    /// Attach a bearer token.
    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// A raw HTTP response as seen by the pipeline.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers. The cache layer strips these down to an allow-list
    /// before the response leaves the transport stack.
    pub headers: Vec<(String, String)>,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// True for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Case-insensitive header lookup; returns the first match.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Lossily decode the body as text, for logs and error context.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body into a typed model.
    ///
    /// # Errors
    /// Returns [`ContoError::Decode`] tagged with `endpoint` when the body
    /// does not match the expected shape.
    pub fn json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ContoError> {
        serde_json::from_slice(&self.body).map_err(|e| ContoError::decode(endpoint, e.to_string()))
    }
}

/// The transport seam: everything between the pipeline and the wire.
///
/// The production implementation is [`ReqwestTransport`]; the middleware
/// crate wraps any transport with caching and rate-limit back-off, and tests
/// substitute scripted implementations.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute one request and return the raw response.
    ///
    /// Implementations return `Err` only for failures that produced no HTTP
    /// response at all; every received status, including 4xx/5xx, comes back
    /// as an `Ok(RawResponse)` for the layers above to interpret.
    async fn execute(&self, req: &ApiRequest) -> Result<RawResponse, ContoError>;
}

/// Production transport backed by `reqwest::Client`.
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    /// Build with a fresh `reqwest::Client` using its default timeouts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Build from a caller-supplied `reqwest::Client` (custom proxies,
    /// timeouts, TLS settings).
    #[must_use]
    pub const fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, req: &ApiRequest) -> Result<RawResponse, ContoError> {
        let mut builder = match req.method {
            Method::Get => self.http.get(&req.url),
            Method::Post => self.http.post(&req.url),
            Method::Delete => self.http.delete(&req.url),
        };
        if !req.params.is_empty() {
            builder = builder.query(&req.params);
        }
        match &req.body {
            Some(RequestBody::Json(value)) => builder = builder.json(value),
            Some(RequestBody::Form(fields)) => builder = builder.form(fields),
            None => {}
        }
        if let Some(token) = &req.bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ContoError::transport(req.url.clone(), e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| ContoError::transport(req.url.clone(), e.to_string()))?
            .to_vec();

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

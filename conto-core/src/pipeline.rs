use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use conto_types::ContoError;

use crate::token::TokenManager;
use crate::transport::{ApiRequest, HttpTransport, Method, RawResponse, RequestBody};

/// Composes the token manager with the wrapped transport stack.
///
/// Every resource call flows through here: obtain a valid credential, attach
/// it as the bearer header, execute through the (cache- and back-off-wrapped)
/// transport, refresh-and-retry exactly once on 401, and convert any
/// remaining non-2xx status into [`ContoError::Http`].
pub struct RequestPipeline {
    transport: Arc<dyn HttpTransport>,
    tokens: TokenManager,
    base_url: String,
}

impl RequestPipeline {
    /// Build a pipeline over a transport stack and a token manager.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, tokens: TokenManager, base_url: String) -> Self {
        Self {
            transport,
            tokens,
            base_url,
        }
    }

    /// Base URL resource paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Access the token manager (diagnostics and the cache-status probe).
    #[must_use]
    pub const fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Execute an authenticated request against a resource path.
    ///
    /// `path` is normally relative to the base URL; followed pagination
    /// links may pass an absolute URL, which is used as-is.
    ///
    /// # Errors
    /// - [`ContoError::Authentication`] when no credential can be acquired.
    /// - [`ContoError::Http`] for any non-2xx status after the single
    ///   401-triggered refresh-and-retry.
    /// - [`ContoError::Transport`] when no response was received.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        params: Vec<(String, String)>,
        body: Option<RequestBody>,
    ) -> Result<RawResponse, ContoError> {
        let url = if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        };

        let cred = self.tokens.ensure_valid().await?;
        let mut req = ApiRequest {
            method,
            url,
            params,
            body,
            bearer: Some(cred.access),
        };
        let mut resp = self.transport.execute(&req).await?;

        // One forced refresh on 401; a second 401 falls through to the
        // status check below.
        if resp.status == 401 {
            debug!(endpoint = path, "401 response, refreshing token and retrying once");
            let cred = self.tokens.force_refresh().await?;
            req.bearer = Some(cred.access);
            resp = self.transport.execute(&req).await?;
        }

        if !resp.is_success() {
            return Err(ContoError::http(resp.status, path, resp.text()));
        }
        Ok(resp)
    }

    /// GET a resource and deserialize the JSON body.
    ///
    /// # Errors
    /// Propagates [`execute`](Self::execute) failures, plus
    /// [`ContoError::Decode`] on an unexpected body shape.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(String, String)>,
    ) -> Result<T, ContoError> {
        self.execute(Method::Get, path, params, None)
            .await?
            .json(path)
    }

    /// POST a JSON body and deserialize the JSON response.
    ///
    /// # Errors
    /// Same as [`get_json`](Self::get_json).
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, ContoError> {
        self.execute(Method::Post, path, Vec::new(), Some(RequestBody::Json(body)))
            .await?
            .json(path)
    }

    /// DELETE a resource and deserialize the JSON response.
    ///
    /// # Errors
    /// Same as [`get_json`](Self::get_json).
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ContoError> {
        self.execute(Method::Delete, path, Vec::new(), None)
            .await?
            .json(path)
    }
}

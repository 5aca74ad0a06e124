use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use conto_types::ContoError;

use crate::models::TokenPair;
use crate::transport::{ApiRequest, HttpTransport, RequestBody};

/// An immutable bearer credential snapshot.
///
/// The token and its expiry always travel together, so a reader can never
/// observe a token paired with a stale expiry.
#[derive(Debug, Clone)]
pub struct Credential {
    /// The bearer access token.
    pub access: String,
    /// Instant after which the token must not be presented. Already includes
    /// the configured safety margin.
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    /// True once `now` has reached the (margin-adjusted) expiry.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Owns the single in-memory credential slot and its refresh cycle.
///
/// Talks to the raw transport directly: token calls are never cached and
/// never rate-limit retried, matching the upstream client's behavior of
/// bypassing the cached session for token acquisition.
pub struct TokenManager {
    transport: Arc<dyn HttpTransport>,
    token_url: String,
    secret_id: String,
    secret_key: String,
    expiry_margin: Duration,
    slot: Mutex<Option<Credential>>,
}

impl TokenManager {
    /// Create a manager for the given secret pair.
    ///
    /// `expiry_margin` is subtracted from the server-provided lifetime to
    /// tolerate clock skew and in-flight request latency.
    #[must_use]
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: &str,
        secret_id: impl Into<String>,
        secret_key: impl Into<String>,
        expiry_margin: Duration,
    ) -> Self {
        Self {
            transport,
            token_url: format!("{base_url}/token/new/"),
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
            expiry_margin,
            slot: Mutex::new(None),
        }
    }

    /// Snapshot of the current credential, without triggering a refresh.
    ///
    /// # Panics
    /// Panics if the credential mutex is poisoned.
    #[must_use]
    pub fn current(&self) -> Option<Credential> {
        self.slot.lock().expect("credential mutex poisoned").clone()
    }

    /// Return a valid credential, acquiring or refreshing one if needed.
    ///
    /// Within the validity window this performs no network call; past the
    /// window it performs exactly one acquisition call.
    ///
    /// # Errors
    /// Returns [`ContoError::Authentication`] when acquisition fails.
    pub async fn ensure_valid(&self) -> Result<Credential, ContoError> {
        if let Some(cred) = self.current()
            && !cred.is_expired(Utc::now())
        {
            return Ok(cred);
        }
        self.force_refresh().await
    }

    /// Unconditionally acquire a fresh credential and replace the slot.
    ///
    /// The network call happens outside the slot lock; concurrent callers
    /// may refresh redundantly, but each swap installs a complete snapshot.
    ///
    /// # Errors
    /// Returns [`ContoError::Authentication`] on any non-2xx status, on a
    /// transport failure, or on an undecodable token payload.
    ///
    /// # Panics
    /// Panics if the credential mutex is poisoned.
    pub async fn force_refresh(&self) -> Result<Credential, ContoError> {
        debug!("fetching new access token");
        let req = ApiRequest::post(
            self.token_url.clone(),
            RequestBody::Form(vec![
                ("secret_id".to_string(), self.secret_id.clone()),
                ("secret_key".to_string(), self.secret_key.clone()),
            ]),
        );
        let resp = self
            .transport
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

        let pair: TokenPair = resp
            .json("/token/new/")
            .map_err(|e| ContoError::authentication(e.to_string()))?;

        let margin = i64::try_from(self.expiry_margin.as_secs()).unwrap_or(i64::MAX);
        let lifetime = i64::try_from(pair.access_expires).unwrap_or(i64::MAX);
        let cred = Credential {
            access: pair.access,
            expires_at: Utc::now() + chrono::Duration::seconds(lifetime.saturating_sub(margin)),
        };
        debug!(expires_at = %cred.expires_at, "access token obtained");

        *self.slot.lock().expect("credential mutex poisoned") = Some(cred.clone());
        Ok(cred)
    }
}

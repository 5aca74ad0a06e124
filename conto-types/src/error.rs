use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the conto workspace.
///
/// This wraps token acquisition failures, HTTP status failures that survived
/// the retry layers, transport-level failures, decode problems, cache store
/// faults, and argument validation errors.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContoError {
    /// Token acquisition against the token endpoint failed. Never retried
    /// internally; surfaced immediately.
    #[error("token acquisition failed: {detail}")]
    Authentication {
        /// Human-readable description (HTTP status and body, or the
        /// underlying transport failure).
        detail: String,
    },

    /// A non-2xx status remained after the 401-once and 429-bounded retries.
    #[error("{endpoint} returned status {status}: {body}")]
    Http {
        /// HTTP status code of the final response.
        status: u16,
        /// Endpoint path (or full URL for followed pagination links).
        endpoint: String,
        /// Raw response body, lossily decoded for context.
        body: String,
    },

    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("transport failure for {endpoint}: {msg}")]
    Transport {
        /// Endpoint path or URL that was being requested.
        endpoint: String,
        /// Underlying transport error message.
        msg: String,
    },

    /// A response body could not be decoded into the expected model.
    #[error("failed to decode {endpoint} response: {msg}")]
    Decode {
        /// Endpoint path whose body failed to decode.
        endpoint: String,
        /// Deserializer error message.
        msg: String,
    },

    /// The durable response store could not be opened or written.
    ///
    /// Read errors never surface as this variant; they degrade to cache
    /// misses or an "expiration unknown" status instead.
    #[error("cache error: {0}")]
    Cache(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),
}

impl ContoError {
    /// Helper: build an `Authentication` error from a detail message.
    pub fn authentication(detail: impl Into<String>) -> Self {
        Self::Authentication {
            detail: detail.into(),
        }
    }

    /// Helper: build an `Http` error carrying status, endpoint, and body.
    pub fn http(status: u16, endpoint: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            endpoint: endpoint.into(),
            body: body.into(),
        }
    }

    /// Helper: build a `Transport` error for an endpoint.
    pub fn transport(endpoint: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Decode` error for an endpoint.
    pub fn decode(endpoint: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            msg: msg.into(),
        }
    }

    /// Returns true if this is a 429 that survived the bounded back-off.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Http { status: 429, .. })
    }

    /// Returns true for network-class failures a caller may reasonably
    /// skip-and-continue over (per-account aggregation does this).
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Transport { .. })
    }
}

use serde::{Deserialize, Serialize};

/// Payload returned by `POST /token/new/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Bearer access token.
    pub access: String,
    /// Access token lifetime in seconds.
    pub access_expires: u64,
    /// Refresh token.
    pub refresh: String,
    /// Refresh token lifetime in seconds.
    pub refresh_expires: u64,
}

/// Payload returned by `POST /token/refresh/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRefresh {
    /// Fresh bearer access token.
    pub access: String,
    /// Access token lifetime in seconds.
    pub access_expires: u64,
}

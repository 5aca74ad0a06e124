use serde::{Deserialize, Serialize};

/// An institution entry from `GET /institutions/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Institution {
    /// Institution ID, e.g. `SANDBOXFINANCE_SFIN0000`.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// BIC, when published.
    #[serde(default)]
    pub bic: Option<String>,
    /// Default days of transaction history available.
    #[serde(default)]
    pub transaction_total_days: Option<String>,
    /// Maximum access validity in days.
    #[serde(default)]
    pub max_access_valid_for_days: Option<String>,
    /// ISO country codes the institution serves.
    #[serde(default)]
    pub countries: Vec<String>,
    /// Logo URL.
    #[serde(default)]
    pub logo: Option<String>,
}

/// The richer per-institution record from `GET /institutions/{id}/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integration {
    /// Institution ID.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// BIC.
    #[serde(default)]
    pub bic: Option<String>,
    /// Default days of transaction history available.
    #[serde(default)]
    pub transaction_total_days: Option<String>,
    /// Maximum access validity in days.
    #[serde(default)]
    pub max_access_valid_for_days: Option<String>,
    /// ISO country codes the institution serves.
    #[serde(default)]
    pub countries: Vec<String>,
    /// Logo URL.
    #[serde(default)]
    pub logo: Option<String>,
    /// Supported API feature names.
    #[serde(default)]
    pub supported_features: Vec<String>,
    /// Institution-specific payment/identification fields.
    #[serde(default)]
    pub identification_codes: Vec<String>,
    /// Any fields this model does not map explicitly.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

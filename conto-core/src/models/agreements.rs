use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An end-user agreement record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndUserAgreement {
    /// Agreement UUID.
    pub id: String,
    /// Creation timestamp.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// Institution the agreement covers.
    #[serde(default)]
    pub institution_id: Option<String>,
    /// Days of transaction history the agreement grants.
    #[serde(default)]
    pub max_historical_days: Option<i64>,
    /// Days the access remains valid once accepted.
    #[serde(default)]
    pub access_valid_for_days: Option<i64>,
    /// Granted access scopes (`balances`, `details`, `transactions`).
    #[serde(default)]
    pub access_scope: Vec<String>,
    /// When the end user accepted, absent until acceptance.
    #[serde(default)]
    pub accepted: Option<DateTime<Utc>>,
}

/// One page of `GET /agreements/enduser/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgreementPage {
    /// Total agreement count across all pages.
    #[serde(default)]
    pub count: u64,
    /// URL of the next page, absent on the last page.
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page, absent on the first page.
    #[serde(default)]
    pub previous: Option<String>,
    /// Agreements on this page.
    #[serde(default)]
    pub results: Vec<EndUserAgreement>,
}

/// Reconfirmation state for an agreement.
///
/// The upstream shape is still evolving, so only the stable identifiers are
/// mapped and everything else lands in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reconfirmation {
    /// Agreement UUID this reconfirmation belongs to.
    #[serde(default)]
    pub id: Option<String>,
    /// Reconfirmation URL for the end user.
    #[serde(default)]
    pub reconfirmation_url: Option<String>,
    /// Last reconfirmation timestamp.
    #[serde(default)]
    pub reconfirmed: Option<DateTime<Utc>>,
    /// Any fields this model does not map explicitly.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

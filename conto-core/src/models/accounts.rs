use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Money;

/// Account metadata from `GET /accounts/{id}/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Account UUID.
    pub id: String,
    /// When the account was first linked.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// Last time the account was accessed through the API.
    #[serde(default)]
    pub last_accessed: Option<DateTime<Utc>>,
    /// IBAN, when the institution exposes it.
    #[serde(default)]
    pub iban: Option<String>,
    /// Owning institution ID.
    #[serde(default)]
    pub institution_id: Option<String>,
    /// Account status (e.g. `READY`, `SUSPENDED`).
    #[serde(default)]
    pub status: Option<String>,
    /// Account owner name, when exposed.
    #[serde(default)]
    pub owner_name: Option<String>,
}

/// One balance entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// The balance amount and currency.
    pub balance_amount: Money,
    /// Balance type (e.g. `interimAvailable`, `closingBooked`).
    #[serde(default)]
    pub balance_type: Option<String>,
    /// Reference date of the balance.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
    /// Whether the credit limit is included in the amount.
    #[serde(default)]
    pub credit_limit_included: Option<bool>,
}

/// Envelope of `GET /accounts/{id}/balances/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalances {
    /// Balance entries, one per balance type the institution reports.
    #[serde(default)]
    pub balances: Vec<Balance>,
}

/// Detailed account attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetail {
    /// Institution-scoped resource identifier.
    #[serde(default)]
    pub resource_id: Option<String>,
    /// IBAN.
    #[serde(default)]
    pub iban: Option<String>,
    /// Account currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// Owner name.
    #[serde(default)]
    pub owner_name: Option<String>,
    /// Account display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Product name at the institution.
    #[serde(default)]
    pub product: Option<String>,
    /// Cash account type code.
    #[serde(default)]
    pub cash_account_type: Option<String>,
}

/// Envelope of `GET /accounts/{id}/details/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDetails {
    /// The detail record.
    pub account: AccountDetail,
}

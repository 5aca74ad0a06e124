use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Requisition status value marking an expired bank link.
pub const REQUISITION_STATUS_EXPIRED: &str = "EX";

/// A requisition (bank link) record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requisition {
    /// Requisition UUID.
    pub id: String,
    /// Creation timestamp.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// Redirect URL the end user returns to after authorizing.
    #[serde(default)]
    pub redirect: Option<String>,
    /// Lifecycle status code (see [`REQUISITION_STATUS_EXPIRED`]).
    #[serde(default)]
    pub status: Option<String>,
    /// Institution the link targets.
    #[serde(default)]
    pub institution_id: Option<String>,
    /// Attached end-user agreement ID.
    #[serde(default)]
    pub agreement: Option<String>,
    /// Caller-chosen reference for correlating requisitions.
    #[serde(default)]
    pub reference: Option<String>,
    /// Days the granted access stays valid, from the attached agreement.
    #[serde(default)]
    pub access_valid_for_days: Option<i64>,
    /// IDs of the accounts the end user granted access to.
    #[serde(default)]
    pub accounts: Vec<String>,
    /// Link the end user must visit to authorize the requisition.
    #[serde(default)]
    pub link: Option<String>,
    /// UI language for the authorization flow.
    #[serde(default)]
    pub user_language: Option<String>,
    /// Single-sign-on name, when used.
    #[serde(default)]
    pub ssn: Option<String>,
    /// Whether account selection was enabled.
    #[serde(default)]
    pub account_selection: Option<bool>,
    /// Whether the end user is redirected immediately after consent.
    #[serde(default)]
    pub redirect_immediate: Option<bool>,
}

impl Requisition {
    /// Whether the bank link has expired and must be recreated.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.status.as_deref() == Some(REQUISITION_STATUS_EXPIRED)
    }
}

/// One page of `GET /requisitions/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequisitionPage {
    /// Total requisition count across all pages.
    #[serde(default)]
    pub count: u64,
    /// URL of the next page, absent on the last page.
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page, absent on the first page.
    #[serde(default)]
    pub previous: Option<String>,
    /// Requisitions on this page.
    #[serde(default)]
    pub results: Vec<Requisition>,
}

//! Cross-requisition account overview and bank-link conveniences.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use conto_core::models::{Account, Requisition};
use conto_types::ContoError;

use crate::core::Conto;

/// One account joined with the metadata of the requisition that granted it.
#[derive(Debug, Clone)]
pub struct AccountOverview {
    /// The account record.
    pub account: Account,
    /// Granting requisition ID.
    pub requisition_id: String,
    /// Caller-chosen requisition reference.
    pub requisition_reference: Option<String>,
    /// Institution behind the requisition.
    pub institution_id: Option<String>,
    /// Requisition lifecycle status.
    pub requisition_status: Option<String>,
    /// When access runs out: requisition creation plus the granted validity
    /// window (90 days when the requisition carries none).
    pub access_valid_until: Option<DateTime<Utc>>,
    /// Whether the bank link has already expired.
    pub is_expired: bool,
}

impl Conto {
    /// Collect every account across all requisitions, joined with expiry
    /// metadata. Accounts whose fetch fails are skipped rather than failing
    /// the whole listing.
    ///
    /// # Errors
    /// Propagates a failure of the requisition listing itself.
    pub async fn all_accounts(&self) -> Result<Vec<AccountOverview>, ContoError> {
        let mut overviews = Vec::new();
        for req in self.requisitions().await? {
            for account_id in &req.accounts {
                match self.account(account_id).await {
                    Ok(account) => overviews.push(overview_of(account, &req)),
                    Err(e) => {
                        warn!(account_id, error = %e, "skipping inaccessible account");
                    }
                }
            }
        }
        debug!(count = overviews.len(), "collected account overviews");
        Ok(overviews)
    }

    /// Return the display names of available banks, optionally filtered by
    /// country. Institutions without a name are omitted.
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn list_banks(&self, country: Option<&str>) -> Result<Vec<String>, ContoError> {
        let institutions = self.institutions(country).await?;
        Ok(institutions.into_iter().filter_map(|i| i.name).collect())
    }

    /// Find the requisition carrying `reference`, if any.
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn find_requisition_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Requisition>, ContoError> {
        let requisitions = self.requisitions().await?;
        Ok(requisitions
            .into_iter()
            .find(|req| req.reference.as_deref() == Some(reference)))
    }

    /// Create a bank authorization link and return its URL, or `None` when a
    /// requisition with the same reference already exists.
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn create_bank_link(
        &self,
        reference: &str,
        institution_id: &str,
        redirect_url: &str,
    ) -> Result<Option<String>, ContoError> {
        if self
            .find_requisition_by_reference(reference)
            .await?
            .is_some()
        {
            debug!(reference, "requisition already exists, not creating a new link");
            return Ok(None);
        }
        let requisition = self
            .create_requisition(redirect_url, institution_id, reference)
            .await?;
        Ok(requisition.link)
    }
}

fn overview_of(account: Account, req: &Requisition) -> AccountOverview {
    let valid_days = req.access_valid_for_days.unwrap_or(90);
    AccountOverview {
        account,
        requisition_id: req.id.clone(),
        requisition_reference: req.reference.clone(),
        institution_id: req.institution_id.clone(),
        requisition_status: req.status.clone(),
        access_valid_until: req
            .created
            .map(|created| created + chrono::Duration::days(valid_days)),
        is_expired: req.is_expired(),
    }
}

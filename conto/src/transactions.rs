//! Multi-page transaction aggregation.

use chrono::Utc;
use tracing::{debug, warn};

use conto_core::models::{AccountTransactions, TransactionBundle};
use conto_types::ContoError;

use crate::core::Conto;

impl Conto {
    /// Fetch all transactions of an account within the last `days_back` days.
    ///
    /// Issues one request for the date window, then follows `next` links
    /// until the listing ends or the configured page cap is reached. Booked
    /// and pending lists are merged across pages in arrival order. Reaching
    /// the cap logs a warning and returns what was accumulated; a failure on
    /// a follow-up page propagates rather than returning a partial window
    /// silently.
    ///
    /// # Errors
    /// Propagates pipeline failures from any page.
    pub async fn transactions(
        &self,
        account_id: &str,
        days_back: i64,
    ) -> Result<TransactionBundle, ContoError> {
        let date_to = Utc::now().date_naive();
        let date_from = date_to - chrono::Duration::days(days_back);
        debug!(account_id, %date_from, %date_to, "fetching transactions");

        let first: AccountTransactions = self
            .pipeline
            .get_json(
                &format!("/accounts/{account_id}/transactions/"),
                vec![
                    ("date_from".to_string(), date_from.to_string()),
                    ("date_to".to_string(), date_to.to_string()),
                ],
            )
            .await?;

        let mut bundle = first.transactions;
        let mut next = first.next;
        let mut pages_followed: u32 = 0;

        while let Some(link) = next {
            if pages_followed >= self.max_pages {
                warn!(
                    account_id,
                    pages = pages_followed + 1,
                    "page cap reached, truncating transaction listing"
                );
                break;
            }
            let path = self.relativize(&link);
            let page: AccountTransactions = self.pipeline.get_json(&path, Vec::new()).await?;
            bundle.booked.extend(page.transactions.booked);
            bundle.pending.extend(page.transactions.pending);
            next = page.next;
            pages_followed += 1;
        }

        debug!(
            account_id,
            booked = bundle.booked.len(),
            pending = bundle.pending.len(),
            "fetched transactions"
        );
        Ok(bundle)
    }

    /// Rewrite an absolute pagination link under this client's base URL into
    /// a relative path; foreign absolute links pass through untouched.
    fn relativize(&self, link: &str) -> String {
        link.strip_prefix(self.base_url())
            .map_or_else(|| link.to_string(), ToString::to_string)
    }
}

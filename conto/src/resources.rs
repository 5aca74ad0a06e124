//! Typed resource methods over the authenticated pipeline.

use serde_json::json;
use tracing::debug;

use conto_core::models::{
    Account, AccountBalances, AccountDetail, AccountDetails, AgreementPage, Balance,
    EndUserAgreement, Institution, Integration, Reconfirmation, Requisition, RequisitionPage,
};
use conto_types::ContoError;

use crate::core::Conto;

impl Conto {
    /// Retrieve metadata for a single account.
    ///
    /// # Errors
    /// Propagates pipeline failures ([`ContoError::Http`],
    /// [`ContoError::Authentication`], [`ContoError::Transport`],
    /// [`ContoError::Decode`]).
    pub async fn account(&self, account_id: &str) -> Result<Account, ContoError> {
        debug!(account_id, "getting account metadata");
        self.pipeline
            .get_json(&format!("/accounts/{account_id}/"), Vec::new())
            .await
    }

    /// Retrieve the balances of an account.
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn balances(&self, account_id: &str) -> Result<Vec<Balance>, ContoError> {
        debug!(account_id, "getting account balances");
        let envelope: AccountBalances = self
            .pipeline
            .get_json(&format!("/accounts/{account_id}/balances/"), Vec::new())
            .await?;
        Ok(envelope.balances)
    }

    /// Retrieve detailed attributes of an account.
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn details(&self, account_id: &str) -> Result<AccountDetail, ContoError> {
        debug!(account_id, "getting account details");
        let envelope: AccountDetails = self
            .pipeline
            .get_json(&format!("/accounts/{account_id}/details/"), Vec::new())
            .await?;
        Ok(envelope.account)
    }

    /// List institutions, optionally filtered by ISO country code.
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn institutions(
        &self,
        country: Option<&str>,
    ) -> Result<Vec<Institution>, ContoError> {
        debug!(?country, "getting institutions");
        let params = country
            .map(|c| vec![("country".to_string(), c.to_string())])
            .unwrap_or_default();
        let institutions: Vec<Institution> =
            self.pipeline.get_json("/institutions/", params).await?;
        debug!(count = institutions.len(), "fetched institutions");
        Ok(institutions)
    }

    /// Retrieve a single institution.
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn institution(&self, institution_id: &str) -> Result<Institution, ContoError> {
        self.pipeline
            .get_json(&format!("/institutions/{institution_id}/"), Vec::new())
            .await
    }

    /// Create a requisition (bank authorization request).
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn create_requisition(
        &self,
        redirect: &str,
        institution_id: &str,
        reference: &str,
    ) -> Result<Requisition, ContoError> {
        self.pipeline
            .post_json(
                "/requisitions/",
                json!({
                    "redirect": redirect,
                    "institution_id": institution_id,
                    "reference": reference,
                }),
            )
            .await
    }

    /// List all requisitions (first page's `results`, unwrapped).
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn requisitions(&self) -> Result<Vec<Requisition>, ContoError> {
        debug!("getting all requisitions");
        let page: RequisitionPage = self.pipeline.get_json("/requisitions/", Vec::new()).await?;
        debug!(count = page.results.len(), "fetched requisitions");
        Ok(page.results)
    }

    /// List requisitions with the raw pagination envelope.
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn requisitions_paginated(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<RequisitionPage, ContoError> {
        self.pipeline
            .get_json("/requisitions/", page_params(limit, offset))
            .await
    }

    /// Retrieve a single requisition.
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn requisition(&self, requisition_id: &str) -> Result<Requisition, ContoError> {
        self.pipeline
            .get_json(&format!("/requisitions/{requisition_id}/"), Vec::new())
            .await
    }

    /// Delete a requisition, returning the API's acknowledgment body.
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn delete_requisition(
        &self,
        requisition_id: &str,
    ) -> Result<serde_json::Value, ContoError> {
        self.pipeline
            .delete_json(&format!("/requisitions/{requisition_id}/"))
            .await
    }

    /// Create an end-user agreement for an institution.
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn create_agreement(
        &self,
        institution_id: &str,
        max_historical_days: i64,
        access_valid_for_days: i64,
        access_scope: &[&str],
    ) -> Result<EndUserAgreement, ContoError> {
        self.pipeline
            .post_json(
                "/agreements/enduser/",
                json!({
                    "institution_id": institution_id,
                    "max_historical_days": max_historical_days,
                    "access_valid_for_days": access_valid_for_days,
                    "access_scope": access_scope,
                }),
            )
            .await
    }

    /// List all end-user agreements (first page's `results`, unwrapped).
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn agreements(&self) -> Result<Vec<EndUserAgreement>, ContoError> {
        let page: AgreementPage = self
            .pipeline
            .get_json("/agreements/enduser/", Vec::new())
            .await?;
        Ok(page.results)
    }

    /// List end-user agreements with the raw pagination envelope.
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn agreements_paginated(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<AgreementPage, ContoError> {
        self.pipeline
            .get_json("/agreements/enduser/", page_params(limit, offset))
            .await
    }

    /// Retrieve a single end-user agreement.
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn agreement(&self, agreement_id: &str) -> Result<EndUserAgreement, ContoError> {
        self.pipeline
            .get_json(&format!("/agreements/enduser/{agreement_id}/"), Vec::new())
            .await
    }

    /// Accept an end-user agreement on behalf of the end user.
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn accept_agreement(
        &self,
        agreement_id: &str,
        user_agent: &str,
        ip: &str,
    ) -> Result<serde_json::Value, ContoError> {
        self.pipeline
            .post_json(
                &format!("/agreements/enduser/{agreement_id}/accept/"),
                json!({"user_agent": user_agent, "ip": ip}),
            )
            .await
    }

    /// Request reconfirmation of an end-user agreement.
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn reconfirm_agreement(
        &self,
        agreement_id: &str,
        user_agent: &str,
        ip: &str,
    ) -> Result<Reconfirmation, ContoError> {
        self.pipeline
            .post_json(
                &format!("/agreements/enduser/{agreement_id}/reconfirm/"),
                json!({"user_agent": user_agent, "ip": ip}),
            )
            .await
    }

    /// List all integrations.
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn integrations(&self) -> Result<Vec<Integration>, ContoError> {
        self.pipeline.get_json("/integrations/", Vec::new()).await
    }

    /// Retrieve a single integration.
    ///
    /// # Errors
    /// Propagates pipeline failures.
    pub async fn integration(&self, integration_id: &str) -> Result<Integration, ContoError> {
        self.pipeline
            .get_json(&format!("/integrations/{integration_id}/"), Vec::new())
            .await
    }
}

fn page_params(limit: Option<u32>, offset: Option<u32>) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some(limit) = limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    if let Some(offset) = offset {
        params.push(("offset".to_string(), offset.to_string()));
    }
    params
}

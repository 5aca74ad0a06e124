//! Typed records mirroring the bank account data API's resources.
//!
//! Wire field names are preserved through serde renames (the transaction
//! surface is camelCase, the requisition/agreement surface snake_case), so
//! serialized records can be addressed with the same dot-paths the upstream
//! API documents. Records are transient: constructed fresh from each
//! response, never cached as objects.

mod accounts;
mod agreements;
mod institutions;
mod requisitions;
mod token;
mod transactions;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use accounts::{Account, AccountBalances, AccountDetail, AccountDetails, Balance};
pub use agreements::{AgreementPage, EndUserAgreement, Reconfirmation};
pub use institutions::{Institution, Integration};
pub use requisitions::{REQUISITION_STATUS_EXPIRED, Requisition, RequisitionPage};
pub use token::{TokenPair, TokenRefresh};
pub use transactions::{
    AccountReference, AccountTransactions, CurrencyExchange, Transaction, TransactionBundle,
};

/// An amount/currency pair, the API's universal money shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount; the API transmits it as a string.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Duck-typed field lookup by dot-separated path.
///
/// Every record resolves paths against its wire representation, returning
/// `None` for missing keys, out-of-range indices, or container leaves.
pub trait PathLookup: Serialize {
    /// Resolve a scalar value at `path`, e.g. `"transactionAmount.amount"`.
    fn lookup(&self, path: &str) -> Option<serde_json::Value> {
        conto_types::path::lookup_record(self, path)
    }
}

impl<T: Serialize> PathLookup for T {}

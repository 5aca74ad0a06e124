use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Balance, Money};

/// A creditor/debtor account reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountReference {
    /// IBAN of the counterparty account.
    #[serde(default)]
    pub iban: Option<String>,
    /// Basic bank account number, when no IBAN exists.
    #[serde(default)]
    pub bban: Option<String>,
}

/// Currency conversion details attached to a transaction.
///
/// The API emits this as either a single object or a list; the model always
/// normalizes to a list (see [`Transaction::currency_exchange`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyExchange {
    /// Instructed amount before conversion.
    #[serde(default)]
    pub instructed_amount: Option<Money>,
    /// Source currency code.
    #[serde(default)]
    pub source_currency: Option<String>,
    /// Applied exchange rate.
    #[serde(default)]
    pub exchange_rate: Option<Decimal>,
    /// Unit currency of the rate.
    #[serde(default)]
    pub unit_currency: Option<String>,
    /// Target currency code.
    #[serde(default)]
    pub target_currency: Option<String>,
}

/// One booked or pending transaction.
///
/// Institutions vary widely in which fields they populate, so nearly
/// everything is optional; fields this model does not know about are kept in
/// `extra` so dot-path lookup still reaches them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Institution-assigned transaction ID.
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// API-internal transaction ID, stable across refetches.
    #[serde(default)]
    pub internal_transaction_id: Option<String>,
    /// Booking date.
    #[serde(default)]
    pub booking_date: Option<NaiveDate>,
    /// Value date.
    #[serde(default)]
    pub value_date: Option<NaiveDate>,
    /// Booking timestamp, when the institution provides one.
    #[serde(default)]
    pub booking_date_time: Option<DateTime<Utc>>,
    /// Value timestamp.
    #[serde(default)]
    pub value_date_time: Option<DateTime<Utc>>,
    /// Signed transaction amount.
    pub transaction_amount: Money,
    /// Currency conversion details, normalized object-or-list to list;
    /// absent stays absent.
    #[serde(default, deserialize_with = "conto_types::list::one_or_many")]
    pub currency_exchange: Option<Vec<CurrencyExchange>>,
    /// Creditor name.
    #[serde(default)]
    pub creditor_name: Option<String>,
    /// Creditor account reference.
    #[serde(default)]
    pub creditor_account: Option<AccountReference>,
    /// Debtor name.
    #[serde(default)]
    pub debtor_name: Option<String>,
    /// Debtor account reference.
    #[serde(default)]
    pub debtor_account: Option<AccountReference>,
    /// Free-form remittance information.
    #[serde(default)]
    pub remittance_information_unstructured: Option<String>,
    /// Remittance information as an array of lines.
    #[serde(default)]
    pub remittance_information_unstructured_array: Option<Vec<String>>,
    /// Institution-proprietary transaction code.
    #[serde(default)]
    pub proprietary_bank_transaction_code: Option<String>,
    /// Balance after this transaction was applied.
    #[serde(default)]
    pub balance_after_transaction: Option<Balance>,
    /// Merchant category code for card transactions.
    #[serde(default)]
    pub merchant_category_code: Option<String>,
    /// Any fields this model does not map explicitly.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Booked and pending transaction lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionBundle {
    /// Finalized transactions.
    #[serde(default)]
    pub booked: Vec<Transaction>,
    /// Not-yet-settled transactions.
    #[serde(default)]
    pub pending: Vec<Transaction>,
}

/// One page of `GET /accounts/{id}/transactions/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountTransactions {
    /// The page's booked/pending lists.
    pub transactions: TransactionBundle,
    /// Link to the next page, absolute or relative; absent on the last page.
    #[serde(default)]
    pub next: Option<String>,
}

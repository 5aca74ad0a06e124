//! Deterministic JSON payloads mirroring the upstream API's wire shapes.

use serde_json::{Value, json};

/// A fresh token pair.
#[must_use]
pub fn token() -> Value {
    json!({
        "access": "mock-access-token",
        "access_expires": 86_400,
        "refresh": "mock-refresh-token",
        "refresh_expires": 2_592_000
    })
}

/// Account metadata.
#[must_use]
pub fn account(id: &str) -> Value {
    json!({
        "id": id,
        "created": "2024-01-15T09:30:00Z",
        "last_accessed": "2024-09-10T18:00:00Z",
        "iban": "DE75512108001245126199",
        "institution_id": "SANDBOXFINANCE_SFIN0000",
        "status": "READY",
        "owner_name": "Jane Doe"
    })
}

/// A balances envelope with available and booked entries.
#[must_use]
pub fn balances() -> Value {
    json!({
        "balances": [
            {
                "balanceAmount": {"amount": "1543.21", "currency": "EUR"},
                "balanceType": "interimAvailable",
                "referenceDate": "2024-09-10"
            },
            {
                "balanceAmount": {"amount": "1500.00", "currency": "EUR"},
                "balanceType": "closingBooked",
                "referenceDate": "2024-09-10"
            }
        ]
    })
}

/// An account details envelope.
#[must_use]
pub fn details() -> Value {
    json!({
        "account": {
            "resourceId": "res-1",
            "iban": "DE75512108001245126199",
            "currency": "EUR",
            "ownerName": "Jane Doe",
            "name": "Main Account",
            "product": "Girokonto",
            "cashAccountType": "CACC"
        }
    })
}

/// One booked transaction.
#[must_use]
pub fn transaction(id: &str, amount: &str) -> Value {
    json!({
        "transactionId": id,
        "internalTransactionId": format!("internal-{id}"),
        "bookingDate": "2024-09-10",
        "valueDate": "2024-09-10",
        "transactionAmount": {"amount": amount, "currency": "EUR"},
        "creditorName": "ACME GmbH",
        "creditorAccount": {"iban": "DE02100100100006820101"},
        "remittanceInformationUnstructured": format!("Payment {id}"),
        "proprietaryBankTransactionCode": "TRANSFER"
    })
}

/// One transactions page; `next` links to a follow-up page when given.
#[must_use]
pub fn transactions_page(booked: &[Value], next: Option<&str>) -> Value {
    let mut page = json!({
        "transactions": {
            "booked": booked,
            "pending": []
        }
    });
    if let Some(link) = next {
        page["next"] = json!(link);
    }
    page
}

/// A linked requisition holding `accounts`.
#[must_use]
pub fn requisition(id: &str, reference: &str, accounts: &[&str]) -> Value {
    json!({
        "id": id,
        "created": "2024-01-15T09:00:00Z",
        "redirect": "https://example.org/callback",
        "status": "LN",
        "institution_id": "SANDBOXFINANCE_SFIN0000",
        "agreement": "agr-1",
        "reference": reference,
        "accounts": accounts,
        "link": format!("https://ob.example.test/start/{id}"),
        "user_language": "EN"
    })
}

/// A requisitions page envelope.
#[must_use]
pub fn requisitions_page(results: &[Value]) -> Value {
    json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results
    })
}

/// A small institution list for one country.
#[must_use]
pub fn institutions() -> Value {
    json!([
        {
            "id": "SANDBOXFINANCE_SFIN0000",
            "name": "Sandbox Finance",
            "bic": "SFIN0000",
            "transaction_total_days": "90",
            "countries": ["XX"],
            "logo": "https://cdn.example.test/sandbox.png"
        },
        {
            "id": "EXAMPLEBANK_EXBK0001",
            "name": "Example Bank",
            "bic": "EXBK0001",
            "transaction_total_days": "730",
            "countries": ["XX"],
            "logo": "https://cdn.example.test/example.png"
        }
    ])
}

/// An end-user agreement.
#[must_use]
pub fn agreement(id: &str) -> Value {
    json!({
        "id": id,
        "created": "2024-01-15T08:55:00Z",
        "institution_id": "SANDBOXFINANCE_SFIN0000",
        "max_historical_days": 90,
        "access_valid_for_days": 90,
        "access_scope": ["balances", "details", "transactions"],
        "accepted": null
    })
}

use std::sync::Arc;

use conto::{Conto, Method};
use conto_mock::{MockTransport, fixtures};

/// Build a client against a fully scripted transport, so every example runs
/// offline and deterministically. Point `CONTO_SECRET_ID`/`CONTO_SECRET_KEY`
/// at real credentials and drop the `.transport(...)` line to run against the
/// live API.
#[must_use]
pub fn demo_client() -> Conto {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conto=debug".into()),
        )
        .init();

    let transport = Arc::new(MockTransport::new());
    transport.with_token_endpoint();
    transport.respond_json(
        Method::Get,
        "/requisitions/",
        200,
        &fixtures::requisitions_page(&[fixtures::requisition(
            "req-1",
            "demo-reference",
            &["acc-1"],
        )]),
    );
    transport.respond_json(Method::Get, "/accounts/acc-1/", 200, &fixtures::account("acc-1"));
    transport.respond_json(Method::Get, "/accounts/acc-1/balances/", 200, &fixtures::balances());
    transport.respond_json(Method::Get, "/accounts/acc-1/details/", 200, &fixtures::details());
    transport.respond_json(
        Method::Get,
        "/accounts/acc-1/transactions/",
        200,
        &fixtures::transactions_page(
            &[
                fixtures::transaction("t1", "-23.50"),
                fixtures::transaction("t2", "1250.00"),
            ],
            None,
        ),
    );
    transport.respond_json(Method::Get, "/institutions/", 200, &fixtures::institutions());

    Conto::builder(
        std::env::var("CONTO_SECRET_ID").unwrap_or_else(|_| "demo-secret-id".into()),
        std::env::var("CONTO_SECRET_KEY").unwrap_or_else(|_| "demo-secret-key".into()),
    )
    .transport(transport)
    .no_cache()
    .build()
    .expect("valid demo configuration")
}

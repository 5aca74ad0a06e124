mod common;

use common::demo_client;
use conto::models::PathLookup;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = demo_client();

    // Fetch 90 days of history; pagination is followed automatically.
    let bundle = client.transactions("acc-1", 90).await?;
    println!(
        "{} booked, {} pending",
        bundle.booked.len(),
        bundle.pending.len()
    );

    for tx in &bundle.booked {
        println!(
            "{}  {:>10} {}  {}",
            tx.booking_date.map_or_else(|| "????-??-??".into(), |d| d.to_string()),
            tx.transaction_amount.amount,
            tx.transaction_amount.currency,
            tx.remittance_information_unstructured.as_deref().unwrap_or(""),
        );

        // Any wire field is also reachable by dot-path, mapped or not.
        if let Some(code) = tx.lookup("proprietaryBankTransactionCode") {
            println!("    code: {code}");
        }
    }

    Ok(())
}

mod common;

use common::demo_client;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = demo_client();

    // Pick a bank.
    for name in client.list_banks(Some("XX")).await? {
        println!("available: {name}");
    }

    // Idempotent link creation: an existing reference returns None instead
    // of creating a duplicate requisition.
    match client
        .create_bank_link(
            "demo-reference",
            "SANDBOXFINANCE_SFIN0000",
            "https://example.org/callback",
        )
        .await?
    {
        Some(link) => println!("authorize at: {link}"),
        None => println!("link for this reference already exists"),
    }

    Ok(())
}

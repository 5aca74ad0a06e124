mod common;

use common::demo_client;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = demo_client();

    // Walk every requisition and join its accounts with expiry metadata.
    for overview in client.all_accounts().await? {
        println!(
            "{} [{}] reference={} expires={} expired={}",
            overview.account.id,
            overview.requisition_status.as_deref().unwrap_or("?"),
            overview.requisition_reference.as_deref().unwrap_or("-"),
            overview
                .access_valid_until
                .map_or_else(|| "-".to_string(), |t| t.to_rfc3339()),
            overview.is_expired,
        );

        let balances = client.balances(&overview.account.id).await?;
        for balance in balances {
            println!(
                "  {}: {} {}",
                balance.balance_type.as_deref().unwrap_or("balance"),
                balance.balance_amount.amount,
                balance.balance_amount.currency,
            );
        }
    }

    Ok(())
}

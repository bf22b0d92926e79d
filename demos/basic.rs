//! Basic example demonstrating the Chargify API client.
//!
//! Run with:
//! ```
//! CHARGIFY_SUBDOMAIN=acme CHARGIFY_API_KEY=your-key CHARGIFY_SHARED_KEY=your-shared-key \
//!     cargo run --example basic -- cust-7
//! ```

use chargify::{ChargifyClient, PaginationParams, Subscription, TransactionListQuery};

#[tokio::main]
async fn main() -> chargify::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    let reference = std::env::args().nth(1).unwrap_or_else(|| "cust-7".to_string());

    // Create client from environment variables
    println!("Creating Chargify client...");
    let client = ChargifyClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    // Resolve the customer's subscription
    println!("\n--- Subscription for customer {reference} ---");
    let subscription = Subscription::find_by_customer_reference(&client, &reference).await?;
    println!("  ID: {:?}", subscription.id);
    println!("  State: {}", subscription.state.as_deref().unwrap_or("unknown"));
    println!("  Balance: {:?} cents", subscription.balance_in_cents);
    if let Some(customer) = &subscription.customer {
        println!("  Customer: {}", customer.full_name().unwrap_or_default());
    }
    if let Some(card) = subscription.payment_profile() {
        println!(
            "  Card: {}",
            card.masked_card_number.as_deref().unwrap_or("unknown")
        );
    }

    // Recent transactions
    println!("\n--- Recent Transactions ---");
    let transactions = subscription
        .transactions(&client, &TransactionListQuery::default())
        .await?;
    for transaction in transactions.iter().take(5) {
        println!(
            "  {} {} {} cents",
            transaction.id, transaction.transaction_type, transaction.amount_in_cents
        );
    }

    // Statements
    println!("\n--- Statements ---");
    let statements = subscription
        .statements(&client, &PaginationParams::for_page(1, 5))
        .await?;
    for statement in &statements {
        let settled = if statement.is_settled() { "settled" } else { "open" };
        println!("  {} - {} cents ({})", statement.id, statement.total_in_cents, settled);
    }

    // Hosted payment update page
    if let Some(url) = subscription.hosted_update_payment_page_url(client.config()) {
        println!("\nUpdate payment details at: {url}");
    }

    println!("\nDone!");
    Ok(())
}

//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use chrono::{DateTime, TimeZone, Utc};

use crate::{
    Component, CreditCard, Customer, Event, Product, Statement, Subscription, Transaction,
    PAYMENT_TRANSACTION_TYPE,
};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, second).single()
}

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Customer and product fixtures
    // =========================================================================

    /// Create a customer with a merchant reference.
    pub fn customer(id: u64, reference: &str) -> Customer {
        Customer {
            id,
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            email: Some(format!("{reference}@example.com")),
            organization: Some("Acme".to_string()),
            reference: Some(reference.to_string()),
            ..Default::default()
        }
    }

    /// Create a monthly product.
    pub fn monthly_product(id: u64, handle: &str, price_in_cents: i64) -> Product {
        Product {
            id,
            name: Some(handle.replace('-', " ")),
            handle: Some(handle.to_string()),
            price_in_cents: Some(price_in_cents),
            interval: Some(1),
            interval_unit: Some("month".to_string()),
        }
    }

    /// Create a Visa card on file.
    pub fn visa(id: u64) -> CreditCard {
        CreditCard {
            id,
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            masked_card_number: Some("XXXX-XXXX-XXXX-1111".to_string()),
            card_type: Some("visa".to_string()),
            expiration_month: Some(12),
            expiration_year: Some(2030),
        }
    }

    // =========================================================================
    // Subscription fixtures
    // =========================================================================

    /// Create an active subscription with its embedded projections.
    pub fn active_subscription(id: u64, customer: &Customer, product: &Product) -> Subscription {
        Subscription {
            id: Some(id),
            state: Some("active".to_string()),
            balance_in_cents: Some(0),
            product_price_in_cents: product.price_in_cents,
            payment_collection_method: Some("automatic".to_string()),
            customer_id: Some(customer.id),
            customer_reference: customer.reference.clone(),
            product_handle: product.handle.clone(),
            activated_at: at(2024, 1, 1, 0, 0, 0),
            customer: Some(customer.clone()),
            product: Some(product.clone()),
            credit_card: Some(Self::visa(id + 1000)),
            ..Default::default()
        }
    }

    /// Create a canceled subscription.
    pub fn canceled_subscription(id: u64, customer: &Customer, product: &Product) -> Subscription {
        Subscription {
            state: Some("canceled".to_string()),
            cancellation_message: Some("Too expensive".to_string()),
            ..Self::active_subscription(id, customer, product)
        }
    }

    // =========================================================================
    // Nested record fixtures
    // =========================================================================

    /// Create a settled statement.
    pub fn statement(id: u64, subscription_id: u64, total_in_cents: i64) -> Statement {
        Statement {
            id,
            subscription_id,
            opened_at: at(2024, 1, 1, 0, 0, 0),
            closed_at: at(2024, 2, 1, 0, 0, 0),
            settled_at: at(2024, 2, 1, 0, 5, 0),
            total_in_cents,
            paid_amount_in_cents: total_in_cents,
            ..Default::default()
        }
    }

    /// Create a successful payment.
    pub fn payment(id: u64, subscription_id: u64, amount_in_cents: i64) -> Transaction {
        Transaction {
            id,
            transaction_type: PAYMENT_TRANSACTION_TYPE.to_string(),
            amount_in_cents,
            subscription_id: Some(subscription_id),
            success: Some(true),
            memo: Some("Payment for: Pro plan".to_string()),
            ending_balance_in_cents: Some(0),
            created_at: at(2024, 2, 1, 0, 5, 0),
        }
    }

    /// Create a recurring charge.
    pub fn charge(id: u64, subscription_id: u64, amount_in_cents: i64) -> Transaction {
        Transaction {
            id,
            transaction_type: "charge".to_string(),
            amount_in_cents,
            subscription_id: Some(subscription_id),
            success: Some(true),
            memo: Some("Pro plan: 1 month".to_string()),
            ending_balance_in_cents: Some(amount_in_cents),
            created_at: at(2024, 2, 1, 0, 0, 0),
        }
    }

    /// Create a quantity-based component.
    pub fn seats(component_id: u64, subscription_id: u64, quantity: i64) -> Component {
        Component {
            component_id,
            subscription_id: Some(subscription_id),
            name: Some("Seats".to_string()),
            kind: Some("quantity_based_component".to_string()),
            unit_name: Some("seat".to_string()),
            allocated_quantity: Some(quantity),
            pricing_scheme: Some("per_unit".to_string()),
            ..Default::default()
        }
    }

    /// Create an event.
    pub fn event(id: u64, subscription_id: u64, key: &str) -> Event {
        Event {
            id,
            key: Some(key.to_string()),
            message: Some(key.replace('_', " ")),
            subscription_id: Some(subscription_id),
            ..Default::default()
        }
    }

    /// Create the default scenario used by [`MockServer::start`](super::MockServer::start).
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// Default data set for the mock server.
///
/// - Customer 7 (`cust-7`) owns subscription 42 on `pro-monthly`, with a
///   payment (77), a charge (76), statements 500 and 501, one component
///   and two events.
/// - Customer 8 (`cust-8`) owns subscription 43, canceled, and statement 600.
/// - Product `enterprise-monthly` is available as a migration target.
pub struct DefaultScenario {
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub subscriptions: Vec<Subscription>,
    pub statements: Vec<Statement>,
    pub transactions: Vec<Transaction>,
    pub components: Vec<(u64, Component)>,
    pub events: Vec<(u64, Event)>,
}

impl DefaultScenario {
    fn new() -> Self {
        let pro = Fixtures::monthly_product(1, "pro-monthly", 2500);
        let enterprise = Fixtures::monthly_product(2, "enterprise-monthly", 9900);
        let jane = Fixtures::customer(7, "cust-7");
        let john = Fixtures::customer(8, "cust-8");

        Self {
            subscriptions: vec![
                Fixtures::active_subscription(42, &jane, &pro),
                Fixtures::canceled_subscription(43, &john, &pro),
            ],
            statements: vec![
                Fixtures::statement(500, 42, 2500),
                Fixtures::statement(501, 42, 2500),
                Fixtures::statement(600, 43, 2500),
            ],
            transactions: vec![Fixtures::charge(76, 42, 2500), Fixtures::payment(77, 42, 2500)],
            components: vec![(42, Fixtures::seats(10, 42, 5))],
            events: vec![
                (42, Fixtures::event(900, 42, "signup_success")),
                (42, Fixtures::event(901, 42, "payment_success")),
            ],
            products: vec![pro, enterprise],
            customers: vec![jane, john],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_subscription_embeds_projections() {
        let customer = Fixtures::customer(7, "cust-7");
        let product = Fixtures::monthly_product(1, "pro-monthly", 2500);
        let subscription = Fixtures::active_subscription(42, &customer, &product);

        assert!(subscription.is_active());
        assert_eq!(subscription.customer_id, Some(7));
        assert_eq!(subscription.product_handle.as_deref(), Some("pro-monthly"));
        assert!(subscription.payment_profile().is_some());
    }

    #[test]
    fn test_canceled_subscription_is_inactive() {
        let customer = Fixtures::customer(8, "cust-8");
        let product = Fixtures::monthly_product(1, "pro-monthly", 2500);
        assert!(!Fixtures::canceled_subscription(43, &customer, &product).is_active());
    }

    #[test]
    fn test_payment_fixture_is_refundable() {
        assert!(Fixtures::payment(77, 42, 2500).is_payment());
        assert!(!Fixtures::charge(76, 42, 2500).is_payment());
    }

    #[test]
    fn test_default_scenario() {
        let scenario = Fixtures::default_scenario();
        assert_eq!(scenario.subscriptions.len(), 2);
        assert!(scenario.statements.iter().any(|s| s.subscription_id == 43));
        assert!(scenario.transactions.iter().any(Transaction::is_payment));
    }
}

//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Chargify API server.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    Adjustment, Charge, Component, Credit, Customer, Event, Product, Refund, Statement,
    Subscription, Transaction,
};

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Subscriptions indexed by ID.
    pub subscriptions: HashMap<u64, Subscription>,

    /// Customers indexed by ID.
    pub customers: HashMap<u64, Customer>,

    /// Statements indexed by ID.
    pub statements: HashMap<u64, Statement>,

    /// Transactions indexed by ID.
    pub transactions: HashMap<u64, Transaction>,

    /// Components indexed by subscription ID.
    pub components: HashMap<u64, Vec<Component>>,

    /// Events indexed by subscription ID.
    pub events: HashMap<u64, Vec<Event>>,

    /// Products indexed by ID.
    pub products: HashMap<u64, Product>,

    /// Last ID handed out for a created record.
    last_id: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a subscription to the state.
    ///
    /// # Panics
    ///
    /// Panics if the subscription has no id.
    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        let id = subscription.id.expect("fixture subscriptions need an id");
        self.bump_last_id(id);
        self.subscriptions.insert(id, subscription);
        self
    }

    /// Add a customer to the state.
    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.bump_last_id(customer.id);
        self.customers.insert(customer.id, customer);
        self
    }

    /// Add a statement to the state.
    pub fn with_statement(mut self, statement: Statement) -> Self {
        self.bump_last_id(statement.id);
        self.statements.insert(statement.id, statement);
        self
    }

    /// Add a transaction to the state.
    pub fn with_transaction(mut self, transaction: Transaction) -> Self {
        self.bump_last_id(transaction.id);
        self.transactions.insert(transaction.id, transaction);
        self
    }

    /// Add a component to a subscription.
    pub fn with_component(mut self, subscription_id: u64, component: Component) -> Self {
        self.components
            .entry(subscription_id)
            .or_default()
            .push(component);
        self
    }

    /// Add an event to a subscription.
    pub fn with_event(mut self, subscription_id: u64, event: Event) -> Self {
        self.bump_last_id(event.id);
        self.events.entry(subscription_id).or_default().push(event);
        self
    }

    /// Add a product to the state.
    pub fn with_product(mut self, product: Product) -> Self {
        self.products.insert(product.id, product);
        self
    }

    fn bump_last_id(&mut self, id: u64) {
        self.last_id = self.last_id.max(id);
    }

    /// Hand out a fresh ID.
    pub fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    /// Get a subscription by ID.
    pub fn get_subscription(&self, id: u64) -> Option<&Subscription> {
        self.subscriptions.get(&id)
    }

    /// Get a customer by merchant reference.
    pub fn find_customer_by_reference(&self, reference: &str) -> Option<&Customer> {
        self.customers
            .values()
            .find(|c| c.reference.as_deref() == Some(reference))
    }

    /// Find a product by handle or ID, the handle taking precedence.
    pub fn find_product(&self, handle: Option<&str>, id: Option<u64>) -> Option<&Product> {
        match handle {
            Some(handle) => self
                .products
                .values()
                .find(|p| p.handle.as_deref() == Some(handle)),
            None => self.products.get(&id?),
        }
    }

    /// Get a statement by ID.
    pub fn get_statement(&self, id: u64) -> Option<&Statement> {
        self.statements.get(&id)
    }

    /// List subscriptions, optionally filtered by customer, ordered by ID.
    pub fn list_subscriptions(&self, customer_id: Option<u64>) -> Vec<&Subscription> {
        let mut subscriptions: Vec<&Subscription> = self
            .subscriptions
            .values()
            .filter(|s| customer_id.map(|c| s.customer_id == Some(c)).unwrap_or(true))
            .collect();
        subscriptions.sort_by_key(|s| s.id);
        subscriptions
    }

    /// List statements of a subscription, ordered by ID.
    pub fn list_statements(&self, subscription_id: u64) -> Vec<&Statement> {
        let mut statements: Vec<&Statement> = self
            .statements
            .values()
            .filter(|s| s.subscription_id == subscription_id)
            .collect();
        statements.sort_by_key(|s| s.id);
        statements
    }

    /// List transactions of a subscription, newest first.
    pub fn list_transactions(&self, subscription_id: u64) -> Vec<&Transaction> {
        let mut transactions: Vec<&Transaction> = self
            .transactions
            .values()
            .filter(|t| t.subscription_id == Some(subscription_id))
            .collect();
        transactions.sort_by(|a, b| b.id.cmp(&a.id));
        transactions
    }

    /// Shift the balance of a subscription and record the ledger entry.
    fn record_balance_change(
        &mut self,
        subscription_id: u64,
        transaction_type: &str,
        delta_in_cents: i64,
        memo: Option<String>,
    ) -> Option<Transaction> {
        if !self.subscriptions.contains_key(&subscription_id) {
            return None;
        }
        let id = self.next_id();
        let subscription = self.subscriptions.get_mut(&subscription_id)?;
        let balance = subscription.balance_in_cents.unwrap_or(0) + delta_in_cents;
        subscription.balance_in_cents = Some(balance);

        let transaction = Transaction {
            id,
            transaction_type: transaction_type.to_string(),
            amount_in_cents: delta_in_cents.abs(),
            subscription_id: Some(subscription_id),
            success: Some(true),
            memo,
            ending_balance_in_cents: Some(balance),
            created_at: Some(Utc::now()),
        };
        self.transactions.insert(id, transaction.clone());
        Some(transaction)
    }

    /// Record a one-time charge and add it to the balance.
    pub fn record_charge(
        &mut self,
        subscription_id: u64,
        amount_in_cents: i64,
        memo: Option<String>,
    ) -> Option<Charge> {
        let t = self.record_balance_change(subscription_id, "charge", amount_in_cents, memo)?;
        Some(Charge {
            id: t.id,
            success: t.success,
            amount_in_cents,
            memo: t.memo,
            subscription_id: t.subscription_id,
            ending_balance_in_cents: t.ending_balance_in_cents,
            created_at: t.created_at,
        })
    }

    /// Record a one-time credit and take it off the balance.
    pub fn record_credit(
        &mut self,
        subscription_id: u64,
        amount_in_cents: i64,
        memo: Option<String>,
    ) -> Option<Credit> {
        let t = self.record_balance_change(subscription_id, "credit", -amount_in_cents, memo)?;
        Some(Credit {
            id: t.id,
            success: t.success,
            amount_in_cents,
            memo: t.memo,
            subscription_id: t.subscription_id,
            ending_balance_in_cents: t.ending_balance_in_cents,
            created_at: t.created_at,
        })
    }

    /// Record a balance adjustment.
    ///
    /// With `target` set the balance becomes `amount_in_cents`; otherwise it
    /// moves by that amount.
    pub fn record_adjustment(
        &mut self,
        subscription_id: u64,
        amount_in_cents: i64,
        target: bool,
        memo: Option<String>,
    ) -> Option<Adjustment> {
        let current = self
            .get_subscription(subscription_id)?
            .balance_in_cents
            .unwrap_or(0);
        let delta = if target {
            amount_in_cents - current
        } else {
            amount_in_cents
        };

        let t = self.record_balance_change(subscription_id, "adjustment", delta, memo)?;
        Some(Adjustment {
            id: t.id,
            success: t.success,
            amount_in_cents: delta,
            memo: t.memo,
            subscription_id: t.subscription_id,
            ending_balance_in_cents: t.ending_balance_in_cents,
            created_at: t.created_at,
        })
    }

    /// Record a refund of a payment on the subscription.
    ///
    /// Returns `None` unless `payment_id` is a payment of this subscription.
    pub fn record_refund(
        &mut self,
        subscription_id: u64,
        payment_id: u64,
        amount_in_cents: Option<i64>,
        memo: Option<String>,
    ) -> Option<Refund> {
        let payment = self
            .transactions
            .get(&payment_id)
            .filter(|t| t.subscription_id == Some(subscription_id) && t.is_payment())?;
        let amount_in_cents = amount_in_cents.unwrap_or(payment.amount_in_cents);

        let id = self.next_id();
        let refund = Refund {
            id,
            success: Some(true),
            amount_in_cents,
            payment_id: Some(payment_id),
            memo: memo.clone(),
            subscription_id: Some(subscription_id),
            created_at: Some(Utc::now()),
        };
        self.transactions.insert(
            id,
            Transaction {
                id,
                transaction_type: "refund".to_string(),
                amount_in_cents,
                subscription_id: Some(subscription_id),
                success: Some(true),
                memo,
                ending_balance_in_cents: None,
                created_at: refund.created_at,
            },
        );
        Some(refund)
    }
}

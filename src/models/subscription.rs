//! Subscription model and its domain operations.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{ChargifyClient, NO_QUERY};
use crate::config::ChargifyConfig;
use crate::envelope;
use crate::error::{ChargifyError, Result};
use crate::hosted_page::{self, UPDATE_PAYMENT_PAGE};
use crate::models::billing::{
    Adjustment, AdjustmentParams, Charge, ChargeParams, Credit, CreditParams, Refund, RefundParams,
};
use crate::models::component::{Component, ComponentListQuery};
use crate::models::credit_card::{CreditCard, CreditCardAttributes};
use crate::models::customer::{Customer, CustomerAttributes};
use crate::models::event::{Event, EventListQuery};
use crate::models::migration::{MigrationParams, MigrationPreview};
use crate::models::product::Product;
use crate::models::statement::Statement;
use crate::models::transaction::{Transaction, TransactionListQuery};
use crate::pagination::PaginationParams;
use crate::traits::{Find, Persist, Resource, SubscriptionScope};

/// A Chargify subscription.
///
/// The `customer`, `product` and `credit_card` fields are read-only copies
/// the API embeds in its responses. [`save`](Persist::save) sends
/// [`SubscriptionAttributes`] instead, which has no room for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// The subscription ID. Absent until the subscription has been created.
    #[serde(default)]
    pub id: Option<u64>,

    /// Lifecycle state (e.g., "trialing", "active", "past_due", "canceled").
    #[serde(default)]
    pub state: Option<String>,

    /// Outstanding balance.
    #[serde(default)]
    pub balance_in_cents: Option<i64>,

    /// Current product price.
    #[serde(default)]
    pub product_price_in_cents: Option<i64>,

    /// Revenue collected at signup, as a decimal string.
    #[serde(default)]
    pub signup_revenue: Option<String>,

    /// "automatic" (card on file) or "remittance" (invoiced).
    #[serde(default)]
    pub payment_collection_method: Option<String>,

    /// Coupon currently applied.
    #[serde(default)]
    pub coupon_code: Option<String>,

    /// Whether the subscription cancels when the current period ends.
    #[serde(default)]
    pub cancel_at_end_of_period: Option<bool>,

    /// Reason given for cancellation.
    #[serde(default)]
    pub cancellation_message: Option<String>,

    /// Owning customer ID.
    #[serde(default)]
    pub customer_id: Option<u64>,

    /// Merchant reference of the owning customer.
    #[serde(default)]
    pub customer_reference: Option<String>,

    /// Handle of the product.
    #[serde(default)]
    pub product_handle: Option<String>,

    /// Start of the current billing period.
    #[serde(default)]
    pub current_period_started_at: Option<DateTime<Utc>>,

    /// End of the current billing period.
    #[serde(default)]
    pub current_period_ends_at: Option<DateTime<Utc>>,

    /// When the next renewal is assessed.
    #[serde(default)]
    pub next_assessment_at: Option<DateTime<Utc>>,

    /// When the subscription first became active.
    #[serde(default)]
    pub activated_at: Option<DateTime<Utc>>,

    /// When the trial started.
    #[serde(default)]
    pub trial_started_at: Option<DateTime<Utc>>,

    /// When the trial ended.
    #[serde(default)]
    pub trial_ended_at: Option<DateTime<Utc>>,

    /// When the subscription expires, for products with an expiration interval.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,

    /// When the subscription was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// When the subscription was last updated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Owning customer (read-only).
    #[serde(default)]
    pub customer: Option<Customer>,

    /// Current product (read-only).
    #[serde(default)]
    pub product: Option<Product>,

    /// Payment profile (read-only).
    #[serde(default)]
    pub credit_card: Option<CreditCard>,
}

/// Writable subscription fields, sent on create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubscriptionAttributes {
    /// Handle of the product to subscribe to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_handle: Option<String>,

    /// ID of the product to subscribe to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u64>,

    /// Existing customer ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<u64>,

    /// Existing customer, by merchant reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_reference: Option<String>,

    /// New customer to create with the subscription.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_attributes: Option<CustomerAttributes>,

    /// Card to put on file with the subscription.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_card_attributes: Option<CreditCardAttributes>,

    /// "automatic" or "remittance".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_collection_method: Option<String>,

    /// Coupon to apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,

    /// Move the next renewal to this time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_billing_at: Option<DateTime<Utc>>,

    /// Cancel when the current period ends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_at_end_of_period: Option<bool>,

    /// Reason given for cancellation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_message: Option<String>,
}

/// Options for reactivating a canceled subscription, sent as query parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReactivateParams {
    /// Restart the product's trial.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_trial: Option<bool>,

    /// Keep the balance the subscription had when it was canceled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_balance: Option<bool>,

    /// Coupon to apply on reactivation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

impl Resource for Subscription {
    const ENTITY_TYPE: &'static str = "Subscription";
    const ELEMENT: &'static str = "subscription";
    const COLLECTION: &'static str = "subscriptions";
    type Scope = ();
}

impl Persist for Subscription {
    type Attributes = SubscriptionAttributes;

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn scope(&self) -> Self::Scope {}

    fn attributes(&self) -> SubscriptionAttributes {
        SubscriptionAttributes {
            product_handle: self.product_handle.clone(),
            customer_id: self.customer_id,
            customer_reference: self.customer_reference.clone(),
            payment_collection_method: self.payment_collection_method.clone(),
            coupon_code: self.coupon_code.clone(),
            cancel_at_end_of_period: self.cancel_at_end_of_period,
            cancellation_message: self.cancellation_message.clone(),
            ..Default::default()
        }
    }
}

impl Subscription {
    /// Create a subscription from explicit attributes.
    ///
    /// Use this to sign up a new customer or put a card on file, which
    /// a loaded [`Subscription`] has no fields for.
    #[tracing::instrument(skip(client, attributes))]
    pub async fn create(client: &ChargifyClient, attributes: &SubscriptionAttributes) -> Result<Self> {
        let body = envelope::wrap_root(Self::ELEMENT, attributes)?;
        let path = format!("{}.json", Self::collection_path(&()));

        let response = client.post(&path, &body).await?;
        let value = ChargifyClient::read_value(response).await?;
        envelope::decode_one(value, Self::ELEMENT)
    }

    /// Find the first subscription of the customer with the given merchant reference.
    ///
    /// # Errors
    ///
    /// Returns [`ChargifyError::NotFound`] if the reference does not resolve
    /// to a customer, or the customer has no subscription.
    #[tracing::instrument(skip(client))]
    pub async fn find_by_customer_reference(
        client: &ChargifyClient,
        reference: &str,
    ) -> Result<Self> {
        let customer = Customer::find_by_reference(client, reference).await?;
        Self::first(client, &(), &[("customer_id", customer.id)]).await
    }

    /// Whether the subscription is in a billable, non-terminal state.
    pub fn is_active(&self) -> bool {
        matches!(self.state.as_deref(), Some("active" | "trialing"))
    }

    /// Scope for resources nested under this subscription.
    ///
    /// # Errors
    ///
    /// Returns [`ChargifyError::MissingId`] if the subscription has no id.
    pub fn nested_scope(&self) -> Result<SubscriptionScope> {
        self.id
            .map(SubscriptionScope)
            .ok_or(ChargifyError::MissingId {
                entity_type: Self::ENTITY_TYPE,
            })
    }

    /// Cancel the subscription immediately.
    pub async fn cancel(&self, client: &ChargifyClient) -> Result<()> {
        self.destroy(client).await
    }

    // =========================================================================
    // Billing operations
    // =========================================================================

    /// Perform a one-time charge.
    pub async fn charge(&self, client: &ChargifyClient, params: &ChargeParams) -> Result<Charge> {
        let body = envelope::wrap_root("charge", params)?;
        let value = self.post(client, "charges", NO_QUERY, Some(&body)).await?;
        envelope::decode_one(value, "charge")
    }

    /// Apply a one-time credit.
    pub async fn credit(&self, client: &ChargifyClient, params: &CreditParams) -> Result<Credit> {
        let body = envelope::wrap_root("credit", params)?;
        let value = self.post(client, "credits", NO_QUERY, Some(&body)).await?;
        envelope::decode_one(value, "credit")
    }

    /// Refund an earlier payment.
    pub async fn refund(&self, client: &ChargifyClient, params: &RefundParams) -> Result<Refund> {
        let body = envelope::wrap_root("refund", params)?;
        let value = self.post(client, "refunds", NO_QUERY, Some(&body)).await?;
        envelope::decode_one(value, "refund")
    }

    /// Adjust the outstanding balance.
    pub async fn adjustment(
        &self,
        client: &ChargifyClient,
        params: &AdjustmentParams,
    ) -> Result<Adjustment> {
        let body = envelope::wrap_root("adjustment", params)?;
        let value = self.post(client, "adjustments", NO_QUERY, Some(&body)).await?;
        envelope::decode_one(value, "adjustment")
    }

    /// Reactivate a canceled or expired subscription.
    pub async fn reactivate(
        &self,
        client: &ChargifyClient,
        params: &ReactivateParams,
    ) -> Result<Subscription> {
        let value = self.put(client, "reactivate", params, None::<&Value>).await?;
        envelope::decode_one(value, Self::ELEMENT)
    }

    /// Zero the outstanding balance.
    pub async fn reset_balance(&self, client: &ChargifyClient) -> Result<()> {
        self.put(client, "reset_balance", NO_QUERY, None::<&Value>).await?;
        Ok(())
    }

    /// Move the subscription to another product.
    pub async fn migrate(
        &self,
        client: &ChargifyClient,
        params: &MigrationParams,
    ) -> Result<Subscription> {
        let body = envelope::wrap_root("migration", params)?;
        let value = self.post(client, "migrations", NO_QUERY, Some(&body)).await?;
        envelope::decode_one(value, Self::ELEMENT)
    }

    /// Compute what [`migrate`](Self::migrate) would cost, without changing anything.
    ///
    /// Posts a compact `{"migration": {...}}` body straight to the preview
    /// endpoint and unwraps the `migration` element of the answer.
    #[tracing::instrument(skip(self, client), fields(subscription_id = ?self.id))]
    pub async fn migrate_preview(
        &self,
        client: &ChargifyClient,
        params: &MigrationParams,
    ) -> Result<MigrationPreview> {
        let path = format!("{}/migrations/preview.json", self.member_path()?);
        let body = serde_json::to_string(&envelope::wrap_root("migration", params)?)?;

        let response = client
            .post_raw(&path, body)
            .await
            .map_err(|e| e.or_not_found(Self::ENTITY_TYPE, self.id.unwrap_or_default()))?;
        let value = ChargifyClient::read_value(response).await?;
        envelope::decode_one(value, "migration")
    }

    /// Apply a coupon.
    pub async fn add_coupon(&self, client: &ChargifyClient, code: &str) -> Result<Subscription> {
        let value = self
            .post(client, "add_coupon", &[("code", code)], None::<&Value>)
            .await?;
        envelope::decode_one(value, Self::ELEMENT)
    }

    /// Remove a coupon, or every coupon when `code` is `None`.
    pub async fn remove_coupon(&self, client: &ChargifyClient, code: Option<&str>) -> Result<()> {
        match code {
            Some(code) => {
                self.delete(client, "remove_coupon", &[("code", code)], None::<&Value>)
                    .await?
            }
            None => {
                self.delete(client, "remove_coupon", NO_QUERY, None::<&Value>)
                    .await?
            }
        };
        Ok(())
    }

    /// Issue an arbitrary sub-action the typed methods do not cover.
    pub async fn custom_action<Q, B>(
        &self,
        client: &ChargifyClient,
        method: Method,
        name: &str,
        query: &Q,
        body: Option<&B>,
    ) -> Result<Value>
    where
        Q: Serialize + Sync + ?Sized,
        B: Serialize + Sync + ?Sized,
    {
        self.dispatch(client, method, name, query, body).await
    }

    // =========================================================================
    // Nested resources
    // =========================================================================

    /// Fetch one of this subscription's components.
    pub async fn component(&self, client: &ChargifyClient, component_id: u64) -> Result<Component> {
        Component::find(client, &self.nested_scope()?, component_id).await
    }

    /// Fetch this subscription's components.
    pub async fn components(
        &self,
        client: &ChargifyClient,
        query: &ComponentListQuery,
    ) -> Result<Vec<Component>> {
        Component::all(client, &self.nested_scope()?, query).await
    }

    /// Fetch this subscription's events.
    pub async fn events(&self, client: &ChargifyClient, query: &EventListQuery) -> Result<Vec<Event>> {
        Event::all(client, &self.nested_scope()?, query).await
    }

    /// Fetch this subscription's statements.
    pub async fn statements(
        &self,
        client: &ChargifyClient,
        query: &PaginationParams,
    ) -> Result<Vec<Statement>> {
        Statement::all(client, &self.nested_scope()?, query).await
    }

    /// Fetch one statement, making sure it belongs to this subscription.
    ///
    /// # Errors
    ///
    /// Returns [`ChargifyError::NotFound`] if the statement does not exist
    /// or belongs to another subscription.
    pub async fn statement(&self, client: &ChargifyClient, statement_id: u64) -> Result<Statement> {
        let scope = self.nested_scope()?;
        let statement = Statement::find(client, &scope, statement_id).await?;

        if statement.subscription_id != scope.subscription_id() {
            tracing::warn!(
                statement_id,
                owner = statement.subscription_id,
                expected = scope.subscription_id(),
                "Statement belongs to another subscription"
            );
            return Err(ChargifyError::NotFound {
                entity_type: Statement::ENTITY_TYPE,
                id: statement_id.to_string(),
            });
        }
        Ok(statement)
    }

    /// Fetch this subscription's transactions.
    pub async fn transactions(
        &self,
        client: &ChargifyClient,
        query: &TransactionListQuery,
    ) -> Result<Vec<Transaction>> {
        Transaction::all(client, &self.nested_scope()?, query).await
    }

    // =========================================================================
    // Local projections
    // =========================================================================

    /// The payment profile on file, as loaded. Never fetches.
    pub fn payment_profile(&self) -> Option<&CreditCard> {
        self.credit_card.as_ref()
    }

    /// Signed URL of a hosted page for this subscription.
    ///
    /// Returns `None` for a subscription without an id.
    pub fn hosted_page_url(&self, config: &ChargifyConfig, page: &str) -> Option<String> {
        self.id
            .map(|id| hosted_page::hosted_page_url(config, page, id))
    }

    /// Signed URL of the hosted payment update page.
    pub fn hosted_update_payment_page_url(&self, config: &ChargifyConfig) -> Option<String> {
        self.hosted_page_url(config, UPDATE_PAYMENT_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_subscription() -> Subscription {
        serde_json::from_value(serde_json::json!({
            "subscription": {
                "id": 42,
                "state": "active",
                "balance_in_cents": 0,
                "coupon_code": "WELCOME",
                "payment_collection_method": "automatic",
                "current_period_ends_at": "2024-03-01T00:00:00-05:00",
                "customer": {"id": 7, "first_name": "Ada", "last_name": "Lovelace", "reference": "cust-7"},
                "product": {"id": 9, "name": "Pro", "handle": "pro", "price_in_cents": 4900},
                "credit_card": {"id": 11, "masked_card_number": "XXXX-XXXX-XXXX-1111", "card_type": "visa"}
            }
        })["subscription"]
            .clone())
        .expect("Failed to deserialize subscription")
    }

    #[test]
    fn test_subscription_deserialize() {
        let subscription = loaded_subscription();

        assert_eq!(subscription.id, Some(42));
        assert!(subscription.is_active());
        assert_eq!(subscription.customer.as_ref().map(|c| c.id), Some(7));
        assert_eq!(
            subscription.product.as_ref().and_then(|p| p.handle.as_deref()),
            Some("pro")
        );
        assert!(subscription.current_period_ends_at.is_some());
    }

    #[test]
    fn test_attributes_never_carry_nested_projections() {
        let subscription = loaded_subscription();
        assert!(subscription.customer.is_some());
        assert!(subscription.product.is_some());
        assert!(subscription.credit_card.is_some());

        let body = envelope::wrap_root(Subscription::ELEMENT, &subscription.attributes()).unwrap();
        let inner = body["subscription"].as_object().unwrap();

        assert!(!inner.contains_key("customer"));
        assert!(!inner.contains_key("product"));
        assert!(!inner.contains_key("credit_card"));
        assert_eq!(inner["coupon_code"], "WELCOME");
        assert_eq!(inner["payment_collection_method"], "automatic");
    }

    #[test]
    fn test_payment_profile_is_local() {
        let subscription = loaded_subscription();
        assert_eq!(subscription.payment_profile().map(|c| c.id), Some(11));

        let mut bare = subscription.clone();
        bare.credit_card = None;
        assert!(bare.payment_profile().is_none());
    }

    #[test]
    fn test_hosted_page_url() {
        let config = ChargifyConfig::new("acme", "api-key", "secret");
        let subscription = Subscription {
            id: Some(42),
            ..Default::default()
        };

        assert_eq!(
            subscription.hosted_update_payment_page_url(&config).as_deref(),
            Some("https://acme.chargify.com/update_payment/42/f128049662")
        );
        assert_eq!(
            subscription.hosted_page_url(&config, "update_payment"),
            subscription.hosted_update_payment_page_url(&config)
        );
    }

    #[test]
    fn test_hosted_page_url_requires_id() {
        let config = ChargifyConfig::new("acme", "api-key", "secret");
        let unsaved = Subscription::default();

        assert!(unsaved.hosted_page_url(&config, "update_payment").is_none());
        assert!(unsaved.hosted_update_payment_page_url(&config).is_none());
    }

    #[test]
    fn test_member_operations_require_id() {
        let unsaved = Subscription::default();
        assert!(matches!(
            unsaved.member_path(),
            Err(ChargifyError::MissingId {
                entity_type: "Subscription"
            })
        ));
        assert!(unsaved.nested_scope().is_err());
        assert_eq!(loaded_subscription().member_path().unwrap(), "subscriptions/42");
    }

    #[test]
    fn test_reactivate_params_query() {
        let params = ReactivateParams {
            include_trial: Some(true),
            ..Default::default()
        };
        let serialized = serde_qs::to_string(&params).expect("Failed to serialize query");
        assert_eq!(serialized, "include_trial=true");
    }
}

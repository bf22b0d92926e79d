//! Subscription transaction model and refund helpers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ChargifyClient;
use crate::error::{ChargifyError, Result};
use crate::models::billing::{Refund, RefundParams};
use crate::models::subscription::Subscription;
use crate::pagination::PaginationParams;
use crate::traits::{Find, Resource, SubscriptionScope};

/// Transaction type of a successful card payment.
pub const PAYMENT_TRANSACTION_TYPE: &str = "payment";

/// A ledger entry on a subscription (charge, payment, credit, refund, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The transaction ID. For payments this is the `payment_id` a refund refers to.
    pub id: u64,

    /// Transaction type (e.g., "charge", "payment", "credit", "refund").
    #[serde(default)]
    pub transaction_type: String,

    /// Transaction amount.
    #[serde(default)]
    pub amount_in_cents: i64,

    /// Owning subscription.
    #[serde(default)]
    pub subscription_id: Option<u64>,

    /// Whether the transaction succeeded.
    #[serde(default)]
    pub success: Option<bool>,

    /// Description.
    #[serde(default)]
    pub memo: Option<String>,

    /// Balance after the transaction.
    #[serde(default)]
    pub ending_balance_in_cents: Option<i64>,

    /// When the transaction was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Result of asking a transaction to refund itself.
#[derive(Debug, Clone, PartialEq)]
pub enum RefundOutcome {
    /// The owning subscription issued the refund.
    Refunded(Refund),
    /// Only payments can be refunded; nothing was sent.
    NotApplicable,
}

impl RefundOutcome {
    /// Whether a refund was issued.
    pub fn is_refunded(&self) -> bool {
        matches!(self, RefundOutcome::Refunded(_))
    }

    /// The refund record, if one was issued.
    pub fn refund(&self) -> Option<&Refund> {
        match self {
            RefundOutcome::Refunded(refund) => Some(refund),
            RefundOutcome::NotApplicable => None,
        }
    }
}

impl Transaction {
    /// Whether this transaction is a payment, and so refundable.
    pub fn is_payment(&self) -> bool {
        self.transaction_type == PAYMENT_TRANSACTION_TYPE
    }

    /// Refund the whole amount of this payment.
    ///
    /// Same as [`refund`](Self::refund) with `amount_in_cents` set to this
    /// transaction's amount.
    pub async fn full_refund(
        &self,
        client: &ChargifyClient,
        params: RefundParams,
    ) -> Result<RefundOutcome> {
        if !self.is_payment() {
            return Ok(RefundOutcome::NotApplicable);
        }

        let params = RefundParams {
            amount: None,
            amount_in_cents: Some(self.amount_in_cents),
            ..params
        };
        self.refund(client, params).await
    }

    /// Refund this payment through its owning subscription.
    ///
    /// Returns [`RefundOutcome::NotApplicable`] without any request unless
    /// the transaction is a payment. Otherwise the owning subscription is
    /// fetched again and asked to refund `params` with `payment_id` set to
    /// this transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ChargifyError::MissingId`] if the owning subscription is
    /// unknown, or any error from fetching it or issuing the refund.
    #[tracing::instrument(skip(self, client), fields(transaction_id = self.id))]
    pub async fn refund(
        &self,
        client: &ChargifyClient,
        params: RefundParams,
    ) -> Result<RefundOutcome> {
        if !self.is_payment() {
            tracing::debug!(
                transaction_type = %self.transaction_type,
                "Refund skipped for non-payment transaction"
            );
            return Ok(RefundOutcome::NotApplicable);
        }

        let subscription_id = self.subscription_id.ok_or(ChargifyError::MissingId {
            entity_type: Subscription::ENTITY_TYPE,
        })?;
        let params = RefundParams {
            payment_id: Some(self.id),
            ..params
        };

        let subscription = Subscription::find(client, &(), subscription_id).await?;
        let refund = subscription.refund(client, &params).await?;
        Ok(RefundOutcome::Refunded(refund))
    }
}

impl Resource for Transaction {
    const ENTITY_TYPE: &'static str = "Transaction";
    const ELEMENT: &'static str = "transaction";
    const COLLECTION: &'static str = "transactions";
    type Scope = SubscriptionScope;

    fn bind_scope(&mut self, scope: &SubscriptionScope) {
        self.subscription_id.get_or_insert(scope.subscription_id());
    }
}

/// Query parameters for listing a subscription's transactions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    /// Only transactions with an ID greater than or equal to this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since_id: Option<u64>,

    /// Only transactions with an ID less than or equal to this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_id: Option<u64>,

    /// Only transactions created on or after this date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since_date: Option<NaiveDate>,

    /// Only transactions created on or before this date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction(transaction_type: &str) -> Transaction {
        Transaction {
            id: 77,
            transaction_type: transaction_type.to_string(),
            amount_in_cents: 2500,
            subscription_id: Some(42),
            ..Default::default()
        }
    }

    fn offline_client() -> ChargifyClient {
        // Nothing listens here; a request would fail with an HTTP error.
        let config = crate::ChargifyConfig::new("acme", "key", "shared")
            .with_api_url("http://127.0.0.1:9");
        ChargifyClient::new(config).unwrap()
    }

    #[test]
    fn test_transaction_deserialize() {
        let json = r#"{
            "id": 77,
            "transaction_type": "payment",
            "amount_in_cents": 2500,
            "subscription_id": 42,
            "success": true,
            "memo": "Payment for: Pro plan"
        }"#;

        let transaction: Transaction =
            serde_json::from_str(json).expect("Failed to deserialize transaction");

        assert!(transaction.is_payment());
        assert_eq!(transaction.amount_in_cents, 2500);
        assert_eq!(transaction.subscription_id, Some(42));
    }

    #[tokio::test]
    async fn test_refund_of_non_payment_is_not_applicable() {
        let client = offline_client();

        for kind in ["charge", "credit", "refund", "adjustment"] {
            let outcome = transaction(kind)
                .refund(&client, RefundParams::default())
                .await
                .expect("non-payment refund must not touch the network");
            assert_eq!(outcome, RefundOutcome::NotApplicable);

            let outcome = transaction(kind)
                .full_refund(&client, RefundParams::default())
                .await
                .expect("non-payment refund must not touch the network");
            assert!(!outcome.is_refunded());
            assert!(outcome.refund().is_none());
        }
    }

    #[tokio::test]
    async fn test_refund_without_owner_is_missing_id() {
        let mut payment = transaction("payment");
        payment.subscription_id = None;

        let err = payment
            .refund(&offline_client(), RefundParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ChargifyError::MissingId { entity_type: "Subscription" }));
    }

    #[test]
    fn test_list_query_serialization() {
        let query = TransactionListQuery {
            since_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            pagination: PaginationParams::for_page(2, 20),
            ..Default::default()
        };
        let serialized = serde_qs::to_string(&query).expect("Failed to serialize query");

        assert!(serialized.contains("since_date=2024-01-01"));
        assert!(serialized.contains("page=2"));
        assert!(!serialized.contains("until_date"));
    }
}

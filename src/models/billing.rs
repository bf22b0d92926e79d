//! One-off billing operations on a subscription: charges, credits,
//! refunds and adjustments.
//!
//! Each operation has a parameter type that is sent wrapped in the
//! operation's root element (`{"charge": {...}}`) and a record type the
//! API answers with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Charges
// =============================================================================

/// Parameters for a one-time charge.
///
/// Set either `amount` (dollars, as a decimal string) or `amount_in_cents`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChargeParams {
    /// Amount in dollars, e.g. `"10.50"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,

    /// Amount in cents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_in_cents: Option<i64>,

    /// Description shown on the statement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,

    /// Add the charge to the balance instead of collecting it now.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accrue_charge: Option<bool>,
}

/// A one-time charge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    /// The charge ID.
    pub id: u64,

    /// Whether the charge was collected.
    #[serde(default)]
    pub success: Option<bool>,

    /// Charged amount.
    #[serde(default)]
    pub amount_in_cents: i64,

    /// Description shown on the statement.
    #[serde(default)]
    pub memo: Option<String>,

    /// Owning subscription.
    #[serde(default)]
    pub subscription_id: Option<u64>,

    /// Balance after the charge.
    #[serde(default)]
    pub ending_balance_in_cents: Option<i64>,

    /// When the charge was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Credits
// =============================================================================

/// Parameters for a one-time credit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreditParams {
    /// Amount in dollars, e.g. `"10.50"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,

    /// Amount in cents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_in_cents: Option<i64>,

    /// Description shown on the statement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// A one-time credit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credit {
    /// The credit ID.
    pub id: u64,

    /// Whether the credit was applied.
    #[serde(default)]
    pub success: Option<bool>,

    /// Credited amount.
    #[serde(default)]
    pub amount_in_cents: i64,

    /// Description shown on the statement.
    #[serde(default)]
    pub memo: Option<String>,

    /// Owning subscription.
    #[serde(default)]
    pub subscription_id: Option<u64>,

    /// Balance after the credit.
    #[serde(default)]
    pub ending_balance_in_cents: Option<i64>,

    /// When the credit was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Refunds
// =============================================================================

/// Parameters for refunding a payment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RefundParams {
    /// The payment transaction being refunded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<u64>,

    /// Amount in dollars, e.g. `"10.50"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,

    /// Amount in cents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_in_cents: Option<i64>,

    /// Reason for the refund.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// A refund of an earlier payment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Refund {
    /// The refund ID.
    pub id: u64,

    /// Whether the refund went through at the gateway.
    #[serde(default)]
    pub success: Option<bool>,

    /// Refunded amount.
    #[serde(default)]
    pub amount_in_cents: i64,

    /// The payment transaction that was refunded.
    #[serde(default)]
    pub payment_id: Option<u64>,

    /// Reason for the refund.
    #[serde(default)]
    pub memo: Option<String>,

    /// Owning subscription.
    #[serde(default)]
    pub subscription_id: Option<u64>,

    /// When the refund was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Adjustments
// =============================================================================

/// Parameters for a balance adjustment.
///
/// Positive amounts increase the balance owed, negative amounts decrease it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdjustmentParams {
    /// Amount in dollars, e.g. `"-5.00"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,

    /// Amount in cents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_in_cents: Option<i64>,

    /// Description shown on the statement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,

    /// `"target"` sets the balance to the amount instead of shifting it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment_method: Option<String>,
}

/// A balance adjustment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    /// The adjustment ID.
    pub id: u64,

    /// Whether the adjustment was applied.
    #[serde(default)]
    pub success: Option<bool>,

    /// Adjusted amount.
    #[serde(default)]
    pub amount_in_cents: i64,

    /// Description shown on the statement.
    #[serde(default)]
    pub memo: Option<String>,

    /// Owning subscription.
    #[serde(default)]
    pub subscription_id: Option<u64>,

    /// Balance after the adjustment.
    #[serde(default)]
    pub ending_balance_in_cents: Option<i64>,

    /// When the adjustment was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_params_skip_unset_amounts() {
        let params = ChargeParams {
            amount_in_cents: Some(1000),
            memo: Some("Setup fee".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["amount_in_cents"], 1000);
        assert_eq!(value["memo"], "Setup fee");
        assert!(value.get("amount").is_none());
        assert!(value.get("accrue_charge").is_none());
    }

    #[test]
    fn test_params_without_memo_send_no_memo() {
        let refund = serde_json::to_value(RefundParams {
            payment_id: Some(77),
            amount_in_cents: Some(2500),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(refund, serde_json::json!({ "payment_id": 77, "amount_in_cents": 2500 }));

        let adjustment = serde_json::to_value(AdjustmentParams::default()).unwrap();
        assert!(adjustment.get("memo").is_none());
    }

    #[test]
    fn test_refund_deserialize() {
        let json = r#"{
            "id": 901,
            "success": true,
            "amount_in_cents": 2500,
            "payment_id": 77,
            "memo": "Duplicate payment",
            "subscription_id": 42
        }"#;

        let refund: Refund = serde_json::from_str(json).expect("Failed to deserialize refund");

        assert_eq!(refund.id, 901);
        assert_eq!(refund.payment_id, Some(77));
        assert_eq!(refund.amount_in_cents, 2500);
        assert_eq!(refund.success, Some(true));
    }

    #[test]
    fn test_adjustment_deserialize_minimal() {
        let adjustment: Adjustment =
            serde_json::from_str(r#"{"id": 5}"#).expect("Failed to deserialize adjustment");
        assert_eq!(adjustment.id, 5);
        assert_eq!(adjustment.amount_in_cents, 0);
        assert!(adjustment.memo.is_none());
    }
}

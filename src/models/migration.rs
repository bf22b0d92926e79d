//! Product migration types.

use serde::{Deserialize, Serialize};

/// Parameters for moving a subscription to another product.
///
/// Identify the target with either `product_handle` or `product_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationParams {
    /// Handle of the target product.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_handle: Option<String>,

    /// ID of the target product.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u64>,

    /// Start the target product's trial, if it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_trial: Option<bool>,

    /// Charge the target product's initial charge, if it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_initial_charge: Option<bool>,

    /// Carry existing coupons over to the new product.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_coupons: Option<bool>,

    /// Keep the current billing period instead of starting a new one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_period: Option<bool>,
}

/// What a migration would cost, as computed by the preview endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationPreview {
    /// Prorated credit or charge for the unused part of the current period.
    #[serde(default)]
    pub prorated_adjustment_in_cents: i64,

    /// Amount that would be charged.
    #[serde(default)]
    pub charge_in_cents: i64,

    /// Amount due once credits are applied.
    #[serde(default)]
    pub payment_due_in_cents: i64,

    /// Existing credit that would be consumed.
    #[serde(default)]
    pub credit_applied_in_cents: i64,
}

impl MigrationPreview {
    /// Whether the migration would leave the customer with something to pay.
    pub fn requires_payment(&self) -> bool {
        self.payment_due_in_cents > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_only_send_set_fields() {
        let params = MigrationParams {
            product_handle: Some("pro".to_string()),
            include_coupons: Some(true),
            ..Default::default()
        };
        let body = serde_json::to_string(&params).unwrap();
        assert_eq!(body, r#"{"product_handle":"pro","include_coupons":true}"#);
    }

    #[test]
    fn test_preview_requires_payment() {
        let preview = MigrationPreview {
            prorated_adjustment_in_cents: -500,
            charge_in_cents: 2000,
            payment_due_in_cents: 1500,
            credit_applied_in_cents: 0,
        };
        assert!(preview.requires_payment());
        assert!(!MigrationPreview::default().requires_payment());
    }
}

//! Credit card (payment profile) types.

use serde::{Deserialize, Serialize};

/// The payment profile attached to a subscription.
///
/// Read-only: the API embeds it in subscription responses and rejects it
/// in update payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditCard {
    /// The payment profile ID.
    pub id: u64,

    /// Cardholder first name.
    #[serde(default)]
    pub first_name: Option<String>,

    /// Cardholder last name.
    #[serde(default)]
    pub last_name: Option<String>,

    /// Card number with all but the last four digits masked.
    #[serde(default)]
    pub masked_card_number: Option<String>,

    /// Card brand (e.g., "visa", "master").
    #[serde(default)]
    pub card_type: Option<String>,

    /// Expiration month (1-12).
    #[serde(default)]
    pub expiration_month: Option<u32>,

    /// Expiration year.
    #[serde(default)]
    pub expiration_year: Option<u32>,
}

/// Card details sent when creating a subscription.
#[derive(Clone, Default, PartialEq, Serialize)]
pub struct CreditCardAttributes {
    /// Full card number.
    pub full_number: String,

    /// Expiration month (1-12).
    pub expiration_month: u32,

    /// Expiration year.
    pub expiration_year: u32,

    /// Card verification value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,

    /// Billing ZIP or postal code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_zip: Option<String>,
}

impl std::fmt::Debug for CreditCardAttributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreditCardAttributes")
            .field("expiration_month", &self.expiration_month)
            .field("expiration_year", &self.expiration_year)
            .finish_non_exhaustive()
    }
}

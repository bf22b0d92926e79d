//! Product projection embedded in subscriptions.

use serde::{Deserialize, Serialize};

/// The product a subscription is on.
///
/// Read-only: the API embeds it in subscription responses and rejects it
/// in update payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// The product ID.
    pub id: u64,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// API handle, used to select the product on signup and migration.
    #[serde(default)]
    pub handle: Option<String>,

    /// Recurring price.
    #[serde(default)]
    pub price_in_cents: Option<i64>,

    /// Length of the billing interval, in `interval_unit`s.
    #[serde(default)]
    pub interval: Option<u32>,

    /// Unit of the billing interval (`month` or `day`).
    #[serde(default)]
    pub interval_unit: Option<String>,
}

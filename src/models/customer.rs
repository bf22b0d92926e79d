//! Customer model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ChargifyClient;
use crate::envelope;
use crate::error::Result;
use crate::traits::Resource;

/// A Chargify customer.
///
/// Subscriptions embed a read-only copy of their customer; see
/// [`Subscription::customer`](crate::Subscription::customer).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// The customer ID.
    pub id: u64,

    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,

    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,

    /// Email address.
    #[serde(default)]
    pub email: Option<String>,

    /// Organization or company name.
    #[serde(default)]
    pub organization: Option<String>,

    /// Reference to the customer in the merchant's own system.
    #[serde(default)]
    pub reference: Option<String>,

    /// When the customer was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// When the customer was last updated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// Full name, if either part is known.
    pub fn full_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(name), None) | (None, Some(name)) => Some(name.to_string()),
            (None, None) => None,
        }
    }

    /// Look up a customer by the merchant's own reference.
    ///
    /// # Errors
    ///
    /// Returns [`ChargifyError::NotFound`](crate::ChargifyError::NotFound)
    /// if no customer carries `reference`.
    #[tracing::instrument(skip(client))]
    pub async fn find_by_reference(client: &ChargifyClient, reference: &str) -> Result<Self> {
        let response = client
            .get_with_query("customers/lookup.json", &[("reference", reference)])
            .await
            .map_err(|e| e.or_not_found(Self::ENTITY_TYPE, reference))?;
        let value = ChargifyClient::read_value(response).await?;
        envelope::decode_one(value, Self::ELEMENT)
    }
}

impl Resource for Customer {
    const ENTITY_TYPE: &'static str = "Customer";
    const ELEMENT: &'static str = "customer";
    const COLLECTION: &'static str = "customers";
    type Scope = ();
}

/// Customer details sent when creating a subscription for a new customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomerAttributes {
    /// First name.
    pub first_name: String,

    /// Last name.
    pub last_name: String,

    /// Email address.
    pub email: String,

    /// Organization or company name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    /// Reference to the customer in the merchant's own system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_deserialize() {
        let json = r#"{
            "id": 7,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "reference": "cust-7",
            "created_at": "2024-01-15T10:30:00-05:00"
        }"#;

        let customer: Customer = serde_json::from_str(json).expect("Failed to deserialize customer");

        assert_eq!(customer.id, 7);
        assert_eq!(customer.reference.as_deref(), Some("cust-7"));
        assert_eq!(customer.full_name().as_deref(), Some("Ada Lovelace"));
        assert!(customer.created_at.is_some());
        assert!(customer.organization.is_none());
    }

    #[test]
    fn test_full_name_partial() {
        let customer = Customer {
            id: 1,
            last_name: Some("Hopper".to_string()),
            ..Default::default()
        };
        assert_eq!(customer.full_name().as_deref(), Some("Hopper"));
        assert!(Customer::default().full_name().is_none());
    }

    #[test]
    fn test_customer_attributes_skip_empty_optionals() {
        let attrs = CustomerAttributes {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&attrs).unwrap();
        assert!(value.get("organization").is_none());
        assert!(value.get("reference").is_none());
        assert_eq!(value["email"], "ada@example.com");
    }
}

//! Subscription statement model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::{Resource, SubscriptionScope};

/// A billing-period statement for a subscription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// The statement ID.
    pub id: u64,

    /// Owning subscription.
    #[serde(default)]
    pub subscription_id: u64,

    /// Start of the statement period.
    #[serde(default)]
    pub opened_at: Option<DateTime<Utc>>,

    /// End of the statement period.
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,

    /// When the statement was paid off.
    #[serde(default)]
    pub settled_at: Option<DateTime<Utc>>,

    /// Balance carried into the period.
    #[serde(default)]
    pub starting_balance_in_cents: i64,

    /// Balance at the end of the period.
    #[serde(default)]
    pub ending_balance_in_cents: i64,

    /// Total charged during the period.
    #[serde(default)]
    pub total_in_cents: i64,

    /// Total paid during the period.
    #[serde(default)]
    pub paid_amount_in_cents: i64,
}

impl Statement {
    /// Whether the statement has been paid off.
    pub fn is_settled(&self) -> bool {
        self.settled_at.is_some()
    }
}

impl Resource for Statement {
    const ENTITY_TYPE: &'static str = "Statement";
    const ELEMENT: &'static str = "statement";
    const COLLECTION: &'static str = "statements";
    type Scope = SubscriptionScope;

    // A statement that names its owner keeps it, so a foreign one stays detectable.
    fn bind_scope(&mut self, scope: &SubscriptionScope) {
        if self.subscription_id == 0 {
            self.subscription_id = scope.subscription_id();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope;

    #[test]
    fn test_statement_deserialize() {
        let json = r#"{
            "id": 555,
            "subscription_id": 42,
            "opened_at": "2024-01-01T00:00:00Z",
            "closed_at": "2024-02-01T00:00:00Z",
            "settled_at": "2024-02-01T00:00:03Z",
            "total_in_cents": 4900,
            "paid_amount_in_cents": 4900
        }"#;

        let statement: Statement =
            serde_json::from_str(json).expect("Failed to deserialize statement");

        assert_eq!(statement.id, 555);
        assert_eq!(statement.subscription_id, 42);
        assert!(statement.is_settled());
        assert_eq!(statement.starting_balance_in_cents, 0);
    }

    #[test]
    fn test_statement_decodes_wrapped() {
        let value = serde_json::json!({"statement": {"id": 1, "subscription_id": 2}});
        let statement: Statement = envelope::decode_one(value, Statement::ELEMENT).unwrap();
        assert_eq!(statement.subscription_id, 2);
        assert!(!statement.is_settled());
    }

    #[test]
    fn test_bind_scope_fills_missing_owner_only() {
        let scope = SubscriptionScope(42);

        let mut bare: Statement = serde_json::from_str(r#"{"id": 500}"#).unwrap();
        bare.bind_scope(&scope);
        assert_eq!(bare.subscription_id, 42);

        let mut foreign = Statement {
            id: 600,
            subscription_id: 43,
            ..Default::default()
        };
        foreign.bind_scope(&scope);
        assert_eq!(foreign.subscription_id, 43);
    }
}

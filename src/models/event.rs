//! Subscription event model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pagination::PaginationParams;
use crate::traits::{Resource, SubscriptionScope};

/// Something that happened to a subscription (signup, renewal, state change, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// The event ID.
    pub id: u64,

    /// Event key (e.g., "renewal_success", "subscription_state_change").
    #[serde(default)]
    pub key: Option<String>,

    /// Human-readable description.
    #[serde(default)]
    pub message: Option<String>,

    /// Owning subscription.
    #[serde(default)]
    pub subscription_id: Option<u64>,

    /// When the event happened.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Key-specific payload.
    #[serde(default)]
    pub event_specific_data: Option<serde_json::Value>,
}

impl Resource for Event {
    const ENTITY_TYPE: &'static str = "Event";
    const ELEMENT: &'static str = "event";
    const COLLECTION: &'static str = "events";
    type Scope = SubscriptionScope;

    fn bind_scope(&mut self, scope: &SubscriptionScope) {
        self.subscription_id.get_or_insert(scope.subscription_id());
    }
}

/// Query parameters for listing a subscription's events.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    /// Only events with an ID greater than or equal to this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since_id: Option<u64>,

    /// Only events with an ID less than or equal to this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_id: Option<u64>,

    /// Sort direction, "asc" or "desc".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

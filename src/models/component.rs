//! Subscription component model.

use serde::{Deserialize, Serialize};

use crate::pagination::PaginationParams;
use crate::traits::{Resource, SubscriptionScope};

/// A component (metered, quantity-based or on/off add-on) attached to a
/// subscription.
///
/// Components always exist on the product already; this client reads them
/// but never creates them. The API identifies them by `component_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// The component definition ID.
    pub component_id: u64,

    /// Owning subscription.
    #[serde(default)]
    pub subscription_id: Option<u64>,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Component kind (e.g., "metered_component", "quantity_based_component", "on_off_component").
    #[serde(default)]
    pub kind: Option<String>,

    /// Unit label (e.g., "seat", "GB").
    #[serde(default)]
    pub unit_name: Option<String>,

    /// Usage balance for metered components.
    #[serde(default)]
    pub unit_balance: Option<i64>,

    /// Allocated quantity for quantity-based components.
    #[serde(default)]
    pub allocated_quantity: Option<i64>,

    /// Whether an on/off component is switched on.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Pricing scheme (e.g., "per_unit", "tiered").
    #[serde(default)]
    pub pricing_scheme: Option<String>,
}

impl Component {
    /// The component's identity, which is its `component_id`.
    pub fn id(&self) -> u64 {
        self.component_id
    }
}

impl Resource for Component {
    const ENTITY_TYPE: &'static str = "Component";
    const ELEMENT: &'static str = "component";
    const COLLECTION: &'static str = "components";
    type Scope = SubscriptionScope;

    fn bind_scope(&mut self, scope: &SubscriptionScope) {
        self.subscription_id.get_or_insert(scope.subscription_id());
    }
}

/// Query parameters for listing a subscription's components.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComponentListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    /// Sort field (e.g., "updated_at").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,

    /// Sort direction, "asc" or "desc".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_component_id() {
        let component: Component = serde_json::from_str(
            r#"{"component_id": 314, "subscription_id": 42, "name": "Seats", "allocated_quantity": 5}"#,
        )
        .expect("Failed to deserialize component");

        assert_eq!(component.id(), 314);
        assert_eq!(component.subscription_id, Some(42));
        assert_eq!(component.allocated_quantity, Some(5));
    }

    #[test]
    fn test_paths_are_scoped() {
        let scope = SubscriptionScope(42);
        assert_eq!(Component::collection_path(&scope), "subscriptions/42/components");
        assert_eq!(Component::path_for(&scope, 314), "subscriptions/42/components/314");
    }

    #[test]
    fn test_list_query_serialization() {
        let query = ComponentListQuery {
            pagination: PaginationParams::for_page(1, 50),
            direction: Some("desc".to_string()),
            ..Default::default()
        };
        let serialized = serde_qs::to_string(&query).expect("Failed to serialize query");

        assert!(serialized.contains("page=1"));
        assert!(serialized.contains("per_page=50"));
        assert!(serialized.contains("direction=desc"));
        assert!(!serialized.contains("sort"));
    }
}

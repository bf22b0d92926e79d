//! Handlers for records nested under a subscription.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{not_found, parse_id, wrapped, wrapped_list};
use crate::mock_server::state::MockState;

/// Query parameters shared by the nested list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct NestedListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub since_id: Option<u64>,
    pub max_id: Option<u64>,
}

impl NestedListQuery {
    fn keeps(&self, id: u64) -> bool {
        self.since_id.map_or(true, |since| id >= since) && self.max_id.map_or(true, |max| id <= max)
    }

    fn paginate<T>(&self, items: Vec<T>) -> Vec<T> {
        let per_page = self.per_page.unwrap_or(20).max(1) as usize;
        let page = self.page.unwrap_or(1).max(1) as usize;
        items
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect()
    }
}

/// GET /subscriptions/{id}/components.json
pub async fn list_components(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(raw_id): Path<String>,
) -> Response {
    let state = state.read().await;
    let Some(id) = parse_id(&raw_id).filter(|id| state.get_subscription(*id).is_some()) else {
        return not_found("Subscription", &raw_id);
    };

    let components: Vec<_> = state.components.get(&id).into_iter().flatten().collect();
    wrapped_list("component", &components)
}

/// GET /subscriptions/{id}/components/{component_id}.json
pub async fn get_component(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((raw_id, raw_component_id)): Path<(String, String)>,
) -> Response {
    let state = state.read().await;
    let component = parse_id(&raw_id)
        .zip(parse_id(&raw_component_id))
        .and_then(|(id, component_id)| {
            state
                .components
                .get(&id)?
                .iter()
                .find(|c| c.component_id == component_id)
        });

    match component {
        Some(component) => wrapped("component", component),
        None => not_found("Component", &raw_component_id),
    }
}

/// GET /subscriptions/{id}/events.json
///
/// Newest first.
pub async fn list_events(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(raw_id): Path<String>,
    Query(query): Query<NestedListQuery>,
) -> Response {
    let state = state.read().await;
    let Some(id) = parse_id(&raw_id).filter(|id| state.get_subscription(*id).is_some()) else {
        return not_found("Subscription", &raw_id);
    };

    let mut events: Vec<_> = state
        .events
        .get(&id)
        .into_iter()
        .flatten()
        .filter(|e| query.keeps(e.id))
        .collect();
    events.sort_by(|a, b| b.id.cmp(&a.id));
    wrapped_list("event", &query.paginate(events))
}

/// GET /subscriptions/{id}/statements.json
pub async fn list_statements(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(raw_id): Path<String>,
    Query(query): Query<NestedListQuery>,
) -> Response {
    let state = state.read().await;
    let Some(id) = parse_id(&raw_id).filter(|id| state.get_subscription(*id).is_some()) else {
        return not_found("Subscription", &raw_id);
    };

    wrapped_list("statement", &query.paginate(state.list_statements(id)))
}

/// GET /subscriptions/{id}/statements/{statement_id}.json
///
/// A statement owned by another subscription is not found.
pub async fn get_statement(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((raw_id, raw_statement_id)): Path<(String, String)>,
) -> Response {
    let state = state.read().await;
    let statement = parse_id(&raw_id)
        .zip(parse_id(&raw_statement_id))
        .and_then(|(id, statement_id)| {
            state
                .get_statement(statement_id)
                .filter(|s| s.subscription_id == id)
        });

    match statement {
        Some(statement) => wrapped("statement", statement),
        None => not_found("Statement", &raw_statement_id),
    }
}

/// GET /subscriptions/{id}/transactions.json
pub async fn list_transactions(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(raw_id): Path<String>,
    Query(query): Query<NestedListQuery>,
) -> Response {
    let state = state.read().await;
    let Some(id) = parse_id(&raw_id).filter(|id| state.get_subscription(*id).is_some()) else {
        return not_found("Subscription", &raw_id);
    };

    let transactions: Vec<_> = state
        .list_transactions(id)
        .into_iter()
        .filter(|t| query.keeps(t.id))
        .collect();
    wrapped_list("transaction", &query.paginate(transactions))
}

//! Customer endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{not_found, parse_id, wrapped};
use crate::mock_server::state::MockState;

/// Query parameters for the reference lookup.
#[derive(Debug, Default, Deserialize)]
pub struct LookupQuery {
    pub reference: Option<String>,
}

/// GET /customers/lookup.json?reference=...
pub async fn lookup_customer(
    State(state): State<Arc<RwLock<MockState>>>,
    Query(query): Query<LookupQuery>,
) -> Response {
    let reference = query.reference.unwrap_or_default();
    let state = state.read().await;

    match state.find_customer_by_reference(&reference) {
        Some(customer) => wrapped("customer", customer),
        None => not_found("Customer", &reference),
    }
}

/// GET /customers/{id}.json
pub async fn get_customer(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(raw_id): Path<String>,
) -> Response {
    let state = state.read().await;
    match parse_id(&raw_id).and_then(|id| state.customers.get(&id)) {
        Some(customer) => wrapped("customer", customer),
        None => not_found("Customer", &raw_id),
    }
}

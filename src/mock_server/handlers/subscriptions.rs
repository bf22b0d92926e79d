//! Subscription endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{not_found, parse_id, unprocessable, wrapped, wrapped_list};
use crate::mock_server::state::MockState;
use crate::{MigrationPreview, Subscription};

/// Keys the API refuses in a subscription update.
const READ_ONLY_KEYS: [&str; 3] = ["customer", "product", "credit_card"];

/// Query parameters for listing subscriptions.
#[derive(Debug, Default, Deserialize)]
pub struct ListSubscriptionsQuery {
    pub customer_id: Option<u64>,
}

/// Writable subscription fields.
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionBody {
    pub product_handle: Option<String>,
    pub product_id: Option<u64>,
    pub customer_id: Option<u64>,
    pub customer_reference: Option<String>,
    pub payment_collection_method: Option<String>,
    pub coupon_code: Option<String>,
    pub cancel_at_end_of_period: Option<bool>,
    pub cancellation_message: Option<String>,
}

/// Body of charge, credit and adjustment requests.
#[derive(Debug, Default, Deserialize)]
pub struct AmountBody {
    pub amount: Option<String>,
    pub amount_in_cents: Option<i64>,
    pub memo: Option<String>,
    pub adjustment_method: Option<String>,
}

/// Body of refund requests.
#[derive(Debug, Default, Deserialize)]
pub struct RefundBody {
    pub payment_id: Option<u64>,
    pub amount: Option<String>,
    pub amount_in_cents: Option<i64>,
    pub memo: Option<String>,
}

/// Body of migration requests.
#[derive(Debug, Default, Deserialize)]
pub struct MigrationBody {
    pub product_handle: Option<String>,
    pub product_id: Option<u64>,
}

/// Query parameters for reactivation.
#[derive(Debug, Default, Deserialize)]
pub struct ReactivateQuery {
    pub preserve_balance: Option<bool>,
    pub coupon_code: Option<String>,
}

/// Query parameters for coupon actions.
#[derive(Debug, Default, Deserialize)]
pub struct CouponQuery {
    pub code: Option<String>,
}

/// Pull the `element` record out of a request body.
fn root<T: DeserializeOwned>(body: &Value, element: &str) -> Result<T, Response> {
    let inner = body
        .get(element)
        .cloned()
        .ok_or_else(|| unprocessable(&format!("Missing {element} element")))?;
    serde_json::from_value(inner).map_err(|e| unprocessable(&e.to_string()))
}

/// Resolve an amount given either in dollars or in cents.
fn cents(amount: Option<&str>, amount_in_cents: Option<i64>) -> Option<i64> {
    amount_in_cents.or_else(|| {
        let dollars: f64 = amount?.trim().parse().ok()?;
        Some((dollars * 100.0).round() as i64)
    })
}

/// GET /subscriptions.json
pub async fn list_subscriptions(
    State(state): State<Arc<RwLock<MockState>>>,
    Query(query): Query<ListSubscriptionsQuery>,
) -> impl IntoResponse {
    let state = state.read().await;
    wrapped_list("subscription", &state.list_subscriptions(query.customer_id))
}

/// POST /subscriptions.json
pub async fn create_subscription(
    State(state): State<Arc<RwLock<MockState>>>,
    Json(body): Json<Value>,
) -> Response {
    let attrs: SubscriptionBody = match root(&body, "subscription") {
        Ok(attrs) => attrs,
        Err(response) => return response,
    };

    let mut state = state.write().await;

    let customer_id = match (attrs.customer_id, attrs.customer_reference.as_deref()) {
        (Some(id), _) => state.customers.get(&id).map(|c| c.id),
        (None, Some(reference)) => state.find_customer_by_reference(reference).map(|c| c.id),
        (None, None) => None,
    };
    let Some(customer_id) = customer_id else {
        return unprocessable("A customer must be specified");
    };
    let product = state
        .find_product(attrs.product_handle.as_deref(), attrs.product_id)
        .cloned();
    let Some(product) = product else {
        return unprocessable("A product must be specified");
    };

    let id = state.next_id();
    let subscription = Subscription {
        id: Some(id),
        state: Some("active".to_string()),
        balance_in_cents: Some(0),
        product_price_in_cents: product.price_in_cents,
        payment_collection_method: attrs.payment_collection_method,
        coupon_code: attrs.coupon_code,
        customer_id: Some(customer_id),
        customer_reference: attrs.customer_reference,
        product_handle: product.handle.clone(),
        customer: state.customers.get(&customer_id).cloned(),
        product: Some(product),
        ..Default::default()
    };
    state.subscriptions.insert(id, subscription.clone());

    let mut response = wrapped("subscription", &subscription);
    *response.status_mut() = StatusCode::CREATED;
    response
}

/// GET /subscriptions/{id}.json
pub async fn get_subscription(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(raw_id): Path<String>,
) -> Response {
    let state = state.read().await;
    match parse_id(&raw_id).and_then(|id| state.get_subscription(id)) {
        Some(subscription) => wrapped("subscription", subscription),
        None => not_found("Subscription", &raw_id),
    }
}

/// PUT /subscriptions/{id}.json
///
/// Rejects bodies carrying the embedded customer, product or card.
pub async fn update_subscription(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(raw_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(record) = body.get("subscription").and_then(Value::as_object) {
        if let Some(key) = READ_ONLY_KEYS.iter().find(|k| record.contains_key(**k)) {
            return unprocessable(&format!("{key} cannot be updated through a subscription"));
        }
    }
    let attrs: SubscriptionBody = match root(&body, "subscription") {
        Ok(attrs) => attrs,
        Err(response) => return response,
    };

    let mut state = state.write().await;
    let Some(subscription) = parse_id(&raw_id).and_then(|id| state.subscriptions.get_mut(&id))
    else {
        return not_found("Subscription", &raw_id);
    };

    if let Some(method) = attrs.payment_collection_method {
        subscription.payment_collection_method = Some(method);
    }
    if let Some(code) = attrs.coupon_code {
        subscription.coupon_code = Some(code);
    }
    if let Some(flag) = attrs.cancel_at_end_of_period {
        subscription.cancel_at_end_of_period = Some(flag);
    }
    if let Some(message) = attrs.cancellation_message {
        subscription.cancellation_message = Some(message);
    }

    wrapped("subscription", subscription)
}

/// DELETE /subscriptions/{id}.json
pub async fn cancel_subscription(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(raw_id): Path<String>,
) -> Response {
    let mut state = state.write().await;
    match parse_id(&raw_id).and_then(|id| state.subscriptions.get_mut(&id)) {
        Some(subscription) => {
            subscription.state = Some("canceled".to_string());
            wrapped("subscription", subscription)
        }
        None => not_found("Subscription", &raw_id),
    }
}

/// POST /subscriptions/{id}/charges.json
pub async fn create_charge(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(raw_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let params: AmountBody = match root(&body, "charge") {
        Ok(params) => params,
        Err(response) => return response,
    };
    let Some(amount) = cents(params.amount.as_deref(), params.amount_in_cents) else {
        return unprocessable("Amount: is not a number.");
    };

    let mut state = state.write().await;
    match parse_id(&raw_id).and_then(|id| state.record_charge(id, amount, params.memo)) {
        Some(charge) => wrapped("charge", &charge),
        None => not_found("Subscription", &raw_id),
    }
}

/// POST /subscriptions/{id}/credits.json
pub async fn create_credit(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(raw_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let params: AmountBody = match root(&body, "credit") {
        Ok(params) => params,
        Err(response) => return response,
    };
    let Some(amount) = cents(params.amount.as_deref(), params.amount_in_cents) else {
        return unprocessable("Amount: is not a number.");
    };

    let mut state = state.write().await;
    match parse_id(&raw_id).and_then(|id| state.record_credit(id, amount, params.memo)) {
        Some(credit) => wrapped("credit", &credit),
        None => not_found("Subscription", &raw_id),
    }
}

/// POST /subscriptions/{id}/refunds.json
pub async fn create_refund(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(raw_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let params: RefundBody = match root(&body, "refund") {
        Ok(params) => params,
        Err(response) => return response,
    };
    let Some(payment_id) = params.payment_id else {
        return unprocessable("Payment: cannot be blank.");
    };
    let Some(id) = parse_id(&raw_id) else {
        return not_found("Subscription", &raw_id);
    };

    let mut state = state.write().await;
    if state.get_subscription(id).is_none() {
        return not_found("Subscription", &raw_id);
    }
    let amount = cents(params.amount.as_deref(), params.amount_in_cents);
    match state.record_refund(id, payment_id, amount, params.memo) {
        Some(refund) => wrapped("refund", &refund),
        None => unprocessable("Payment: is not a payment of this subscription."),
    }
}

/// POST /subscriptions/{id}/adjustments.json
pub async fn create_adjustment(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(raw_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let params: AmountBody = match root(&body, "adjustment") {
        Ok(params) => params,
        Err(response) => return response,
    };
    let Some(amount) = cents(params.amount.as_deref(), params.amount_in_cents) else {
        return unprocessable("Amount: is not a number.");
    };
    let target = params.adjustment_method.as_deref() == Some("target");

    let mut state = state.write().await;
    match parse_id(&raw_id).and_then(|id| state.record_adjustment(id, amount, target, params.memo))
    {
        Some(adjustment) => wrapped("adjustment", &adjustment),
        None => not_found("Subscription", &raw_id),
    }
}

/// PUT /subscriptions/{id}/reactivate.json
pub async fn reactivate_subscription(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(raw_id): Path<String>,
    Query(query): Query<ReactivateQuery>,
) -> Response {
    let mut state = state.write().await;
    let Some(subscription) = parse_id(&raw_id).and_then(|id| state.subscriptions.get_mut(&id))
    else {
        return not_found("Subscription", &raw_id);
    };

    if subscription.is_active() {
        return unprocessable("Cannot reactivate a subscription that is not marked \"Canceled\"");
    }
    subscription.state = Some("active".to_string());
    if !query.preserve_balance.unwrap_or(false) {
        subscription.balance_in_cents = Some(0);
    }
    if let Some(code) = query.coupon_code {
        subscription.coupon_code = Some(code);
    }

    wrapped("subscription", subscription)
}

/// PUT /subscriptions/{id}/reset_balance.json
pub async fn reset_balance(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(raw_id): Path<String>,
) -> Response {
    let mut state = state.write().await;
    match parse_id(&raw_id).and_then(|id| state.subscriptions.get_mut(&id)) {
        Some(subscription) => {
            subscription.balance_in_cents = Some(0);
            StatusCode::OK.into_response()
        }
        None => not_found("Subscription", &raw_id),
    }
}

/// POST /subscriptions/{id}/migrations.json
pub async fn create_migration(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(raw_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let params: MigrationBody = match root(&body, "migration") {
        Ok(params) => params,
        Err(response) => return response,
    };

    let mut state = state.write().await;
    let Some(product) = state
        .find_product(params.product_handle.as_deref(), params.product_id)
        .cloned()
    else {
        return unprocessable("Product: must be specified.");
    };
    let Some(subscription) = parse_id(&raw_id).and_then(|id| state.subscriptions.get_mut(&id))
    else {
        return not_found("Subscription", &raw_id);
    };

    subscription.product_handle = product.handle.clone();
    subscription.product_price_in_cents = product.price_in_cents;
    subscription.product = Some(product);

    wrapped("subscription", subscription)
}

/// POST /subscriptions/{id}/migrations/preview.json
///
/// The cost is the price difference between the two products, minus any
/// credit already on the balance.
pub async fn preview_migration(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(raw_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let params: MigrationBody = match root(&body, "migration") {
        Ok(params) => params,
        Err(response) => return response,
    };

    let state = state.read().await;
    let Some(subscription) = parse_id(&raw_id).and_then(|id| state.get_subscription(id)) else {
        return not_found("Subscription", &raw_id);
    };
    let Some(product) = state.find_product(params.product_handle.as_deref(), params.product_id)
    else {
        return unprocessable("Product: must be specified.");
    };

    let current = subscription.product_price_in_cents.unwrap_or(0);
    let prorated = product.price_in_cents.unwrap_or(0) - current;
    let charge = prorated.max(0);
    let credit = (-subscription.balance_in_cents.unwrap_or(0)).max(0).min(charge);

    let preview = MigrationPreview {
        prorated_adjustment_in_cents: prorated,
        charge_in_cents: charge,
        payment_due_in_cents: charge - credit,
        credit_applied_in_cents: credit,
    };
    wrapped("migration", &preview)
}

/// POST /subscriptions/{id}/add_coupon.json
pub async fn add_coupon(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(raw_id): Path<String>,
    Query(query): Query<CouponQuery>,
) -> Response {
    let Some(code) = query.code else {
        return unprocessable("Coupon code: cannot be blank.");
    };

    let mut state = state.write().await;
    match parse_id(&raw_id).and_then(|id| state.subscriptions.get_mut(&id)) {
        Some(subscription) => {
            subscription.coupon_code = Some(code);
            wrapped("subscription", subscription)
        }
        None => not_found("Subscription", &raw_id),
    }
}

/// DELETE /subscriptions/{id}/remove_coupon.json
///
/// Without a `code` every coupon is removed.
pub async fn remove_coupon(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(raw_id): Path<String>,
    Query(query): Query<CouponQuery>,
) -> Response {
    let mut state = state.write().await;
    let Some(subscription) = parse_id(&raw_id).and_then(|id| state.subscriptions.get_mut(&id))
    else {
        return not_found("Subscription", &raw_id);
    };

    match query.code {
        Some(code) if subscription.coupon_code.as_deref() != Some(code.as_str()) => {
            unprocessable(&format!("Coupon {code} is not applied"))
        }
        _ => {
            subscription.coupon_code = None;
            (StatusCode::OK, "Coupon successfully removed").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cents_prefers_cents_then_dollars() {
        assert_eq!(cents(Some("1.00"), Some(250)), Some(250));
        assert_eq!(cents(Some("10.50"), None), Some(1050));
        assert_eq!(cents(Some("-5"), None), Some(-500));
        assert_eq!(cents(Some("ten"), None), None);
        assert_eq!(cents(None, None), None);
    }

    #[test]
    fn test_root_requires_element() {
        let body = serde_json::json!({ "charge": { "amount_in_cents": 100 } });
        let parsed: AmountBody = root(&body, "charge").unwrap();
        assert_eq!(parsed.amount_in_cents, Some(100));

        let missing = root::<AmountBody>(&body, "credit").unwrap_err();
        assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

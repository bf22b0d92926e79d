//! HTTP request handlers for the mock server.

pub mod customers;
pub mod nested;
pub mod subscriptions;

pub use customers::*;
pub use nested::*;
pub use subscriptions::*;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;

/// Parse a path id, with or without the `.json` format suffix.
pub(crate) fn parse_id(raw: &str) -> Option<u64> {
    raw.strip_suffix(".json").unwrap_or(raw).parse().ok()
}

/// 200 with `value` wrapped in its root element.
pub(crate) fn wrapped<T: Serialize>(element: &str, value: &T) -> Response {
    let mut root = serde_json::Map::new();
    root.insert(
        element.to_string(),
        serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
    );
    (StatusCode::OK, Json(serde_json::Value::Object(root))).into_response()
}

/// 200 with every item wrapped in its root element.
pub(crate) fn wrapped_list<T: Serialize>(element: &str, items: &[&T]) -> Response {
    let items: Vec<serde_json::Value> = items
        .iter()
        .map(|item| serde_json::json!({ element: item }))
        .collect();
    (StatusCode::OK, Json(items)).into_response()
}

/// 404 in the API's error shape.
pub(crate) fn not_found(entity: &str, id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "errors": [format!("{entity} {id} not found")]
        })),
    )
        .into_response()
}

/// 422 in the API's error shape.
pub(crate) fn unprocessable(message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({ "errors": [message] })),
    )
        .into_response()
}

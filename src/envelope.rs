//! Root element wrapping for request and response bodies.
//!
//! Chargify wraps every record in an object keyed by its element name:
//! `{"subscription": {...}}` for a single record and
//! `[{"subscription": {...}}, ...]` for collections. Request bodies use the
//! same shape with the element name of the action (`charge`, `refund`, ...).

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// Wrap `attrs` under a single `element` key.
pub(crate) fn wrap_root<T: Serialize + ?Sized>(element: &str, attrs: &T) -> Result<Value> {
    let mut root = Map::new();
    root.insert(element.to_string(), serde_json::to_value(attrs)?);
    Ok(Value::Object(root))
}

/// Strip a single `element` key if present, otherwise return the value as is.
pub(crate) fn unwrap_root(value: Value, element: &str) -> Value {
    match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key(element) => {
            map.remove(element).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Decode one record that may or may not be root-wrapped.
pub(crate) fn decode_one<T: DeserializeOwned>(value: Value, element: &str) -> Result<T> {
    Ok(serde_json::from_value(unwrap_root(value, element))?)
}

/// Decode a collection whose items may or may not be root-wrapped.
pub(crate) fn decode_many<T: DeserializeOwned>(value: Value, element: &str) -> Result<Vec<T>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    };

    items
        .into_iter()
        .map(|item| decode_one(item, element))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        id: u64,
    }

    #[test]
    fn test_wrap_root() {
        let body = wrap_root("charge", &json!({"amount": "1.00"})).unwrap();
        assert_eq!(body, json!({"charge": {"amount": "1.00"}}));
    }

    #[test]
    fn test_decode_one_wrapped_and_bare() {
        let wrapped: Thing = decode_one(json!({"thing": {"id": 1}}), "thing").unwrap();
        let bare: Thing = decode_one(json!({"id": 2}), "thing").unwrap();
        assert_eq!(wrapped, Thing { id: 1 });
        assert_eq!(bare, Thing { id: 2 });
    }

    #[test]
    fn test_unwrap_root_leaves_other_keys() {
        let value = json!({"thing": {"id": 1}, "extra": true});
        assert_eq!(unwrap_root(value.clone(), "thing"), value);
    }

    #[test]
    fn test_decode_many() {
        let items: Vec<Thing> =
            decode_many(json!([{"thing": {"id": 1}}, {"id": 2}]), "thing").unwrap();
        assert_eq!(items, vec![Thing { id: 1 }, Thing { id: 2 }]);

        let empty: Vec<Thing> = decode_many(Value::Null, "thing").unwrap();
        assert!(empty.is_empty());
    }
}

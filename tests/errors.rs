//! Error mapping and authentication tests.

use chargify::{ChargifyClient, ChargifyConfig, ChargifyError, Find, Persist, Subscription};
use serde_json::json;
use wiremock::matchers::{basic_auth, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ChargifyClient {
    let config = ChargifyConfig::new("acme", "test-key", "shared").with_api_url(&server.uri());
    ChargifyClient::new(config).unwrap()
}

#[tokio::test]
async fn test_requests_carry_basic_auth_and_accept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions/42.json"))
        .and(basic_auth("test-key", "X"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "subscription": { "id": 42 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let subscription = Subscription::find(&client_for(&mock_server), &(), 42)
        .await
        .unwrap();
    assert_eq!(subscription.id, Some(42));
}

#[tokio::test]
async fn test_404_maps_to_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions/999.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = Subscription::find(&client_for(&mock_server), &(), 999)
        .await
        .unwrap_err();

    match err {
        ChargifyError::NotFound { entity_type, id } => {
            assert_eq!(entity_type, "Subscription");
            assert_eq!(id, "999");
        }
        other => panic!("Expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_422_keeps_validation_messages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/subscriptions/42.json"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": ["Coupon code could not be found.", "Product must be active."]
        })))
        .mount(&mock_server)
        .await;

    let mut subscription = Subscription {
        id: Some(42),
        coupon_code: Some("NOPE".to_string()),
        ..Default::default()
    };
    let err = subscription
        .save(&client_for(&mock_server))
        .await
        .unwrap_err();

    match err {
        ChargifyError::ApiError {
            message,
            status_code,
        } => {
            assert_eq!(status_code, Some(422));
            assert!(message.contains("Coupon code could not be found."));
            assert!(message.contains("Product must be active."));
        }
        other => panic!("Expected ApiError, got {other:?}"),
    }
    // A failed save leaves the local copy untouched
    assert_eq!(subscription.coupon_code.as_deref(), Some("NOPE"));
}

#[tokio::test]
async fn test_429_maps_to_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions/42.json"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&mock_server)
        .await;

    let err = Subscription::find(&client_for(&mock_server), &(), 42)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ChargifyError::RateLimited {
            retry_after_secs: Some(30)
        }
    ));
}

#[tokio::test]
async fn test_plain_text_error_body_is_kept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions/42.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let err = Subscription::find(&client_for(&mock_server), &(), 42)
        .await
        .unwrap_err();

    assert!(!err.is_not_found());
    assert!(err.to_string().contains("Internal Server Error"));
}

#[tokio::test]
async fn test_unreachable_host_is_http_error() {
    let config = ChargifyConfig::new("acme", "key", "shared").with_api_url("http://127.0.0.1:9");
    let client = ChargifyClient::new(config).unwrap();

    let err = Subscription::find(&client, &(), 1).await.unwrap_err();
    assert!(matches!(err, ChargifyError::HttpError(_)));
}

//! Refunding a payment from the transaction side.

use chargify::{
    ChargifyClient, ChargifyConfig, Find, RefundOutcome, RefundParams, SubscriptionScope,
    Transaction, PAYMENT_TRANSACTION_TYPE,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ChargifyClient {
    let config = ChargifyConfig::new("acme", "test-key", "shared").with_api_url(&server.uri());
    ChargifyClient::new(config).unwrap()
}

fn payment() -> Transaction {
    Transaction {
        id: 77,
        transaction_type: PAYMENT_TRANSACTION_TYPE.to_string(),
        amount_in_cents: 2500,
        subscription_id: Some(42),
        ..Default::default()
    }
}

async fn mount_owner(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/subscriptions/42.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "subscription": { "id": 42, "state": "active" }
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_refund_goes_through_owner() {
    let mock_server = MockServer::start().await;
    mount_owner(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/subscriptions/42/refunds.json"))
        .and(body_json(json!({
            "refund": { "payment_id": 77, "amount_in_cents": 2500, "memo": "Customer request" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "refund": { "id": 900, "amount_in_cents": 2500, "payment_id": 77, "success": true }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = payment()
        .full_refund(
            &client_for(&mock_server),
            RefundParams {
                memo: Some("Customer request".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(outcome.is_refunded());
    assert_eq!(outcome.refund().map(|r| r.id), Some(900));
}

#[tokio::test]
async fn test_refund_of_transaction_found_under_subscription() {
    let mock_server = MockServer::start().await;
    mount_owner(&mock_server).await;

    // The payload does not name its subscription
    Mock::given(method("GET"))
        .and(path("/subscriptions/42/transactions/77.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transaction": { "id": 77, "transaction_type": "payment", "amount_in_cents": 2500 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/subscriptions/42/refunds.json"))
        .and(body_json(json!({
            "refund": { "payment_id": 77, "amount_in_cents": 2500 }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "refund": { "id": 902, "amount_in_cents": 2500, "payment_id": 77 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let transaction = Transaction::find(&client, &SubscriptionScope(42), 77)
        .await
        .unwrap();
    assert_eq!(transaction.subscription_id, Some(42));

    let outcome = transaction
        .full_refund(&client, RefundParams::default())
        .await
        .unwrap();

    assert_eq!(outcome.refund().map(|r| r.id), Some(902));
}

#[tokio::test]
async fn test_partial_refund_keeps_given_amount() {
    let mock_server = MockServer::start().await;
    mount_owner(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/subscriptions/42/refunds.json"))
        .and(body_json(json!({
            "refund": { "payment_id": 77, "amount": "10.00", "memo": "Partial" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "refund": { "id": 901, "amount_in_cents": 1000, "payment_id": 77 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = payment()
        .refund(
            &client_for(&mock_server),
            RefundParams {
                amount: Some("10.00".to_string()),
                memo: Some("Partial".to_string()),
                // Overridden with the transaction's own id
                payment_id: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    match outcome {
        RefundOutcome::Refunded(refund) => assert_eq!(refund.amount_in_cents, 1000),
        RefundOutcome::NotApplicable => panic!("Payment should be refundable"),
    }
}

#[tokio::test]
async fn test_refund_of_charge_sends_nothing() {
    let mock_server = MockServer::start().await;

    let charge = Transaction {
        transaction_type: "charge".to_string(),
        ..payment()
    };
    let outcome = charge
        .full_refund(&client_for(&mock_server), RefundParams::default())
        .await
        .unwrap();

    assert_eq!(outcome, RefundOutcome::NotApplicable);
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_refund_with_vanished_owner_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions/42.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = payment()
        .full_refund(&client_for(&mock_server), RefundParams::default())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

//! Mock Chargify API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Chargify
//! API for integration and end-to-end testing. Unlike wiremock which mocks at
//! the HTTP level per-test, this server maintains state across requests, so a
//! charge shows up in the transaction list and a refund can point back at it.
//!
//! # Example
//!
//! ```ignore
//! use chargify::mock_server::MockServer;
//! use chargify::{ChargifyClient, ChargifyConfig, Find, Subscription};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let config = ChargifyConfig::new("acme", "key", "shared").with_api_url(server.url());
//!     let client = ChargifyClient::new(config).unwrap();
//!
//!     // Server comes with default fixtures
//!     let subscription = Subscription::find(&client, &(), 42).await.unwrap();
//!     assert!(subscription.is_active());
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::MockState;

//! Mock Chargify API server.
//!
//! Provides an axum-based HTTP server that simulates the Chargify API.

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock Chargify API server for testing.
///
/// The server runs in the background. Point a client at it with
/// [`ChargifyConfig::with_api_url`](crate::ChargifyConfig::with_api_url).
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Mock server stopped");
            }
        });
        tracing::debug!(%addr, "Mock Chargify server listening");

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        for product in scenario.products {
            state = state.with_product(product);
        }
        for customer in scenario.customers {
            state = state.with_customer(customer);
        }
        for subscription in scenario.subscriptions {
            state = state.with_subscription(subscription);
        }
        for statement in scenario.statements {
            state = state.with_statement(statement);
        }
        for transaction in scenario.transactions {
            state = state.with_transaction(transaction);
        }
        for (subscription_id, component) in scenario.components {
            state = state.with_component(subscription_id, component);
        }
        for (subscription_id, event) in scenario.events {
            state = state.with_event(subscription_id, event);
        }

        state
    }

    /// Create the axum router with all routes.
    ///
    /// Member routes take the id with its `.json` suffix as one segment.
    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Subscription routes
            .route(
                "/subscriptions.json",
                get(handlers::list_subscriptions).post(handlers::create_subscription),
            )
            .route(
                "/subscriptions/:id",
                get(handlers::get_subscription)
                    .put(handlers::update_subscription)
                    .delete(handlers::cancel_subscription),
            )
            // Sub-actions
            .route("/subscriptions/:id/charges.json", post(handlers::create_charge))
            .route("/subscriptions/:id/credits.json", post(handlers::create_credit))
            .route("/subscriptions/:id/refunds.json", post(handlers::create_refund))
            .route(
                "/subscriptions/:id/adjustments.json",
                post(handlers::create_adjustment),
            )
            .route(
                "/subscriptions/:id/reactivate.json",
                put(handlers::reactivate_subscription),
            )
            .route(
                "/subscriptions/:id/reset_balance.json",
                put(handlers::reset_balance),
            )
            .route(
                "/subscriptions/:id/migrations.json",
                post(handlers::create_migration),
            )
            .route(
                "/subscriptions/:id/migrations/preview.json",
                post(handlers::preview_migration),
            )
            .route("/subscriptions/:id/add_coupon.json", post(handlers::add_coupon))
            .route(
                "/subscriptions/:id/remove_coupon.json",
                axum::routing::delete(handlers::remove_coupon),
            )
            // Nested collections
            .route(
                "/subscriptions/:id/components.json",
                get(handlers::list_components),
            )
            .route(
                "/subscriptions/:id/components/:component_id",
                get(handlers::get_component),
            )
            .route("/subscriptions/:id/events.json", get(handlers::list_events))
            .route(
                "/subscriptions/:id/statements.json",
                get(handlers::list_statements),
            )
            .route(
                "/subscriptions/:id/statements/:statement_id",
                get(handlers::get_statement),
            )
            .route(
                "/subscriptions/:id/transactions.json",
                get(handlers::list_transactions),
            )
            // Customer routes
            .route("/customers/lookup.json", get(handlers::lookup_customer))
            .route("/customers/:id", get(handlers::get_customer))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

//! Chargify API client library.
//!
//! A Rust library for the Chargify subscription billing REST API. Remote
//! resources are typed records; each operation the API offers on them is a
//! method that issues one request (two for the lookups that need to resolve
//! an owner first).
//!
//! # Quick Start
//!
//! ```no_run
//! use chargify::{ChargeParams, ChargifyClient, Find, Subscription};
//!
//! #[tokio::main]
//! async fn main() -> chargify::Result<()> {
//!     // Create client from environment variables
//!     let client = ChargifyClient::from_env()?;
//!
//!     // Fetch a subscription by id
//!     let subscription = Subscription::find(&client, &(), 42).await?;
//!     println!("Subscription is {:?}", subscription.state);
//!
//!     // One-time charge
//!     let charge = subscription
//!         .charge(
//!             &client,
//!             &ChargeParams {
//!                 amount_in_cents: Some(1500),
//!                 memo: Some("Setup fee".to_string()),
//!                 ..Default::default()
//!             },
//!         )
//!         .await?;
//!     println!("Charged {} cents", charge.amount_in_cents);
//!
//!     // Link to the hosted payment update page
//!     if let Some(url) = subscription.hosted_update_payment_page_url(client.config()) {
//!         println!("Update card at {url}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The library is organized around three traits:
//!
//! - [`Resource`] - Where an entity lives: element name, collection and [`Scope`]
//! - [`Find`] - Fetch one entity by id, the first match, or a whole collection
//! - [`Persist`] - Save, destroy and issue named sub-actions
//!
//! Components, events, statements and transactions live under a
//! subscription, so their scope is a [`SubscriptionScope`] that carries the
//! owning id.
//!
//! # Configuration
//!
//! [`ChargifyConfig::from_env`] reads:
//!
//! - `CHARGIFY_SUBDOMAIN` (required) - The site subdomain
//! - `CHARGIFY_API_KEY` (required) - Your Chargify API key
//! - `CHARGIFY_SHARED_KEY` (optional) - Shared key for hosted page URLs
//! - `CHARGIFY_API_URL` (optional) - Base URL override (defaults to `https://<subdomain>.chargify.com`)

mod client;
mod config;
mod envelope;
mod error;
mod hosted_page;
mod models;
mod pagination;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::ChargifyClient;
pub use config::ChargifyConfig;
pub use error::{ChargifyError, Result};
pub use hosted_page::{hosted_page_token, hosted_page_url, TOKEN_LEN, UPDATE_PAYMENT_PAGE};
pub use pagination::{PaginationParams, MAX_PER_PAGE};

// Re-export traits
pub use traits::{Find, Persist, Resource, Scope, SubscriptionScope};

// Re-export models
pub use models::{
    // Subscription types
    ReactivateParams,
    Subscription,
    SubscriptionAttributes,
    // Projections embedded in subscriptions
    CreditCard,
    CreditCardAttributes,
    Customer,
    CustomerAttributes,
    Product,
    // Billing operations
    Adjustment,
    AdjustmentParams,
    Charge,
    ChargeParams,
    Credit,
    CreditParams,
    Refund,
    RefundParams,
    // Migration types
    MigrationParams,
    MigrationPreview,
    // Nested resources
    Component,
    ComponentListQuery,
    Event,
    EventListQuery,
    Statement,
    Transaction,
    TransactionListQuery,
    RefundOutcome,
    PAYMENT_TRANSACTION_TYPE,
};

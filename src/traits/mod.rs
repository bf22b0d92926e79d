//! Trait definitions for Chargify resources.
//!
//! [`Resource`] describes where an entity lives, [`Find`] fetches it and
//! [`Persist`] writes it back or issues sub-actions against it.

mod find;
mod persist;
mod resource;

pub use find::Find;
pub use persist::Persist;
pub use resource::{Resource, Scope, SubscriptionScope};

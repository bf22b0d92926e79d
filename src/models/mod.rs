//! Chargify API model types.

mod billing;
mod component;
mod credit_card;
mod customer;
mod event;
mod migration;
mod product;
mod statement;
mod subscription;
mod transaction;

pub use billing::*;
pub use component::*;
pub use credit_card::*;
pub use customer::*;
pub use event::*;
pub use migration::*;
pub use product::*;
pub use statement::*;
pub use subscription::*;
pub use transaction::*;

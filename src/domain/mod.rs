//! Storefront-agnostic domain logic.

pub mod error;

mod id;
mod money;
mod product;
mod stock;
mod tracking;

pub use id::{ArticleId, SubscriberId};
pub use money::Price;
pub use product::{ProductSnapshot, SizeOffer};
pub use stock::StockState;
pub use tracking::{classify, SizeTransition, TrackedProduct};

//! Trait seams between the core and its collaborators.

pub mod catalog;
pub mod notifier;

pub use catalog::Catalog;
pub use notifier::{Event, LogNotifier, Notifier, NotifierRegistry, NullNotifier};

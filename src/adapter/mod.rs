//! Adapters binding the core to external services.

pub mod telegram;
pub mod wildberries;

//! Dropwatch - Wildberries price-drop and restock tracking over Telegram.
//!
//! Subscribers track catalog articles (optionally scoped to specific sizes);
//! a background watcher re-fetches every tracked product on a fixed interval,
//! diffs the fresh state against the stored per-size baseline, and sends a
//! Telegram notification for price drops, restocks, and stockouts.
//!
//! # Architecture
//!
//! The concurrent core is a shared [`store::TrackingStore`]: a subscriber ->
//! article -> tracked-product registry behind one reader/writer lock,
//! mirrored to a JSON file on every mutation. Both the command handlers and
//! the watcher get the store injected; neither ever holds its lock across
//! network or file I/O.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML with env-supplied credential
//! - [`domain`] - Storefront-agnostic types and the per-size diff algorithm
//! - [`error`] - Error types for the crate
//! - [`port`] - Trait seams: the catalog fetcher and the notifier
//! - [`store`] - Concurrent tracking store with durable file persistence
//! - [`adapter`] - Wildberries card API client and the Telegram transport
//! - [`app`] - Command handlers, the watcher, and process wiring

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
pub mod store;

//! Periodic reconciliation of tracked products against the catalog.
//!
//! Each tick snapshots the registry, re-fetches every tracked product
//! sequentially with a fixed inter-request delay, diffs the fresh state
//! against the stored baseline per size, writes changes back to the live
//! registry by key, and emits notifications for qualifying transitions.
//! Persistence is coalesced to one write per changed product.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::WatcherConfig;
use crate::domain::{classify, ArticleId, SizeTransition, SubscriberId, TrackedProduct};
use crate::port::{Catalog, Event, Notifier};
use crate::store::TrackingStore;

/// The reconciliation engine.
pub struct Watcher {
    store: Arc<TrackingStore>,
    catalog: Arc<dyn Catalog>,
    notifier: Arc<dyn Notifier>,
    tick_interval: Duration,
    request_delay: Duration,
}

impl Watcher {
    /// Create a watcher with its injected collaborators.
    #[must_use]
    pub fn new(
        store: Arc<TrackingStore>,
        catalog: Arc<dyn Catalog>,
        notifier: Arc<dyn Notifier>,
        config: &WatcherConfig,
    ) -> Self {
        Self {
            store,
            catalog,
            notifier,
            tick_interval: config.interval(),
            request_delay: config.request_delay(),
        }
    }

    /// Run ticks forever on the configured interval.
    ///
    /// The first tick fires one full interval after startup, matching a
    /// plain ticker. There is no graceful shutdown; the process exiting is
    /// the only teardown.
    pub async fn run(self) {
        let mut timer = interval(self.tick_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // tokio intervals fire immediately; skip that first tick.
        timer.tick().await;

        info!(interval_secs = self.tick_interval.as_secs(), "Watcher started");

        loop {
            timer.tick().await;
            self.tick().await;
        }
    }

    /// One reconciliation pass over everything tracked right now.
    ///
    /// Entries added after the snapshot are picked up next tick; entries
    /// removed mid-tick are protected by the store's existence re-check.
    pub async fn tick(&self) {
        let snapshot = self.store.snapshot_all();
        let products: usize = snapshot.values().map(|items| items.len()).sum();
        info!(subscribers = snapshot.len(), products, "Reconciliation tick");

        for (subscriber, items) in snapshot {
            for (article, item) in items {
                self.check_product(subscriber, &article, &item).await;
                // Fixed throttle after every product, success or not.
                sleep(self.request_delay).await;
            }
        }
    }

    async fn check_product(
        &self,
        subscriber: SubscriberId,
        article: &ArticleId,
        item: &TrackedProduct,
    ) {
        let fresh = match self.catalog.fetch(article).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                // Skipped this tick; the loop naturally retries next tick.
                warn!(error = %e, article = %article, "Check failed, skipping");
                return;
            }
        };

        let mut changed = false;

        // The stored baseline is the authoritative size set.
        for (size_name, old_state) in &item.last_prices {
            let transition = classify(*old_state, fresh.size_state(size_name));
            let Some(new_state) = transition.new_state() else {
                continue;
            };

            if !self
                .store
                .update_size_state(subscriber, article, size_name, new_state)
            {
                debug!(article = %article, "Entry untracked mid-tick, dropping update");
                continue;
            }
            changed = true;

            if item.wants_size(size_name) {
                if let Some(event) = event_for(transition, subscriber, article, item, size_name) {
                    info!(
                        subscriber = %subscriber,
                        article = %article,
                        size = %size_name,
                        "Notification-worthy change"
                    );
                    self.notifier.notify(event);
                }
            }
        }

        // Adopt sizes the catalog reports for the first time, silently.
        for offer in &fresh.sizes {
            if !item.last_prices.contains_key(&offer.name)
                && self
                    .store
                    .update_size_state(subscriber, article, &offer.name, offer.state)
            {
                changed = true;
            }
        }

        if changed {
            // One coalesced write per product, never one per size.
            if let Err(e) = self.store.persist() {
                warn!(error = %e, article = %article, "Failed to persist after reconciliation");
            }
        }
    }
}

/// Map a transition into a subscriber-facing event, if it warrants one.
fn event_for(
    transition: SizeTransition,
    subscriber: SubscriberId,
    article: &ArticleId,
    item: &TrackedProduct,
    size_name: &str,
) -> Option<Event> {
    match transition {
        SizeTransition::PriceDropped { old, new } => Some(Event::PriceDropped {
            subscriber,
            article: article.clone(),
            product_name: item.product_name.clone(),
            size: size_name.to_string(),
            old_price: old,
            new_price: new,
        }),
        SizeTransition::Restocked { price } => Some(Event::Restocked {
            subscriber,
            article: article.clone(),
            product_name: item.product_name.clone(),
            size: size_name.to_string(),
            price,
        }),
        SizeTransition::StockedOut { .. } => Some(Event::StockedOut {
            subscriber,
            article: article.clone(),
            product_name: item.product_name.clone(),
            size: size_name.to_string(),
        }),
        SizeTransition::PriceMoved { .. } | SizeTransition::Unchanged => None,
    }
}

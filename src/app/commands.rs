//! Transport-agnostic command handlers.
//!
//! The Telegram adapter parses messages into calls on [`CommandService`] and
//! renders the outcomes; everything stateful happens here so the handlers
//! can be tested without a bot.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{ArticleId, SubscriberId, TrackedProduct};
use crate::error::Result;
use crate::port::Catalog;
use crate::store::TrackingStore;

/// Result of a successful track command.
#[derive(Debug)]
pub struct TrackOutcome {
    pub article: ArticleId,
    /// The entry as stored, built from the live snapshot.
    pub item: TrackedProduct,
    /// Set when the durable write failed; the subscription is still active
    /// in memory and the user should be told about the durability gap.
    pub persist_warning: Option<String>,
}

/// Result of an untrack command.
#[derive(Debug)]
pub enum UntrackOutcome {
    Removed {
        article: ArticleId,
        persist_warning: Option<String>,
    },
    NotTracked {
        article: ArticleId,
    },
}

/// Command handlers over the store and the catalog.
pub struct CommandService {
    store: Arc<TrackingStore>,
    catalog: Arc<dyn Catalog>,
}

impl CommandService {
    /// Create the service with its injected collaborators.
    #[must_use]
    pub fn new(store: Arc<TrackingStore>, catalog: Arc<dyn Catalog>) -> Self {
        Self { store, catalog }
    }

    /// Start (or replace) tracking of an article for a subscriber.
    ///
    /// Fetches a live snapshot first; on any adapter error nothing is
    /// mutated. On success the previous entry for the same article is
    /// replaced wholesale, with `last_prices` seeded from every size the
    /// catalog returned.
    ///
    /// # Errors
    ///
    /// [`crate::error::Error::Domain`] for a non-numeric article,
    /// [`crate::error::Error::Catalog`] when the fetch fails.
    pub async fn track(
        &self,
        subscriber: SubscriberId,
        raw_article: &str,
        sizes: Vec<String>,
    ) -> Result<TrackOutcome> {
        let article = ArticleId::parse(raw_article)?;
        let snapshot = self.catalog.fetch(&article).await?;

        let requested: BTreeSet<String> = sizes.into_iter().collect();
        let item = TrackedProduct::from_snapshot(&snapshot, requested);

        let persist_warning = match self.store.upsert(subscriber, article.clone(), item.clone()) {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, subscriber = %subscriber, article = %article,
                    "Tracking saved in memory only");
                Some(e.to_string())
            }
        };

        info!(
            subscriber = %subscriber,
            article = %article,
            product = %item.product_name,
            sizes = item.last_prices.len(),
            "Tracking started"
        );

        Ok(TrackOutcome {
            article,
            item,
            persist_warning,
        })
    }

    /// Stop tracking an article.
    ///
    /// # Errors
    ///
    /// [`crate::error::Error::Domain`] for a non-numeric article.
    pub async fn untrack(
        &self,
        subscriber: SubscriberId,
        raw_article: &str,
    ) -> Result<UntrackOutcome> {
        let article = ArticleId::parse(raw_article)?;

        match self.store.remove(subscriber, &article) {
            Ok(true) => {
                info!(subscriber = %subscriber, article = %article, "Tracking stopped");
                Ok(UntrackOutcome::Removed {
                    article,
                    persist_warning: None,
                })
            }
            Ok(false) => Ok(UntrackOutcome::NotTracked { article }),
            // The entry was removed; only the durable write failed.
            Err(e) => {
                warn!(error = %e, subscriber = %subscriber, article = %article,
                    "Removal saved in memory only");
                Ok(UntrackOutcome::Removed {
                    article,
                    persist_warning: Some(e.to_string()),
                })
            }
        }
    }

    /// The subscriber's tracked articles, rendered from stored state.
    ///
    /// Deliberately does not re-fetch from the catalog; the list shows the
    /// last-known prices the watcher maintains.
    #[must_use]
    pub fn list(&self, subscriber: SubscriberId) -> BTreeMap<ArticleId, TrackedProduct> {
        self.store.subscriptions(subscriber)
    }
}

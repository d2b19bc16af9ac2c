//! Notifier port for subscriber-facing events.

use crate::domain::{ArticleId, Price, SubscriberId};

/// Notification-worthy transitions found by the watcher.
///
/// Every variant is addressed to a single subscriber; delivery is
/// fire-and-forget and no confirmation is tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A tracked size got cheaper.
    PriceDropped {
        subscriber: SubscriberId,
        article: ArticleId,
        product_name: String,
        size: String,
        old_price: Price,
        new_price: Price,
    },
    /// A sold-out size is purchasable again.
    Restocked {
        subscriber: SubscriberId,
        article: ArticleId,
        product_name: String,
        size: String,
        price: Price,
    },
    /// A previously purchasable size sold out.
    StockedOut {
        subscriber: SubscriberId,
        article: ArticleId,
        product_name: String,
        size: String,
    },
}

impl Event {
    /// The subscriber this event is addressed to.
    #[must_use]
    pub const fn subscriber(&self) -> SubscriberId {
        match self {
            Self::PriceDropped { subscriber, .. }
            | Self::Restocked { subscriber, .. }
            | Self::StockedOut { subscriber, .. } => *subscriber,
        }
    }
}

/// Trait for notification handlers.
///
/// Implementations must be thread-safe and must not block; slow delivery
/// belongs in a spawned task (see the Telegram adapter).
pub trait Notifier: Send + Sync {
    /// Handle an event. Should return quickly.
    fn notify(&self, event: Event);
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

/// Fans each event out to every registered notifier.
///
/// The bootstrap registers a [`LogNotifier`] alongside the Telegram
/// notifier, so every delivered notification also lands in the logs.
#[derive(Default)]
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }
}

impl Notifier for NotifierRegistry {
    fn notify(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }
}

/// A notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        use tracing::info;
        match event {
            Event::PriceDropped {
                subscriber,
                article,
                size,
                old_price,
                new_price,
                ..
            } => {
                info!(
                    subscriber = %subscriber,
                    article = %article,
                    size = %size,
                    old_price = %old_price,
                    new_price = %new_price,
                    "Price dropped"
                );
            }
            Event::Restocked {
                subscriber,
                article,
                size,
                price,
                ..
            } => {
                info!(
                    subscriber = %subscriber,
                    article = %article,
                    size = %size,
                    price = %price,
                    "Size restocked"
                );
            }
            Event::StockedOut {
                subscriber,
                article,
                size,
                ..
            } => {
                info!(
                    subscriber = %subscriber,
                    article = %article,
                    size = %size,
                    "Size stocked out"
                );
            }
        }
    }
}

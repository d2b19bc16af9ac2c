//! Tracked subscriptions and the per-size diff algorithm.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::money::Price;
use super::product::ProductSnapshot;
use super::stock::StockState;

/// One subscriber's subscription to a single catalog article.
///
/// `last_prices` is the authoritative set of sizes ever observed for the
/// product; out-of-stock sizes stay in the map as [`StockState::OutOfStock`].
/// An empty `requested_sizes` set means "notify about every size".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedProduct {
    /// Display name captured when tracking started.
    pub product_name: String,
    /// Size-name filter for notifications; empty tracks all sizes.
    pub requested_sizes: BTreeSet<String>,
    /// Last-known state per size name.
    pub last_prices: BTreeMap<String, StockState>,
}

impl TrackedProduct {
    /// Build a tracked product from a live catalog snapshot.
    ///
    /// Every size returned by the catalog gets a `last_prices` entry,
    /// including sold-out ones, so later diffs see the full size set.
    #[must_use]
    pub fn from_snapshot(snapshot: &ProductSnapshot, requested_sizes: BTreeSet<String>) -> Self {
        let last_prices = snapshot
            .sizes
            .iter()
            .map(|offer| (offer.name.clone(), offer.state))
            .collect();

        Self {
            product_name: snapshot.name.clone(),
            requested_sizes,
            last_prices,
        }
    }

    /// Whether a change on this size should notify the subscriber.
    #[must_use]
    pub fn wants_size(&self, size_name: &str) -> bool {
        self.requested_sizes.is_empty() || self.requested_sizes.contains(size_name)
    }
}

/// Classification of one size between two polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTransition {
    /// Nothing changed; nothing to store.
    Unchanged,
    /// Was sold out, now purchasable. Notification-worthy.
    Restocked {
        /// The price it came back at.
        price: Price,
    },
    /// Was purchasable, now sold out or absent. Notification-worthy.
    StockedOut {
        /// The last price it was seen at.
        last_price: Price,
    },
    /// Still purchasable, cheaper than before. Notification-worthy.
    PriceDropped {
        old: Price,
        new: Price,
    },
    /// Still purchasable, price changed but did not drop. Stored silently.
    PriceMoved {
        old: Price,
        new: Price,
    },
}

impl SizeTransition {
    /// The state to write back, or `None` when nothing changed.
    #[must_use]
    pub const fn new_state(self) -> Option<StockState> {
        match self {
            Self::Unchanged => None,
            Self::Restocked { price } => Some(StockState::InStock(price)),
            Self::StockedOut { .. } => Some(StockState::OutOfStock),
            Self::PriceDropped { new, .. } | Self::PriceMoved { new, .. } => {
                Some(StockState::InStock(new))
            }
        }
    }
}

/// Diff one size's stored state against the freshly fetched state.
///
/// `fresh` is `None` when the size is absent from the new snapshot, which is
/// treated the same as sold out.
#[must_use]
pub fn classify(old: StockState, fresh: Option<StockState>) -> SizeTransition {
    let fresh = fresh.unwrap_or(StockState::OutOfStock);

    match (old, fresh) {
        (StockState::OutOfStock, StockState::OutOfStock) => SizeTransition::Unchanged,
        (StockState::OutOfStock, StockState::InStock(price)) => SizeTransition::Restocked { price },
        (StockState::InStock(last_price), StockState::OutOfStock) => {
            SizeTransition::StockedOut { last_price }
        }
        (StockState::InStock(old_price), StockState::InStock(new_price)) => {
            if new_price < old_price {
                SizeTransition::PriceDropped {
                    old: old_price,
                    new: new_price,
                }
            } else if new_price != old_price {
                SizeTransition::PriceMoved {
                    old: old_price,
                    new: new_price,
                }
            } else {
                SizeTransition::Unchanged
            }
        }
    }
}

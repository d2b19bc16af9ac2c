//! Shared test doubles for the catalog and notifier seams.
#![allow(dead_code)] // each test binary uses a different subset

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use dropwatch::domain::{ArticleId, ProductSnapshot, SizeOffer, StockState};
use dropwatch::error::CatalogError;
use dropwatch::port::{Catalog, Event, Notifier};

/// Catalog stub serving scripted snapshots by article.
///
/// Articles without a scripted snapshot report `NotFound`, which doubles as
/// the "adapter failed" case for skip-behavior tests.
#[derive(Default)]
pub struct StubCatalog {
    snapshots: Mutex<HashMap<String, ProductSnapshot>>,
}

impl StubCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set(&self, article: &str, snapshot: ProductSnapshot) {
        self.snapshots
            .lock()
            .insert(article.to_string(), snapshot);
    }

    pub fn clear(&self, article: &str) {
        self.snapshots.lock().remove(article);
    }
}

#[async_trait]
impl Catalog for StubCatalog {
    async fn fetch(&self, article: &ArticleId) -> Result<ProductSnapshot, CatalogError> {
        self.snapshots
            .lock()
            .get(article.as_str())
            .cloned()
            .ok_or_else(|| CatalogError::NotFound {
                article: article.to_string(),
            })
    }
}

/// Notifier that records every event for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<Event>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut self.events.lock())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: Event) {
        self.events.lock().push(event);
    }
}

/// Build a snapshot from (size, price) pairs; `None` means out of stock.
pub fn snapshot(name: &str, sizes: &[(&str, Option<Decimal>)]) -> ProductSnapshot {
    ProductSnapshot {
        name: name.to_string(),
        sizes: sizes
            .iter()
            .map(|(size_name, price)| SizeOffer {
                name: (*size_name).to_string(),
                state: price.map_or(StockState::OutOfStock, StockState::InStock),
            })
            .collect(),
    }
}

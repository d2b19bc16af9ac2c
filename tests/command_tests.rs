//! Integration tests for the command handlers.

mod support;

use std::sync::Arc;

use rust_decimal_macros::dec;
use tempfile::TempDir;

use dropwatch::app::{CommandService, UntrackOutcome};
use dropwatch::domain::{ArticleId, StockState, SubscriberId};
use dropwatch::error::{CatalogError, Error};
use dropwatch::store::TrackingStore;

use support::{snapshot, StubCatalog};

fn service(dir: &TempDir) -> (CommandService, Arc<StubCatalog>, Arc<TrackingStore>) {
    let store = Arc::new(TrackingStore::open(dir.path().join("tracking.json")).unwrap());
    let catalog = StubCatalog::new();
    let service = CommandService::new(Arc::clone(&store), catalog.clone());
    (service, catalog, store)
}

const SUB: SubscriberId = SubscriberId::new(1);

#[tokio::test]
async fn track_then_list_shows_the_exact_filter() {
    let dir = TempDir::new().unwrap();
    let (service, catalog, _store) = service(&dir);
    catalog.set(
        "123456",
        snapshot("Dress", &[("S", Some(dec!(30))), ("M", Some(dec!(31))), ("L", None)]),
    );

    service
        .track(SUB, "123456", vec!["S".to_string(), "L".to_string()])
        .await
        .unwrap();

    let items = service.list(SUB);
    let article = ArticleId::parse("123456").unwrap();
    let item = &items[&article];

    assert!(item.wants_size("S"));
    assert!(item.wants_size("L"));
    assert!(!item.wants_size("M"));
    // The baseline still covers every size the catalog returned.
    assert_eq!(item.last_prices.len(), 3);
}

#[tokio::test]
async fn retrack_replaces_the_baseline_wholesale() {
    let dir = TempDir::new().unwrap();
    let (service, catalog, _store) = service(&dir);
    catalog.set(
        "100",
        snapshot("Dress", &[("S", Some(dec!(30))), ("M", Some(dec!(31)))]),
    );
    service
        .track(SUB, "100", vec!["S".to_string()])
        .await
        .unwrap();

    // The catalog dropped S entirely; re-tracking must not keep it.
    catalog.set("100", snapshot("Dress", &[("M", Some(dec!(29)))]));
    service
        .track(SUB, "100", vec!["M".to_string()])
        .await
        .unwrap();

    let items = service.list(SUB);
    let item = &items[&ArticleId::parse("100").unwrap()];
    assert!(!item.last_prices.contains_key("S"));
    assert_eq!(item.last_prices["M"], StockState::InStock(dec!(29)));
    assert!(!item.wants_size("S"));
}

#[tokio::test]
async fn untrack_removes_and_reports() {
    let dir = TempDir::new().unwrap();
    let (service, catalog, _store) = service(&dir);
    catalog.set("100", snapshot("Dress", &[("S", Some(dec!(30)))]));
    service.track(SUB, "100", vec![]).await.unwrap();

    let outcome = service.untrack(SUB, "100").await.unwrap();
    assert!(matches!(outcome, UntrackOutcome::Removed { .. }));
    assert!(service.list(SUB).is_empty());

    let outcome = service.untrack(SUB, "100").await.unwrap();
    assert!(matches!(outcome, UntrackOutcome::NotTracked { .. }));
}

#[tokio::test]
async fn non_numeric_article_is_rejected_without_mutation() {
    let dir = TempDir::new().unwrap();
    let (service, _catalog, store) = service(&dir);

    let result = service.track(SUB, "abc123", vec![]).await;
    assert!(matches!(result, Err(Error::Domain(_))));
    assert!(store.snapshot_all().is_empty());

    let result = service.untrack(SUB, "not-a-number").await;
    assert!(matches!(result, Err(Error::Domain(_))));
}

#[tokio::test]
async fn catalog_failure_leaves_no_trace() {
    let dir = TempDir::new().unwrap();
    let (service, _catalog, store) = service(&dir);

    // Nothing scripted: the stub reports NotFound.
    let result = service.track(SUB, "100", vec![]).await;
    assert!(matches!(
        result,
        Err(Error::Catalog(CatalogError::NotFound { .. }))
    ));
    assert!(store.snapshot_all().is_empty());
    assert!(
        !dir.path().join("tracking.json").exists(),
        "failed track must not persist anything"
    );
}

#[tokio::test]
async fn concurrent_tracks_for_different_subscribers_do_not_collide() {
    let dir = TempDir::new().unwrap();
    let (service, catalog, store) = service(&dir);
    let service = Arc::new(service);
    catalog.set("100", snapshot("Dress", &[("S", Some(dec!(30)))]));

    let a = SubscriberId::new(1);
    let b = SubscriberId::new(2);
    let (ra, rb) = tokio::join!(
        service.track(a, "100", vec!["S".to_string()]),
        service.track(b, "100", vec![]),
    );
    ra.unwrap();
    rb.unwrap();

    let registry = store.snapshot_all();
    assert_eq!(registry.len(), 2);
    let article = ArticleId::parse("100").unwrap();
    assert!(registry[&a][&article].wants_size("S"));
    assert!(!registry[&a][&article].wants_size("M"));
    assert!(registry[&b][&article].wants_size("M"));
}

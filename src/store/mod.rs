//! Concurrent tracking store with durable file persistence.
//!
//! The registry maps subscriber -> article -> [`TrackedProduct`] behind a
//! single reader/writer lock. Every mutating operation writes a complete
//! snapshot of the registry to disk before returning; a failed write is
//! reported to the caller but the in-memory mutation is kept.
//!
//! The registry lock is never held across file or network I/O. Persistence
//! runs under a dedicated I/O mutex: the registry is serialized (briefly
//! under the read lock), then written with write-to-temp-then-rename. Taking
//! the mutex before serializing keeps concurrent persists ordered, so a
//! newer snapshot can never be overwritten by a staler one, and readers of
//! the file only ever see a complete snapshot.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::domain::{ArticleId, StockState, SubscriberId, TrackedProduct};
use crate::error::StoreError;

/// Full registry shape, also the persisted file layout.
pub type Registry = BTreeMap<SubscriberId, BTreeMap<ArticleId, TrackedProduct>>;

/// Shared subscription registry, mirrored to a JSON file on every mutation.
pub struct TrackingStore {
    path: PathBuf,
    registry: RwLock<Registry>,
    /// Serializes file writes so concurrent persists cannot interleave.
    io: Mutex<()>,
}

impl TrackingStore {
    /// Open the store, loading any previously persisted registry.
    ///
    /// A missing or empty file yields an empty registry. A file that exists
    /// but does not parse is a fatal startup error.
    ///
    /// # Errors
    ///
    /// [`StoreError::ReadFile`] when the file exists but cannot be read,
    /// [`StoreError::Corrupt`] when its contents do not parse.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let registry = Self::load(&path)?;

        info!(
            path = %path.display(),
            subscribers = registry.len(),
            "Tracking store opened"
        );

        Ok(Self {
            path,
            registry: RwLock::new(registry),
            io: Mutex::new(()),
        })
    }

    fn load(path: &Path) -> Result<Registry, StoreError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No tracking data file, starting empty");
                return Ok(Registry::new());
            }
            Err(e) => return Err(StoreError::ReadFile(e)),
        };

        if contents.trim().is_empty() {
            debug!(path = %path.display(), "Tracking data file empty, starting empty");
            return Ok(Registry::new());
        }

        serde_json::from_str(&contents).map_err(StoreError::Corrupt)
    }

    /// Replace (or create) a subscriber's tracking entry for an article.
    ///
    /// The entry is replaced wholesale, never merged. A durable snapshot is
    /// written before returning.
    ///
    /// # Errors
    ///
    /// Persistence errors only. The in-memory mutation has already been
    /// applied and is not rolled back.
    pub fn upsert(
        &self,
        subscriber: SubscriberId,
        article: ArticleId,
        item: TrackedProduct,
    ) -> Result<(), StoreError> {
        {
            let mut registry = self.registry.write();
            registry.entry(subscriber).or_default().insert(article, item);
        }
        self.persist()
    }

    /// Remove a subscriber's tracking entry.
    ///
    /// Returns whether anything was removed. Persists only on removal.
    ///
    /// # Errors
    ///
    /// Persistence errors only; the removal itself is kept.
    pub fn remove(
        &self,
        subscriber: SubscriberId,
        article: &ArticleId,
    ) -> Result<bool, StoreError> {
        let removed = {
            let mut registry = self.registry.write();
            let Some(items) = registry.get_mut(&subscriber) else {
                return Ok(false);
            };
            let removed = items.remove(article).is_some();
            if items.is_empty() {
                registry.remove(&subscriber);
            }
            removed
        };

        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    /// A subscriber's tracked articles, as a copy safe to iterate lockless.
    #[must_use]
    pub fn subscriptions(&self, subscriber: SubscriberId) -> BTreeMap<ArticleId, TrackedProduct> {
        self.registry
            .read()
            .get(&subscriber)
            .cloned()
            .unwrap_or_default()
    }

    /// Deep copy of the entire registry.
    ///
    /// Used by the watcher so that slow catalog calls never hold the lock.
    #[must_use]
    pub fn snapshot_all(&self) -> Registry {
        self.registry.read().clone()
    }

    /// Record the freshly observed state of one size, in place.
    ///
    /// Returns `false` when the entry no longer exists, which happens when
    /// the subscriber untracked the article after the watcher snapshotted
    /// it; the stale update is dropped rather than resurrecting the entry.
    /// Does not persist - the watcher batches one write per product.
    pub fn update_size_state(
        &self,
        subscriber: SubscriberId,
        article: &ArticleId,
        size_name: &str,
        state: StockState,
    ) -> bool {
        let mut registry = self.registry.write();
        let Some(item) = registry
            .get_mut(&subscriber)
            .and_then(|items| items.get_mut(article))
        else {
            return false;
        };
        item.last_prices.insert(size_name.to_string(), state);
        true
    }

    /// Write a complete snapshot of the registry to the data file.
    ///
    /// # Errors
    ///
    /// [`StoreError::Serialize`] or [`StoreError::Persist`].
    pub fn persist(&self) -> Result<(), StoreError> {
        // Take the write slot before serializing so concurrent persists
        // snapshot and hit the file in the same order; a later mutation can
        // never be overwritten by an earlier, staler snapshot. The registry
        // lock is still only held for the in-memory serialization.
        let _io = self.io.lock();
        let json = {
            let registry = self.registry.read();
            serde_json::to_vec_pretty(&*registry).map_err(StoreError::Serialize)?
        };

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &json).map_err(StoreError::Persist)?;
        fs::rename(&tmp, &self.path).map_err(StoreError::Persist)?;

        debug!(path = %self.path.display(), bytes = json.len(), "Tracking data persisted");
        Ok(())
    }
}

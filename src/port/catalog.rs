//! Catalog port for fetching live product state.

use async_trait::async_trait;

use crate::domain::{ArticleId, ProductSnapshot};
use crate::error::CatalogError;

/// Price source for one product at a time.
///
/// Pure request/response, no state, no retries. Both the command handlers
/// and the watcher go through this seam, which is what makes the watcher
/// testable without a network.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch the current name, sizes, and prices for an article.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] when the upstream reports zero matching
    /// products, [`CatalogError::Transport`] for network failures,
    /// [`CatalogError::UpstreamStatus`] for non-success responses, and
    /// [`CatalogError::Decode`] for malformed payloads.
    async fn fetch(&self, article: &ArticleId) -> Result<ProductSnapshot, CatalogError>;
}

//! Catalog snapshot types returned by the price source adapter.

use super::stock::StockState;

/// One size variant as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeOffer {
    /// Size name as displayed by the storefront (e.g. "38", "M").
    pub name: String,
    /// Availability and price for this size.
    pub state: StockState,
}

/// Point-in-time state of one product, fetched from the catalog.
///
/// Transient - derived on every poll, never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    /// Display name, including the color variant when the catalog reports one.
    pub name: String,
    /// Per-size state, in catalog order.
    pub sizes: Vec<SizeOffer>,
}

impl ProductSnapshot {
    /// Look up the freshly fetched state for a size name.
    #[must_use]
    pub fn size_state(&self, size_name: &str) -> Option<StockState> {
        self.sizes
            .iter()
            .find(|offer| offer.name == size_name)
            .map(|offer| offer.state)
    }
}

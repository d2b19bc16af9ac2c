//! Stock state for a single size variant.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::Price;

/// Availability of one size, with its price when purchasable.
///
/// Internally this is an explicit tagged value. At the persistence boundary
/// it serializes to a plain decimal where zero means out of stock, keeping
/// the tracking file a flat size-to-price mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub enum StockState {
    /// The size is purchasable at the given price.
    InStock(Price),
    /// The size is sold out (or absent from the catalog response).
    OutOfStock,
}

impl StockState {
    /// True when the size is purchasable.
    #[must_use]
    pub const fn is_in_stock(self) -> bool {
        matches!(self, Self::InStock(_))
    }

    /// The current price, if in stock.
    #[must_use]
    pub const fn price(self) -> Option<Price> {
        match self {
            Self::InStock(price) => Some(price),
            Self::OutOfStock => None,
        }
    }
}

impl From<Decimal> for StockState {
    fn from(value: Decimal) -> Self {
        if value.is_zero() {
            Self::OutOfStock
        } else {
            Self::InStock(value)
        }
    }
}

impl From<StockState> for Decimal {
    fn from(state: StockState) -> Self {
        match state {
            StockState::InStock(price) => price,
            StockState::OutOfStock => Decimal::ZERO,
        }
    }
}

//! Monetary types for price representation.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
///
/// Prices are recomputed from integer minor units on every poll and compared
/// for exact equality, so binary floating point is not an option here.
pub type Price = Decimal;

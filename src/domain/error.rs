//! Domain validation errors for core domain types.

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Article identifiers must be non-empty and numeric.
    #[error("article must be a number, got `{input}`")]
    InvalidArticle {
        /// The rejected input.
        input: String,
    },
}

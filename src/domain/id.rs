//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Subscriber identifier - the Telegram chat the subscription belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SubscriberId(i64);

impl SubscriberId {
    /// Create a new `SubscriberId` from a chat id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw chat id.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog article identifier - newtype for type safety.
///
/// The inner String is private so that every instance has gone through
/// [`ArticleId::parse`] and is known to be numeric.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ArticleId(String);

impl ArticleId {
    /// Parse an article id from user input.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidArticle`] when the input is empty or
    /// contains non-digit characters.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::InvalidArticle {
                input: input.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the article id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Product identifiers.
//!
//! Cart line items are keyed by the catalog's product id, which is an opaque
//! string. Wrapping it keeps ids from being confused with titles or image
//! references, which are also plain strings.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A type-safe product identifier.
///
/// Serialized transparently as the inner string.
///
/// ```
/// use go_marketplace_core::ProductId;
///
/// let id = ProductId::new("sku-42");
/// assert_eq!(id.as_str(), "sku-42");
/// assert_eq!(id, ProductId::from("sku-42"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! Products and cart line items.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A product descriptor as offered to the cart, without a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog product id.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Display image reference.
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    /// Unit price.
    pub price: Price,
}

impl Product {
    /// Create a new product descriptor.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

/// A product in the cart together with its quantity.
///
/// This is also the persisted shape: `{id, title, image_url, price, quantity}`.
/// `quantity` is signed because decrementing is not floored at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog product id, unique within a cart.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Display image reference.
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    /// Unit price.
    pub price: Price,
    /// Number of units.
    pub quantity: i64,
}

impl LineItem {
    /// Build a line item from a product descriptor.
    #[must_use]
    pub fn from_product(product: Product, quantity: i64) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity,
        }
    }

    /// Price of all units on this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

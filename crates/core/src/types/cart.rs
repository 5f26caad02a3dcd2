//! The cart list and its pure transforms.
//!
//! A [`CartList`] is never mutated in place by the store: every operation
//! returns a new list, which the store then publishes and persists. Keeping the
//! transforms here, free of I/O, means they can be tested without a runtime.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{LineItem, Price, Product, ProductId};

/// Errors that can occur when decoding a persisted [`CartList`].
#[derive(thiserror::Error, Debug)]
pub enum CartListError {
    /// The value is not a JSON array of line items.
    #[error("invalid cart JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The same product id appears on more than one line.
    #[error("duplicate line item for product {0}")]
    DuplicateId(ProductId),
}

/// Ordered line items, in the order products were first added.
///
/// ## Invariants
///
/// - At most one [`LineItem`] per [`ProductId`]
/// - Quantities may be zero or negative; nothing is pruned unless
///   [`CartList::without_empty`] is applied
/// - Quantity changes saturate at the `i64` bounds
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartList(Vec<LineItem>);

impl CartList {
    /// Create an empty cart list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// All line items in order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.0
    }

    /// Iterate over line items in order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.0.iter()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up the line item for a product.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.0.iter().find(|item| &item.id == id)
    }

    /// Sum of all quantities, saturating at the `i64` bounds.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.0
            .iter()
            .fold(0_i64, |total, item| total.saturating_add(item.quantity))
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.0.iter().map(LineItem::line_total).sum()
    }

    /// Add one unit of `product`.
    ///
    /// An existing line for the same id gets its quantity bumped and its
    /// title, image and price replaced by the incoming descriptor. Otherwise
    /// a new line with quantity 1 is appended.
    #[must_use]
    pub fn with_added(&self, product: Product) -> Self {
        match self.get(&product.id) {
            Some(existing) => {
                let updated = LineItem::from_product(product, existing.quantity.saturating_add(1));
                Self(
                    self.0
                        .iter()
                        .map(|item| {
                            if item.id == updated.id {
                                updated.clone()
                            } else {
                                item.clone()
                            }
                        })
                        .collect(),
                )
            }
            None => {
                let mut items = self.0.clone();
                items.push(LineItem::from_product(product, 1));
                Self(items)
            }
        }
    }

    /// Increase the quantity of `id` by one. Unknown ids leave the list as is.
    #[must_use]
    pub fn with_incremented(&self, id: &ProductId) -> Self {
        self.with_quantity_delta(id, 1)
    }

    /// Decrease the quantity of `id` by one.
    ///
    /// There is no floor: a line at zero goes to -1. Unknown ids leave the
    /// list as is.
    #[must_use]
    pub fn with_decremented(&self, id: &ProductId) -> Self {
        self.with_quantity_delta(id, -1)
    }

    /// Drop every line whose quantity is zero or below.
    #[must_use]
    pub fn without_empty(&self) -> Self {
        Self(
            self.0
                .iter()
                .filter(|item| item.quantity > 0)
                .cloned()
                .collect(),
        )
    }

    fn with_quantity_delta(&self, id: &ProductId, delta: i64) -> Self {
        Self(
            self.0
                .iter()
                .map(|item| {
                    if &item.id == id {
                        LineItem {
                            quantity: item.quantity.saturating_add(delta),
                            ..item.clone()
                        }
                    } else {
                        item.clone()
                    }
                })
                .collect(),
        )
    }

    /// Encode as the persisted JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a persisted JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON array of line items, or if
    /// two lines share a product id.
    pub fn from_json(s: &str) -> Result<Self, CartListError> {
        let list: Self = serde_json::from_str(s)?;
        let mut seen = HashSet::with_capacity(list.len());
        for item in &list.0 {
            if !seen.insert(&item.id) {
                return Err(CartListError::DuplicateId(item.id.clone()));
            }
        }
        Ok(list)
    }
}

impl FromIterator<LineItem> for CartList {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CartList {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for CartList {
    type Item = LineItem;
    type IntoIter = std::vec::IntoIter<LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product(id: &str, title: &str, image_url: &str, cents: i64) -> Product {
        Product::new(id, title, image_url, Price::from_cents(cents))
    }

    fn cart_with(id: &str, quantity: i64) -> CartList {
        CartList::from_iter([LineItem::from_product(product(id, "T", "u", 1000), quantity)])
    }

    #[test]
    fn test_add_new_product() {
        let cart = CartList::new().with_added(product("a", "T", "u", 1000));

        assert_eq!(cart.len(), 1);
        assert_eq!(
            cart.items()[0],
            LineItem {
                id: ProductId::new("a"),
                title: "T".to_string(),
                image_url: "u".to_string(),
                price: Price::from_cents(1000),
                quantity: 1,
            }
        );
    }

    #[test]
    fn test_add_existing_increments_and_overwrites_fields() {
        let cart = cart_with("a", 1).with_added(product("a", "T2", "u2", 2000));

        assert_eq!(cart.len(), 1);
        let item = &cart.items()[0];
        assert_eq!(item.quantity, 2);
        assert_eq!(item.title, "T2");
        assert_eq!(item.image_url, "u2");
        assert_eq!(item.price, Price::from_cents(2000));
    }

    #[test]
    fn test_add_keeps_first_added_order() {
        let cart = CartList::new()
            .with_added(product("a", "A", "u", 100))
            .with_added(product("b", "B", "u", 100))
            .with_added(product("a", "A", "u", 100));

        let ids: Vec<&str> = cart.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(cart.get(&ProductId::new("a")).unwrap().quantity, 2);
    }

    #[test]
    fn test_repeated_adds_keep_ids_unique() {
        let ids = ["a", "b", "a", "c", "b", "a", "c", "c", "d"];
        let cart = ids
            .iter()
            .fold(CartList::new(), |cart, id| cart.with_added(product(id, "T", "u", 100)));

        let mut seen = HashSet::new();
        assert!(cart.iter().all(|item| seen.insert(item.id.clone())));
        assert_eq!(cart.len(), 4);
        assert_eq!(cart.total_quantity(), 9);
    }

    #[test]
    fn test_increment_known_id() {
        let cart = cart_with("a", 1).with_incremented(&ProductId::new("a"));
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_increment_unknown_id_is_noop() {
        let cart = cart_with("a", 1);
        assert_eq!(cart.with_incremented(&ProductId::new("missing")), cart);
        assert_eq!(CartList::new().with_incremented(&ProductId::new("missing")), CartList::new());
    }

    #[test]
    fn test_decrement_has_no_floor() {
        let cart = cart_with("a", 0).with_decremented(&ProductId::new("a"));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, -1);
    }

    #[test]
    fn test_decrement_unknown_id_is_noop() {
        let cart = cart_with("a", 3);
        assert_eq!(cart.with_decremented(&ProductId::new("b")), cart);
    }

    #[test]
    fn test_decrement_leaves_other_lines_untouched() {
        let cart = cart_with("a", 2).with_added(product("b", "B", "u", 100));
        let cart = cart.with_decremented(&ProductId::new("a"));

        assert_eq!(cart.get(&ProductId::new("a")).unwrap().quantity, 1);
        assert_eq!(cart.get(&ProductId::new("b")).unwrap().quantity, 1);
    }

    #[test]
    fn test_quantity_saturates_at_bounds() {
        let id = ProductId::new("a");

        let at_max = cart_with("a", i64::MAX);
        assert_eq!(at_max.with_incremented(&id).items()[0].quantity, i64::MAX);
        assert_eq!(at_max.with_added(product("a", "T", "u", 1000)).items()[0].quantity, i64::MAX);
        assert_eq!(at_max.with_decremented(&id).items()[0].quantity, i64::MAX - 1);

        let at_min = cart_with("a", i64::MIN);
        assert_eq!(at_min.with_decremented(&id).items()[0].quantity, i64::MIN);
        assert_eq!(at_min.with_incremented(&id).items()[0].quantity, i64::MIN + 1);
    }

    #[test]
    fn test_totals_saturate_for_persisted_extremes() {
        let json = format!(
            r#"[
                {{"id":"a","title":"A","image_url":"u","price":100000000000,"quantity":{}}},
                {{"id":"b","title":"B","image_url":"u","price":1,"quantity":{}}}
            ]"#,
            i64::MAX,
            i64::MAX
        );
        let cart = CartList::from_json(&json).unwrap();

        assert_eq!(cart.total_quantity(), i64::MAX);
        assert_eq!(cart.subtotal(), "79228162514264337593543950335".parse().unwrap());
        assert_eq!(cart.with_incremented(&ProductId::new("a")), cart);
    }

    #[test]
    fn test_without_empty() {
        let cart = CartList::from_iter([
            LineItem::from_product(product("a", "A", "u", 100), 0),
            LineItem::from_product(product("b", "B", "u", 100), 2),
            LineItem::from_product(product("c", "C", "u", 100), -1),
        ]);

        let pruned = cart.without_empty();
        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned.items()[0].id, ProductId::new("b"));
    }

    #[test]
    fn test_subtotal() {
        let cart = CartList::new()
            .with_added(product("a", "A", "u", 250))
            .with_added(product("a", "A", "u", 250))
            .with_added(product("b", "B", "u", 1000));

        assert_eq!(cart.subtotal(), Price::from_cents(1500));
        assert_eq!(CartList::new().subtotal(), Price::ZERO);
    }

    #[test]
    fn test_json_preserves_order_and_fields() {
        let cart = CartList::new()
            .with_added(product("z", "Zebra", "https://img/z.png", 1999))
            .with_added(product("a", "Apple", "https://img/a.png", 50))
            .with_decremented(&ProductId::new("a"))
            .with_decremented(&ProductId::new("a"));

        let decoded = CartList::from_json(&cart.to_json().unwrap()).unwrap();
        assert_eq!(decoded, cart);
    }

    #[test]
    fn test_json_keeps_high_precision_prices() {
        let price = "0.12345678901234567891".parse().unwrap();
        let cart = CartList::new().with_added(Product::new("a", "A", "u", price));

        let json = cart.to_json().unwrap();
        assert!(json.contains(r#""price":0.12345678901234567891"#));
        assert_eq!(CartList::from_json(&json).unwrap(), cart);
    }

    #[test]
    fn test_from_json_rejects_prices_outside_decimal_range() {
        let json = r#"[{"id":"a","title":"A","image_url":"u","price":1e30,"quantity":1}]"#;
        assert!(matches!(CartList::from_json(json), Err(CartListError::Json(_))));
    }

    #[test]
    fn test_from_json_rejects_duplicates() {
        let json = r#"[
            {"id":"a","title":"A","image_url":"u","price":1,"quantity":1},
            {"id":"a","title":"A","image_url":"u","price":1,"quantity":2}
        ]"#;
        assert!(matches!(
            CartList::from_json(json),
            Err(CartListError::DuplicateId(id)) if id.as_str() == "a"
        ));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            CartList::from_json("{not json"),
            Err(CartListError::Json(_))
        ));
        assert!(matches!(
            CartList::from_json(r#"{"id":"a"}"#),
            Err(CartListError::Json(_))
        ));
    }
}

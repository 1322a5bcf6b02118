//! Shopping cart lines and arithmetic.
//!
//! The cart is persisted verbatim as a JSON array of [`CartItem`] under the
//! visitor's `cartItems` entry, so [`Cart`] is serde-transparent over its lines.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CartItemId, Price, Product, ProductId};

/// Errors from cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The product has no stock left.
    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),
}

/// A single line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    /// Product snapshot taken when the line was created.
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Price of this line (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Multiplier applied to the product id when deriving a new line id.
    const LINE_ID_FACTOR: i64 = 1000;

    /// Create a cart from existing lines.
    #[must_use]
    pub const fn from_items(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Add `quantity` units of `product`.
    ///
    /// Merges into the existing line for the same product if there is one.
    /// The resulting line never holds more than the product's stock. A
    /// quantity of zero leaves the cart untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] if the product has no stock.
    pub fn add(&mut self, product: Product, quantity: u32) -> Result<(), CartError> {
        if !product.in_stock() {
            return Err(CartError::OutOfStock(product.id));
        }
        if quantity == 0 {
            return Ok(());
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.id)
        {
            let merged = existing.quantity.saturating_add(quantity);
            existing.quantity = product.clamp_quantity(merged);
            return Ok(());
        }

        let id = self.next_line_id(product.id);
        let quantity = product.clamp_quantity(quantity);
        self.items.push(CartItem {
            id,
            product_id: product.id,
            product,
            quantity,
        });
        Ok(())
    }

    /// Remove a line. Unknown ids are ignored.
    pub fn remove(&mut self, id: CartItemId) {
        self.items.retain(|item| item.id != id);
    }

    /// Set the quantity of a line, capped at the line's stock; zero removes
    /// it. Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: CartItemId, quantity: u32) {
        if quantity == 0 {
            self.remove(id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = item.product.clamp_quantity(quantity);
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Derive a line id from the product id and current line count, stepping
    /// forward past any id already in use.
    fn next_line_id(&self, product_id: ProductId) -> CartItemId {
        let len = i64::try_from(self.items.len()).unwrap_or(i64::MAX);
        let mut candidate = product_id
            .as_i64()
            .saturating_mul(Self::LINE_ID_FACTOR)
            .saturating_add(len);
        while self.items.iter().any(|item| item.id.as_i64() == candidate) {
            candidate = candidate.saturating_add(1);
        }
        CartItemId::new(candidate)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i64, cents: i64, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Produto {id}"),
            description: String::new(),
            price: Price::from_cents(cents),
            image_url: String::new(),
            category: "games".to_string(),
            stock,
        }
    }

    #[test]
    fn test_add_new_line_uses_deterministic_id() {
        let mut cart = Cart::default();
        cart.add(product(7, 1000, 5), 2).unwrap();
        cart.add(product(3, 500, 5), 1).unwrap();

        assert_eq!(cart.items()[0].id, CartItemId::new(7000));
        assert_eq!(cart.items()[1].id, CartItemId::new(3001));
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut cart = Cart::default();
        cart.add(product(1, 1000, 5), 1).unwrap();
        cart.add(product(1, 1000, 5), 3).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 4);
    }

    #[test]
    fn test_merged_line_capped_at_stock() {
        let mut cart = Cart::default();
        cart.add(product(3, 1000, 3), 2).unwrap();
        cart.add(product(3, 1000, 3), 2).unwrap();
        assert_eq!(cart.items()[0].quantity, 3);

        cart.add(product(3, 1000, 3), 50).unwrap();
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_new_line_capped_at_stock() {
        let mut cart = Cart::default();
        cart.add(product(8, 1000, 2), 9).unwrap();
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_update_quantity_capped_at_stock() {
        let mut cart = Cart::default();
        cart.add(product(3, 1000, 3), 1).unwrap();
        let id = cart.items()[0].id;

        cart.update_quantity(id, 999);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_add_out_of_stock_rejected() {
        let mut cart = Cart::default();
        let err = cart.add(product(2, 1000, 0), 1).unwrap_err();
        assert_eq!(err, CartError::OutOfStock(ProductId::new(2)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let mut cart = Cart::default();
        cart.add(product(2, 1000, 3), 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_line_id_collision_steps_forward() {
        let mut cart = Cart::from_items(vec![CartItem {
            id: CartItemId::new(1001),
            product_id: ProductId::new(5),
            product: product(5, 100, 1),
            quantity: 1,
        }]);

        // Product 1 at index 1 derives 1001, which is already taken.
        cart.add(product(1, 100, 1), 1).unwrap();
        assert_eq!(cart.items()[1].id, CartItemId::new(1002));
    }

    #[test]
    fn test_readd_after_remove_gets_fresh_line() {
        let mut cart = Cart::default();
        cart.add(product(1, 100, 9), 1).unwrap();
        cart.add(product(2, 100, 9), 1).unwrap();
        cart.remove(CartItemId::new(1000));
        cart.add(product(1, 100, 9), 1).unwrap();

        let ids: Vec<i64> = cart.items().iter().map(|i| i.id.as_i64()).collect();
        assert_eq!(ids, vec![2001, 1001]);
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::default();
        cart.add(product(1, 1000, 9), 1).unwrap();
        let id = cart.items()[0].id;

        cart.update_quantity(id, 5);
        assert_eq!(cart.items()[0].quantity, 5);

        cart.update_quantity(CartItemId::new(99), 2);
        assert_eq!(cart.item_count(), 5);

        cart.update_quantity(id, 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut cart = Cart::default();
        cart.add(product(1, 1000, 9), 1).unwrap();
        cart.remove(CartItemId::new(12345));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::default();
        cart.add(product(1, 1999, 9), 2).unwrap();
        cart.add(product(2, 5000, 9), 1).unwrap();

        assert_eq!(cart.total(), Price::from_cents(8998));
        assert_eq!(cart.item_count(), 3);

        cart.clear();
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_persisted_shape_is_item_array() {
        let mut cart = Cart::default();
        cart.add(product(4, 250, 2), 1).unwrap();

        let value = serde_json::to_value(&cart).unwrap();
        let lines = value.as_array().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["productId"], 4);
        assert_eq!(lines[0]["id"], 4000);
        assert_eq!(lines[0]["product"]["imageUrl"], "");

        let back: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(back, cart);
    }
}

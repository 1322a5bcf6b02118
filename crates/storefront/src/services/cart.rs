//! Session-persisted shopping cart.
//!
//! The cart is stored under the `cartItems` session key as a JSON array of
//! lines and rewritten after every change. An unreadable entry is treated as
//! an empty cart.

use secrecy::SecretString;
use tower_sessions::Session;
use tracing::{info, warn};
use wenshop_core::{Cart, CartItemId, ProductId};

use crate::api::ApiClient;
use crate::error::AppError;
use crate::models::session_keys;

/// Cart operations for one visitor session.
pub struct CartService<'a> {
    session: &'a Session,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// The current cart.
    pub async fn load(&self) -> Cart {
        match self.session.get::<Cart>(session_keys::CART_ITEMS).await {
            Ok(cart) => cart.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable cart entry");
                Cart::default()
            }
        }
    }

    /// Add `quantity` of a product, fetching its current details first.
    ///
    /// The quantity is clamped to the product's stock.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the product cannot be fetched and
    /// `AppError::Cart` if it is out of stock.
    pub async fn add(
        &self,
        api: &ApiClient,
        product_id: ProductId,
        quantity: u32,
        token: Option<&SecretString>,
    ) -> Result<Cart, AppError> {
        let product = api.get_product(product_id, token).await?;
        let quantity = product.clamp_quantity(quantity);

        let mut cart = self.load().await;
        cart.add(product, quantity)?;
        self.save(&cart).await?;

        info!(%product_id, quantity, "Added to cart");
        Ok(cart)
    }

    /// Set a line's quantity; zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the cart cannot be saved.
    pub async fn update_quantity(&self, id: CartItemId, quantity: i64) -> Result<Cart, AppError> {
        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);

        let mut cart = self.load().await;
        cart.update_quantity(id, quantity);
        self.save(&cart).await?;
        Ok(cart)
    }

    /// Remove a line. Unknown ids leave the cart unchanged.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the cart cannot be saved.
    pub async fn remove(&self, id: CartItemId) -> Result<Cart, AppError> {
        let mut cart = self.load().await;
        cart.remove(id);
        self.save(&cart).await?;
        Ok(cart)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the cart cannot be saved.
    pub async fn clear(&self) -> Result<Cart, AppError> {
        let cart = Cart::default();
        self.save(&cart).await?;
        Ok(cart)
    }

    /// Total units across all lines.
    pub async fn count(&self) -> u32 {
        self.load().await.item_count()
    }

    async fn save(&self, cart: &Cart) -> Result<(), AppError> {
        self.session.insert(session_keys::CART_ITEMS, cart).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;
    use wenshop_core::{Price, Product};

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn product(id: i64, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Produto {id}"),
            description: String::new(),
            price: Price::from_cents(5000),
            image_url: String::new(),
            category: "games".to_string(),
            stock,
        }
    }

    async fn seed(session: &Session) -> Cart {
        let mut cart = Cart::default();
        cart.add(product(1, 10), 2).unwrap();
        cart.add(product(2, 10), 1).unwrap();
        session.insert(session_keys::CART_ITEMS, &cart).await.unwrap();
        cart
    }

    #[tokio::test]
    async fn test_missing_cart_is_empty() {
        let session = session();
        assert!(CartService::new(&session).load().await.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_cart_is_empty() {
        let session = session();
        session
            .insert(session_keys::CART_ITEMS, "not a cart")
            .await
            .unwrap();
        assert!(CartService::new(&session).load().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_to_zero_removes_line() {
        let session = session();
        let seeded = seed(&session).await;
        let first = seeded.items().first().unwrap().id;

        let cart = CartService::new(&session)
            .update_quantity(first, -3)
            .await
            .unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(CartService::new(&session).count().await, 1);
    }

    #[tokio::test]
    async fn test_update_persists() {
        let session = session();
        let seeded = seed(&session).await;
        let first = seeded.items().first().unwrap().id;

        CartService::new(&session)
            .update_quantity(first, 5)
            .await
            .unwrap();
        assert_eq!(CartService::new(&session).count().await, 6);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let session = session();
        let seeded = seed(&session).await;
        let service = CartService::new(&session);

        let cart = service
            .remove(seeded.items().last().unwrap().id)
            .await
            .unwrap();
        assert_eq!(cart.item_count(), 2);

        let cart = service.clear().await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(service.count().await, 0);
    }
}

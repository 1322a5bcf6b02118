//! Catalog product as returned by the backend.

use serde::{Deserialize, Serialize};

use crate::{Price, ProductId};

/// A product in the catalog.
///
/// Field names follow the backend's camelCase JSON. The same shape is stored
/// inside each cart line as a snapshot taken when the line was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: String,
    pub category: String,
    pub stock: u32,
}

impl Product {
    /// Whether at least one unit is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Clamp a requested quantity to what can be bought: at least 1, at most
    /// the available stock.
    #[must_use]
    pub fn clamp_quantity(&self, requested: u32) -> u32 {
        requested.clamp(1, self.stock.max(1))
    }

    /// The category with its first character upper-cased, as shown on badges.
    #[must_use]
    pub fn category_label(&self) -> String {
        capitalize_first(&self.category)
    }
}

/// Upper-case the first character of `s`, leaving the rest untouched.
#[must_use]
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(stock: u32) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Fone Bluetooth".to_string(),
            description: "Cancelamento de ruído".to_string(),
            price: Price::from_cents(29_990),
            image_url: "https://img.example/fone.jpg".to_string(),
            category: "acessorios".to_string(),
            stock,
        }
    }

    #[test]
    fn test_deserialize_backend_json() {
        let json = r#"{
            "id": 3,
            "name": "Notebook",
            "description": "16GB RAM",
            "price": 4599.9,
            "imageUrl": "https://img.example/nb.jpg",
            "category": "laptops",
            "stock": 4
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.price, Price::from_cents(459_990));
        assert_eq!(product.image_url, "https://img.example/nb.jpg");
    }

    #[test]
    fn test_clamp_quantity() {
        let p = product(5);
        assert_eq!(p.clamp_quantity(0), 1);
        assert_eq!(p.clamp_quantity(3), 3);
        assert_eq!(p.clamp_quantity(9), 5);
        assert_eq!(product(0).clamp_quantity(4), 1);
    }

    #[test]
    fn test_in_stock() {
        assert!(product(1).in_stock());
        assert!(!product(0).in_stock());
    }

    #[test]
    fn test_category_label() {
        assert_eq!(product(1).category_label(), "Acessorios");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("éclair"), "Éclair");
    }
}

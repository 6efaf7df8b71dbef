//! Cart and catalog domain types.
//!
//! These mirror the slice shapes carried by the shared store so that typed
//! code (reducers, renderers, tests) can decode a snapshot slice instead of
//! walking raw JSON.

use serde::{Deserialize, Serialize};

/// A product offered by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable product identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: f64,
}

impl Product {
    /// Create a new product.
    pub fn new(id: u64, name: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
        }
    }
}

/// A line entry in the cart slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier this line refers to.
    pub id: u64,
    /// Display name, denormalized at add time.
    pub name: String,
    /// Unit price, denormalized at add time.
    pub price: f64,
    /// Number of units in the cart. Always at least one.
    pub quantity: u32,
}

impl CartItem {
    /// Create a one-unit line for a product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity: 1,
        }
    }

    /// Line subtotal (unit price times quantity).
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// The `cart` slice of the shared state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartState {
    /// Line entries, in insertion order.
    pub items: Vec<CartItem>,
}

impl CartState {
    /// Find a line by product id.
    #[must_use]
    pub fn find(&self, id: u64) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Cart total across all lines.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }
}

/// The `catalog` slice of the shared state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogState {
    /// Products currently offered.
    pub products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_totals() {
        let cart = CartState {
            items: vec![
                CartItem {
                    id: 1,
                    name: "Keyboard".to_string(),
                    price: 49.5,
                    quantity: 2,
                },
                CartItem {
                    id: 2,
                    name: "Mouse".to_string(),
                    price: 19.0,
                    quantity: 1,
                },
            ],
        };

        assert_eq!(cart.unit_count(), 3);
        assert!((cart.total() - 118.0).abs() < f64::EPSILON);
        assert_eq!(cart.find(2).map(|item| item.quantity), Some(1));
        assert!(cart.find(3).is_none());
    }

    #[test]
    fn test_line_from_product() {
        let product = Product::new(7, "Lamp", 12.25);
        let line = CartItem::from_product(&product);

        assert_eq!(line.id, 7);
        assert_eq!(line.quantity, 1);
        assert!((line.subtotal() - 12.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_slices_decode_from_empty_object() {
        let cart: CartState = serde_json::from_str("{}").unwrap();
        assert!(cart.items.is_empty());

        let catalog: CatalogState = serde_json::from_str("{}").unwrap();
        assert!(catalog.products.is_empty());
    }
}

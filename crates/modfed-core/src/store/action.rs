//! Store actions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Product;

/// Action kind strings understood by the default reducer.
pub mod kinds {
    /// Add one unit of a product to the cart.
    pub const ADD_ITEM: &str = "cart/addItem";
    /// Remove a line from the cart entirely.
    pub const REMOVE_ITEM: &str = "cart/removeItem";
    /// Empty the cart.
    pub const CLEAR_CART: &str = "cart/clearCart";
    /// Replace the catalog's product list.
    pub const SET_PRODUCTS: &str = "catalog/setProducts";
}

/// A dispatched store action.
///
/// Serializes with the `"type"` key for the kind, matching the wire shape
/// provider applications dispatch among themselves:
///
/// ```json
/// { "type": "cart/addItem", "payload": { "id": 1, "name": "X", "price": 10.0 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Action kind, e.g. `cart/addItem`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Kind-specific payload. `Null` for payload-less actions.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

impl Action {
    /// Create a payload-less action.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Value::Null,
        }
    }

    /// Create an action with a payload.
    pub fn with_payload(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// `cart/addItem` for one unit of a product.
    #[must_use]
    pub fn add_item(product: &Product) -> Self {
        Self::with_payload(
            kinds::ADD_ITEM,
            serde_json::json!({
                "id": product.id,
                "name": product.name,
                "price": product.price,
            }),
        )
    }

    /// `cart/removeItem` for a product id.
    #[must_use]
    pub fn remove_item(id: u64) -> Self {
        Self::with_payload(kinds::REMOVE_ITEM, serde_json::json!({ "id": id }))
    }

    /// `cart/clearCart`.
    #[must_use]
    pub fn clear_cart() -> Self {
        Self::new(kinds::CLEAR_CART)
    }

    /// `catalog/setProducts` replacing the whole product list.
    #[must_use]
    pub fn set_products(products: &[Product]) -> Self {
        Self::with_payload(
            kinds::SET_PRODUCTS,
            serde_json::json!({ "products": products }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_uses_type_key() {
        let action = Action::add_item(&Product::new(1, "X", 10.0));
        let json = serde_json::to_string(&action).unwrap();

        assert!(json.contains("\"type\":\"cart/addItem\""));
        assert!(json.contains("\"id\":1"));
        assert!(!json.contains("\"kind\""));
    }

    #[test]
    fn test_payloadless_action_omits_payload() {
        let json = serde_json::to_string(&Action::clear_cart()).unwrap();
        assert_eq!(json, "{\"type\":\"cart/clearCart\"}");

        let parsed: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.kind, kinds::CLEAR_CART);
        assert!(parsed.payload.is_null());
    }

    #[test]
    fn test_set_products_payload() {
        let action = Action::set_products(&[Product::new(3, "Desk", 120.0)]);
        assert_eq!(action.payload["products"][0]["name"], "Desk");
    }
}

//! Opaque state snapshots.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An opaque snapshot of the shared state: slice name to slice state.
///
/// The snapshot deliberately stays schemaless. Slices belong to whichever
/// application registered them; consumers that know a slice's shape decode
/// it with [`StateSnapshot::slice_as`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSnapshot(Map<String, Value>);

impl StateSnapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the snapshot has no slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw slice state, if the slice exists.
    #[must_use]
    pub fn slice(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Decode a slice into a typed value.
    ///
    /// Returns `None` if the slice is absent or does not decode as `T`.
    #[must_use]
    pub fn slice_as<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.slice(name)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Replace (or insert) a slice.
    pub fn set_slice(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    /// Builder-style [`StateSnapshot::set_slice`].
    #[must_use]
    pub fn with_slice(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set_slice(name, value);
        self
    }

    /// Names of the slices present, in insertion order.
    pub fn slice_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CartState;
    use crate::store::slices;

    #[test]
    fn test_slice_access() {
        let snapshot = StateSnapshot::new()
            .with_slice(slices::CART, serde_json::json!({ "items": [] }))
            .with_slice(slices::CATALOG, serde_json::json!({ "products": [] }));

        assert!(!snapshot.is_empty());
        assert!(snapshot.slice(slices::CART).is_some());
        assert!(snapshot.slice("checkout").is_none());
        assert_eq!(
            snapshot.slice_names().collect::<Vec<_>>(),
            vec![slices::CART, slices::CATALOG]
        );
    }

    #[test]
    fn test_typed_decode() {
        let snapshot = StateSnapshot::new().with_slice(
            slices::CART,
            serde_json::json!({
                "items": [{ "id": 1, "name": "X", "price": 10.0, "quantity": 2 }]
            }),
        );

        let cart: CartState = snapshot.slice_as(slices::CART).unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);

        // Absent and undecodable slices both come back as None.
        assert!(snapshot.slice_as::<CartState>("checkout").is_none());
        let bad = StateSnapshot::new().with_slice(slices::CART, serde_json::json!(42));
        assert!(bad.slice_as::<CartState>(slices::CART).is_none());
    }

    #[test]
    fn test_transparent_serialization() {
        let snapshot =
            StateSnapshot::new().with_slice(slices::CART, serde_json::json!({ "items": [] }));
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, "{\"cart\":{\"items\":[]}}");
    }
}

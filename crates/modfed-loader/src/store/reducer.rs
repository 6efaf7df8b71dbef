//! Default reducer for the cart and catalog slices.
//!
//! The reducer is a pure function: malformed payloads and unknown action
//! kinds reduce to the unchanged state rather than erroring, since a store
//! shared between applications will see actions it does not understand.

use std::sync::Arc;

use modfed_core::domain::{CartItem, CartState, CatalogState, Product};
use modfed_core::ports::Reducer;
use modfed_core::store::{Action, StateSnapshot, kinds, slices};

/// The initial snapshot: empty cart, empty catalog.
#[must_use]
pub fn initial_state() -> StateSnapshot {
    StateSnapshot::new()
        .with_slice(slices::CART, serde_json::json!({ "items": [] }))
        .with_slice(slices::CATALOG, serde_json::json!({ "products": [] }))
}

/// The reducer understood by the fallback store (and the demo provider).
#[must_use]
pub fn default_reducer() -> Reducer {
    Arc::new(reduce)
}

fn reduce(state: &StateSnapshot, action: &Action) -> StateSnapshot {
    match action.kind.as_str() {
        kinds::ADD_ITEM => with_cart(state, |cart| {
            let Ok(product) = serde_json::from_value::<Product>(action.payload.clone()) else {
                return;
            };
            match cart.items.iter_mut().find(|item| item.id == product.id) {
                Some(item) => item.quantity += 1,
                None => cart.items.push(CartItem::from_product(&product)),
            }
        }),
        kinds::REMOVE_ITEM => with_cart(state, |cart| {
            let Some(id) = action.payload.get("id").and_then(serde_json::Value::as_u64) else {
                return;
            };
            cart.items.retain(|item| item.id != id);
        }),
        kinds::CLEAR_CART => with_cart(state, |cart| cart.items.clear()),
        kinds::SET_PRODUCTS => {
            let Some(products) = action.payload.get("products") else {
                return state.clone();
            };
            let Ok(products) = serde_json::from_value::<Vec<Product>>(products.clone()) else {
                return state.clone();
            };
            encode_slice(state, slices::CATALOG, &CatalogState { products })
        }
        _ => state.clone(),
    }
}

/// Decode the cart slice (defaulting when absent), apply `mutate`, encode it
/// back.
fn with_cart(state: &StateSnapshot, mutate: impl FnOnce(&mut CartState)) -> StateSnapshot {
    let mut cart: CartState = state.slice_as(slices::CART).unwrap_or_default();
    mutate(&mut cart);
    encode_slice(state, slices::CART, &cart)
}

fn encode_slice<T: serde::Serialize>(state: &StateSnapshot, name: &str, slice: &T) -> StateSnapshot {
    match serde_json::to_value(slice) {
        Ok(value) => state.clone().with_slice(name, value),
        // Unencodable slice state cannot happen for these types; keep the
        // previous state rather than corrupt the snapshot.
        Err(_) => state.clone(),
    }
}

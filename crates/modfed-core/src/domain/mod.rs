//! Domain types shared across adapters.

mod cart;

pub use cart::{CartItem, CartState, CatalogState, Product};

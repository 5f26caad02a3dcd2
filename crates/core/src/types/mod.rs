//! Core types for GoMarketplace.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod line_item;
pub mod price;

pub use cart::{CartList, CartListError};
pub use id::ProductId;
pub use line_item::{LineItem, Product};
pub use price::Price;

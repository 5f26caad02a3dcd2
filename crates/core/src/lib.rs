//! GoMarketplace Core - Shared cart types.
//!
//! This crate provides the value types used by every GoMarketplace component:
//! - `cart` - Cart store, provider context and persistence
//! - `cli` - Command-line tool for inspecting and editing a persisted cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure list transforms - no I/O, no
//! storage access, no async runtime. Every cart mutation is computed here and
//! persisted elsewhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, line items and the cart list

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! LumiStyle Core - catalog, cart and stylist protocol.
//!
//! This crate provides the domain model shared by the storefront service and
//! its tests:
//! - [`catalog`] - read-only product catalog with lookup and category filter
//! - [`cart`] - variant-aware cart ledger
//! - [`types`] - product, price, chat and stylist response types
//!
//! # Architecture
//!
//! The core crate contains only types and rules - no I/O, no HTTP clients.
//! Clocks, configuration and the model client live in the storefront crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod types;

pub use cart::{CartItem, CartLedger, CartSnapshot, LineFilter, LineKey};
pub use catalog::{Catalog, CatalogError};
pub use types::*;

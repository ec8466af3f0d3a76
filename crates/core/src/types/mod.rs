//! Core types for LumiStyle.
//!
//! This module provides type-safe wrappers for the catalog, chat and
//! stylist protocol concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod status;
pub mod stylist;

pub use id::{ChatMessageId, ProductId};
pub use price::{NegativePriceError, Price, format_amount};
pub use product::{Category, CategoryFilter, ParseCategoryError, Product, Style};
pub use status::{ChatRole, ChatState};
pub use stylist::{
    APOLOGY_MESSAGE, FALLBACK_MESSAGE, StylistParseError, StylistResponse, UNCONFIGURED_MESSAGE,
    parse_stylist_reply,
};

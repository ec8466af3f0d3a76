//! Domain models for the storefront.

pub mod chat;

pub use chat::ChatMessage;

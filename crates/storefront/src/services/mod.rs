//! Business logic services for the storefront.

pub mod chat;

pub use chat::{ChatError, ChatSession, GREETING_MESSAGE, IMAGE_ONLY_PROMPT, PendingAdvice};

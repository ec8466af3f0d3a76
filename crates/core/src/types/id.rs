//! Newtype IDs for type-safe entity references.
//!
//! Product IDs are opaque strings supplied by the catalog; chat message IDs
//! are a per-session counter. Keeping them as distinct types prevents passing
//! one where the other is expected.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

/// Opaque catalog identifier (e.g. `"p1"`).
///
/// Serialized transparently as a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl ::core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for ProductId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProductId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Chat message identifier.
///
/// Allocated from a per-session counter, so ordering by ID is ordering by
/// creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatMessageId(u64);

impl ChatMessageId {
    /// Create a new ID from a u64 value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying u64 value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// The ID allocated after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl ::core::fmt::Display for ChatMessageId {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChatMessageId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChatMessageId> for u64 {
    fn from(id: ChatMessageId) -> Self {
        id.0
    }
}

//! Chat transcript entries.

use chrono::{DateTime, Utc};
use lumistyle_core::{ChatMessageId, ChatRole, ProductId};
use serde::Serialize;

/// One message in the stylist chat.
///
/// `image` holds the data URI the shopper attached, if any.
/// `recommendations` is only ever set on model messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub role: ChatRole,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<ProductId>>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// A shopper message.
    #[must_use]
    pub fn user(id: ChatMessageId, text: impl Into<String>, image: Option<String>) -> Self {
        Self {
            id,
            role: ChatRole::User,
            text: text.into(),
            image,
            recommendations: None,
            created_at: Utc::now(),
        }
    }

    /// A stylist message; an empty recommendation list is stored as `None`.
    #[must_use]
    pub fn model(
        id: ChatMessageId,
        text: impl Into<String>,
        recommendations: Vec<ProductId>,
    ) -> Self {
        Self {
            id,
            role: ChatRole::Model,
            text: text.into(),
            image: None,
            recommendations: (!recommendations.is_empty()).then_some(recommendations),
            created_at: Utc::now(),
        }
    }
}

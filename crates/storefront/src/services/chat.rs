//! Stylist chat session.
//!
//! An append-only transcript plus the request state that guards it: at most
//! one recommendation request is outstanding at a time.
//!
//! Sending is split in two so a caller holding the session behind a lock can
//! release it while the model call runs:
//!
//! ```text
//! submit()  -> user message appended, state = AwaitingResponse
//! (model call, no lock held)
//! resolve() -> model message appended, state = Idle
//! ```

use std::sync::Arc;

use lumistyle_core::{Catalog, ChatMessageId, ChatState, Product, ProductId, StylistResponse};
use thiserror::Error;

use crate::models::ChatMessage;
use crate::stylist::{GenerativeModel, ImageError, ImagePayload, Stylist};

/// First message of every session.
pub const GREETING_MESSAGE: &str = "Hello! I'm your LumiStyle AI Stylist. I can now suggest \
    specific sizes, colors, and the perfect accessories to complete your look. How can I help \
    you today?";

/// Prompt sent for a photo with no accompanying text.
pub const IMAGE_ONLY_PROMPT: &str = "Give me style advice based on this image";

/// Rejected chat input.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Neither text nor an image was supplied.
    #[error("message must contain text or an image")]
    EmptyMessage,

    /// The attached image could not be decoded.
    #[error("invalid image: {0}")]
    InvalidImage(#[from] ImageError),

    /// A recommendation request is already outstanding.
    #[error("a stylist request is already in progress")]
    RequestInFlight,
}

/// What the stylist should be asked after a successful submit.
#[derive(Debug, Clone)]
pub struct PendingAdvice {
    pub prompt: String,
    pub image: Option<ImagePayload>,
}

/// One shopper's conversation with the stylist.
#[derive(Debug)]
pub struct ChatSession {
    catalog: Arc<Catalog>,
    messages: Vec<ChatMessage>,
    next_id: ChatMessageId,
    state: ChatState,
    staged_image: Option<String>,
}

impl ChatSession {
    /// Start a session with the greeting message.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let mut session = Self {
            catalog,
            messages: Vec::new(),
            next_id: ChatMessageId::new(1),
            state: ChatState::Idle,
            staged_image: None,
        };
        let id = session.allocate_id();
        session
            .messages
            .push(ChatMessage::model(id, GREETING_MESSAGE, Vec::new()));
        session
    }

    /// Transcript in creation order.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Current request state.
    #[must_use]
    pub const fn state(&self) -> ChatState {
        self.state
    }

    /// Image waiting to be sent with the next message.
    #[must_use]
    pub fn staged_image(&self) -> Option<&str> {
        self.staged_image.as_deref()
    }

    /// Stage an image for the next message, replacing any staged one.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::InvalidImage` if the data URI does not decode.
    pub fn stage_image(&mut self, data_uri: impl Into<String>) -> Result<(), ChatError> {
        let data_uri = data_uri.into();
        ImagePayload::from_data_uri(&data_uri)?;
        self.staged_image = Some(data_uri);
        Ok(())
    }

    /// Drop the staged image, if any.
    pub fn clear_staged_image(&mut self) {
        self.staged_image = None;
    }

    /// Validate input, append the user message and enter `AwaitingResponse`.
    ///
    /// The explicit `image` wins over a staged one. On error the session is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::RequestInFlight` while awaiting a reply,
    /// `ChatError::EmptyMessage` for blank text with no image, and
    /// `ChatError::InvalidImage` for an undecodable image.
    pub fn submit(
        &mut self,
        text: &str,
        image: Option<String>,
    ) -> Result<PendingAdvice, ChatError> {
        if self.state.is_loading() {
            return Err(ChatError::RequestInFlight);
        }

        let text = text.trim();
        let image = image
            .filter(|uri| !uri.trim().is_empty())
            .or_else(|| self.staged_image.clone());

        if text.is_empty() && image.is_none() {
            return Err(ChatError::EmptyMessage);
        }

        let payload = image
            .as_deref()
            .map(ImagePayload::from_data_uri)
            .transpose()?;

        let id = self.allocate_id();
        self.messages.push(ChatMessage::user(id, text, image));
        self.staged_image = None;
        self.state = ChatState::AwaitingResponse;

        tracing::debug!(message_id = %id, has_image = payload.is_some(), "Chat message submitted");

        Ok(PendingAdvice {
            prompt: if text.is_empty() {
                IMAGE_ONLY_PROMPT.to_string()
            } else {
                text.to_string()
            },
            image: payload,
        })
    }

    /// Append the stylist's reply and return to `Idle`.
    ///
    /// Returns a copy of the appended message.
    pub fn resolve(&mut self, response: StylistResponse) -> ChatMessage {
        let id = self.allocate_id();
        let message = ChatMessage::model(id, response.message, response.recommended_product_ids);
        self.messages.push(message.clone());
        self.state = ChatState::Idle;

        tracing::debug!(
            message_id = %id,
            recommendations = message.recommendations.as_ref().map_or(0, Vec::len),
            "Chat reply appended"
        );
        message
    }

    /// Submit, ask the stylist and resolve in one step.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`ChatSession::submit`]; the stylist call
    /// itself cannot fail.
    pub async fn post_user_message<M: GenerativeModel>(
        &mut self,
        text: &str,
        image: Option<String>,
        stylist: &Stylist<M>,
    ) -> Result<ChatMessage, ChatError> {
        let pending = self.submit(text, image)?;
        let response = stylist.get_advice(&pending.prompt, pending.image).await;
        Ok(self.resolve(response))
    }

    /// Products for a message's recommendation IDs, skipping unknown ones.
    #[must_use]
    pub fn resolve_recommendations(&self, ids: &[ProductId]) -> Vec<&Product> {
        self.catalog
            .resolve(ids)
            .into_iter()
            .map(|(_, product)| product)
            .collect()
    }

    fn allocate_id(&mut self) -> ChatMessageId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }
}

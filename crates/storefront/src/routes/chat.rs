//! Stylist chat route handlers.
//!
//! The session lock is released while the model call runs; a second post in
//! that window gets 409. The call and its resolution run in a spawned task,
//! so a dropped request still leaves the session idle.

use axum::{Json, extract::State, http::StatusCode};
use lumistyle_core::ChatState;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::ChatMessage;
use crate::services::ChatSession;
use crate::state::AppState;

use super::products::ProductView;

/// Chat message with its recommendations resolved to products.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageView {
    #[serde(flatten)]
    pub message: ChatMessage,
    /// Recommended products in order; unknown IDs are skipped.
    pub products: Vec<ProductView>,
}

impl ChatMessageView {
    fn new(session: &ChatSession, message: &ChatMessage) -> Self {
        let products = message
            .recommendations
            .as_deref()
            .map(|ids| {
                session
                    .resolve_recommendations(ids)
                    .into_iter()
                    .map(ProductView::from)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            message: message.clone(),
            products,
        }
    }
}

/// Full transcript.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatView {
    pub state: ChatState,
    pub has_staged_image: bool,
    pub messages: Vec<ChatMessageView>,
}

/// Post message request.
#[derive(Debug, Default, Deserialize)]
pub struct PostMessageRequest {
    #[serde(default)]
    pub text: String,
    pub image: Option<String>,
}

/// Messages appended by one post: the shopper's, then the stylist's.
#[derive(Debug, Serialize)]
pub struct PostMessageResponse {
    pub messages: Vec<ChatMessageView>,
}

/// Stage image request.
#[derive(Debug, Deserialize)]
pub struct StageImageRequest {
    pub image: String,
}

/// Show the transcript.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<ChatView> {
    let session = state.chat().lock().await;
    Json(ChatView {
        state: session.state(),
        has_staged_image: session.staged_image().is_some(),
        messages: session
            .messages()
            .iter()
            .map(|message| ChatMessageView::new(&session, message))
            .collect(),
    })
}

/// Post a shopper message and wait for the stylist's reply.
#[instrument(skip(state, request), fields(has_image = request.image.is_some()))]
pub async fn post(
    State(state): State<AppState>,
    Json(request): Json<PostMessageRequest>,
) -> Result<Json<PostMessageResponse>> {
    let (pending, user_message) = {
        let mut session = state.chat().lock().await;
        let pending = session.submit(&request.text, request.image)?;
        let user_message = session.messages().last().cloned();
        (pending, user_message)
    };

    let task_state = state.clone();
    let task = tokio::spawn(async move {
        let response = task_state
            .stylist()
            .get_advice(&pending.prompt, pending.image)
            .await;

        let mut session = task_state.chat().lock().await;
        let reply = session.resolve(response);

        user_message
            .iter()
            .chain(std::iter::once(&reply))
            .map(|message| ChatMessageView::new(&session, message))
            .collect::<Vec<_>>()
    });

    let messages = task
        .await
        .map_err(|e| AppError::Internal(format!("Stylist task failed: {e}")))?;

    Ok(Json(PostMessageResponse { messages }))
}

/// Stage an image for the next message.
#[instrument(skip(state, request))]
pub async fn stage_image(
    State(state): State<AppState>,
    Json(request): Json<StageImageRequest>,
) -> Result<StatusCode> {
    state.chat().lock().await.stage_image(request.image)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Clear the staged image.
#[instrument(skip(state))]
pub async fn clear_image(State(state): State<AppState>) -> StatusCode {
    state.chat().lock().await.clear_staged_image();
    StatusCode::NO_CONTENT
}

//! Error types for the stylist model client.
//!
//! None of these leave [`super::Stylist::get_advice`]; they are logged and
//! turned into a degraded reply there.

use std::time::Duration;

use lumistyle_core::StylistParseError;
use thiserror::Error;

/// Errors that can occur when asking the model for advice.
#[derive(Debug, Error)]
pub enum StylistError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gemini API returned an error.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse the API envelope.
    #[error("parse error: {0}")]
    Parse(String),

    /// The model produced no text.
    #[error(
        "empty response from model (finish reason: {})",
        .finish_reason.as_deref().unwrap_or("none")
    )]
    EmptyResponse {
        /// Why the first candidate stopped, if one was returned.
        finish_reason: Option<String>,
    },

    /// The prompt was blocked by the provider.
    #[error("prompt blocked: {0}")]
    Blocked(String),

    /// The model text did not match the reply schema.
    #[error("invalid stylist reply: {0}")]
    Reply(#[from] StylistParseError),

    /// No reply within the configured bound.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// API error response from Gemini.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// Error message.
    pub message: String,
    /// Canonical status name (e.g. `INVALID_ARGUMENT`).
    #[serde(default)]
    pub status: Option<String>,
}

impl ApiError {
    /// Message prefixed with the canonical status name when one is given.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.status {
            Some(status) => format!("{status}: {}", self.message),
            None => self.message.clone(),
        }
    }
}

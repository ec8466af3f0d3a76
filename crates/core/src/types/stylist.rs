//! Structured stylist replies.
//!
//! The model is asked for `{"message": string, "recommendedProductIds": string[]}`.
//! Its output is untrusted: [`parse_stylist_reply`] requires a JSON object and
//! salvages each field independently, substituting a fallback when a field
//! is missing or has the wrong shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::id::ProductId;

/// Substituted when the reply carries no usable `message`.
pub const FALLBACK_MESSAGE: &str = "I've curated a few pieces for you.";

/// Returned without any network attempt when no credential is configured.
pub const UNCONFIGURED_MESSAGE: &str =
    "API Key missing. Please configure it to get personalized advice.";

/// Returned when the recommendation call fails for any reason.
pub const APOLOGY_MESSAGE: &str = "I'm having trouble connecting to my style database \
    right now. Please try again in a moment!";

/// A stylist reply: free text plus catalog IDs in recommendation order.
///
/// The ID list is not bounded and not validated against the catalog;
/// consumers skip IDs they cannot resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylistResponse {
    pub message: String,
    pub recommended_product_ids: Vec<ProductId>,
}

impl StylistResponse {
    /// Degraded reply used when no model credential is configured.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            message: UNCONFIGURED_MESSAGE.to_string(),
            recommended_product_ids: Vec::new(),
        }
    }

    /// Degraded reply used when the model call fails.
    #[must_use]
    pub fn apology() -> Self {
        Self {
            message: APOLOGY_MESSAGE.to_string(),
            recommended_product_ids: Vec::new(),
        }
    }
}

/// Reply text that cannot be turned into a [`StylistResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StylistParseError {
    /// Model returned no text at all.
    #[error("empty response body")]
    EmptyBody,

    /// Text is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// JSON is valid but not an object.
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Parse model output into a [`StylistResponse`].
///
/// A Markdown code fence around the JSON is tolerated. Within the object,
/// a missing or blank `message` becomes [`FALLBACK_MESSAGE`], a missing
/// `recommendedProductIds` becomes an empty list, and non-string IDs are
/// dropped.
///
/// # Errors
///
/// Returns `StylistParseError` if the text is empty, not JSON, or not a
/// JSON object.
pub fn parse_stylist_reply(text: &str) -> Result<StylistResponse, StylistParseError> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(StylistParseError::EmptyBody);
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| StylistParseError::InvalidJson(e.to_string()))?;

    let Value::Object(fields) = value else {
        return Err(StylistParseError::NotAnObject(json_kind(&value)));
    };

    let message = fields
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(FALLBACK_MESSAGE)
        .to_string();

    let recommended_product_ids = fields
        .get("recommendedProductIds")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(Value::as_str)
                .map(ProductId::from)
                .collect()
        })
        .unwrap_or_default();

    Ok(StylistResponse {
        message,
        recommended_product_ids,
    })
}

/// Remove a surrounding ```` ``` ```` / ```` ```json ```` fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! Types for the Gemini `generateContent` API.
//!
//! These types match the REST wire format (camelCase JSON).

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

/// A turn of content: an ordered list of parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// "user" or "model"; omitted for system instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One part of a content turn: text or inline binary data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline binary content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    /// A text part.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// An inline data part; `bytes` are base64-encoded on the wire.
    #[must_use]
    pub fn inline_data(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: BASE64.encode(bytes),
            }),
        }
    }
}

/// Base64 payload with its declared mime type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// Mime type (e.g. "image/jpeg").
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// System instruction (catalog grounding and rules).
    pub system_instruction: Content,
    /// Conversation contents.
    pub contents: Vec<Content>,
    /// Output constraints.
    pub generation_config: GenerationConfig,
}

/// Generation settings constraining the output format.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Output mime type; "application/json" for structured replies.
    pub response_mime_type: String,
    /// Schema the JSON output must follow.
    pub response_schema: serde_json::Value,
}

/// Response from `generateContent`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates; usually one.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Feedback when the prompt itself was rejected.
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, or `None` if it has none.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();

        if text.trim().is_empty() { None } else { Some(text) }
    }

    /// Why the first candidate stopped, if there is one.
    #[must_use]
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }

    /// Block reason reported for the prompt, if any.
    #[must_use]
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback.as_ref()?.block_reason.as_deref()
    }
}

/// A generated candidate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content.
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped (e.g. "STOP", "MAX_TOKENS", "SAFETY").
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Prompt-level feedback.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Why the prompt was blocked.
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Schema of the stylist reply: `{message: string, recommendedProductIds: string[]}`.
#[must_use]
pub fn stylist_response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "message": {
                "type": "STRING",
                "description": "The stylist's concise visual analysis and item-by-item reasoning."
            },
            "recommendedProductIds": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "IDs of recommended products from the catalog."
            }
        },
        "required": ["message", "recommendedProductIds"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_serialization() {
        let json = serde_json::to_string(&Part::text("Hello")).expect("serialize");
        assert_eq!(json, r#"{"text":"Hello"}"#);

        let json =
            serde_json::to_string(&Part::inline_data("image/jpeg", b"abc")).expect("serialize");
        assert_eq!(json, r#"{"inlineData":{"mimeType":"image/jpeg","data":"YWJj"}}"#);
    }

    #[test]
    fn test_request_serialization_uses_camel_case() {
        let request = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part::text("rules")],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text("hi")],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: stylist_response_schema(),
            },
        };

        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "rules");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            json["generationConfig"]["responseSchema"]["required"][1],
            "recommendedProductIds"
        );
        assert!(json["systemInstruction"].get("role").is_none());
    }

    #[test]
    fn test_response_text_concatenates_first_candidate() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "{\"message\":"}, {"text": "\"Hi\"}"}]
                },
                "finishReason": "STOP"
            }]
        }"#;

        let response: GenerateContentResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.text().as_deref(), Some(r#"{"message":"Hi"}"#));
    }

    #[test]
    fn test_response_text_none_when_blocked() {
        let json = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;

        let response: GenerateContentResponse = serde_json::from_str(json).expect("deserialize");
        assert!(response.text().is_none());
        assert_eq!(response.block_reason(), Some("SAFETY"));
        assert_eq!(response.finish_reason(), None);
    }

    #[test]
    fn test_response_finish_reason_without_text() {
        let json = r#"{"candidates": [{"content": {"parts": []}, "finishReason": "MAX_TOKENS"}]}"#;

        let response: GenerateContentResponse = serde_json::from_str(json).expect("deserialize");
        assert!(response.text().is_none());
        assert_eq!(response.finish_reason(), Some("MAX_TOKENS"));
    }
}

//! Gemini API client for stylist requests.
//!
//! Non-streaming `generateContent` calls with a JSON response schema.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::config::StylistConfig;

use super::error::{ApiErrorResponse, StylistError};
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    stylist_response_schema,
};
use super::{AdviceRequest, GenerativeModel};

const API_KEY_HEADER: &str = "x-goog-api-key";
const JSON_MIME: &str = "application/json";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Gemini API client.
///
/// Cheap to clone; the HTTP connection pool is shared.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &StylistConfig) -> Result<Self, StylistError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MIME));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                api_key: config.api_key.clone(),
                model: config.model.clone(),
                endpoint: endpoint_for_model(&config.api_base, &config.model),
            }),
        })
    }

    /// The `generateContent` URL this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Send a `generateContent` request and get the complete response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API returns an error status.
    #[instrument(skip(self, request), fields(model = %self.inner.model))]
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, StylistError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(API_KEY_HEADER, self.inner.api_key.expose_secret())
            .json(request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle a response, parsing the body on success.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<GenerateContentResponse, StylistError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| StylistError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(self.handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> StylistError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return StylistError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return StylistError::Unauthorized(format!("Gemini rejected the API key ({status})"));
        }

        // Try to parse API error response
        match response.text().await {
            Ok(body) => {
                let message = serde_json::from_str::<ApiErrorResponse>(&body)
                    .map_or(body, |api_error| api_error.error.describe());
                StylistError::Api {
                    status: status.as_u16(),
                    message,
                }
            }
            Err(e) => StylistError::Http(e),
        }
    }
}

impl GenerativeModel for GeminiClient {
    fn model_name(&self) -> &str {
        &self.inner.model
    }

    async fn generate(&self, request: &AdviceRequest) -> Result<String, StylistError> {
        let response = self.generate_content(&build_request(request)).await?;

        if let Some(text) = response.text() {
            return Ok(text);
        }

        if let Some(reason) = response.block_reason() {
            return Err(StylistError::Blocked(reason.to_string()));
        }

        let finish_reason = response.finish_reason().map(str::to_string);
        tracing::warn!(finish_reason = ?finish_reason, "Gemini returned no text");
        Err(StylistError::EmptyResponse { finish_reason })
    }
}

/// Build the wire request: `[text, image?]` parts under a JSON schema.
#[must_use]
pub fn build_request(request: &AdviceRequest) -> GenerateContentRequest {
    let mut parts = vec![Part::text(request.text.as_str())];
    if let Some(image) = &request.image {
        parts.push(Part::inline_data(image.mime_type.as_str(), &image.bytes));
    }

    GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part::text(request.system_instruction.as_str())],
        },
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        generation_config: GenerationConfig {
            response_mime_type: JSON_MIME.to_string(),
            response_schema: stylist_response_schema(),
        },
    }
}

/// `{base}/models/{model}:generateContent`, accepting `models/`-prefixed IDs.
fn endpoint_for_model(api_base: &str, model: &str) -> String {
    let trimmed = model.trim();
    let model_path = if trimmed.starts_with("models/") {
        trimmed.to_string()
    } else {
        format!("models/{trimmed}")
    };
    format!(
        "{}/{}:generateContent",
        api_base.trim_end_matches('/'),
        model_path
    )
}

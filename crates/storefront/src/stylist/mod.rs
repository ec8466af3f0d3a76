//! AI stylist.
//!
//! [`Stylist::get_advice`] never fails: an unconfigured stylist answers with
//! a fixed notice and makes no network call, and every model failure is
//! logged and replaced with an apology.

mod client;
mod error;
mod image;
mod prompt;
mod types;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use lumistyle_core::{Catalog, StylistResponse, parse_stylist_reply};
use tracing::instrument;

use crate::config::{DEFAULT_STYLIST_TIMEOUT, StorefrontConfig};

pub use client::{GeminiClient, build_request};
pub use error::{ApiError, ApiErrorResponse, StylistError};
pub use image::{DEFAULT_IMAGE_MIME, ImageError, ImagePayload};
pub use prompt::{DEFAULT_USER_PROMPT, render_system_instruction, user_prompt};
pub use types::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, Part, PromptFeedback, stylist_response_schema,
};

/// One model call: system instruction, shopper text, optional photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceRequest {
    pub system_instruction: String,
    pub text: String,
    pub image: Option<ImagePayload>,
}

/// A generative model that answers with raw reply text.
pub trait GenerativeModel: Send + Sync {
    /// Model identifier, for logs.
    fn model_name(&self) -> &str;

    /// Run one request and return the model's text output.
    fn generate(
        &self,
        request: &AdviceRequest,
    ) -> impl Future<Output = Result<String, StylistError>> + Send;
}

/// Recommendation client grounded in the catalog.
pub struct Stylist<M = GeminiClient> {
    model: Option<M>,
    catalog: Arc<Catalog>,
    store_name: String,
    timeout: Duration,
}

impl Stylist<GeminiClient> {
    /// Build the stylist from configuration.
    ///
    /// No API key configured yields an unconfigured stylist, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(
        config: &StorefrontConfig,
        catalog: Arc<Catalog>,
    ) -> Result<Self, StylistError> {
        let (model, timeout) = match &config.stylist {
            Some(stylist) => (Some(GeminiClient::new(stylist)?), stylist.timeout),
            None => (None, DEFAULT_STYLIST_TIMEOUT),
        };

        Ok(Self::new(model, catalog, config.store_name.clone(), timeout))
    }
}

impl<M: GenerativeModel> Stylist<M> {
    /// Create a stylist around `model`; `None` means unconfigured.
    pub fn new(
        model: Option<M>,
        catalog: Arc<Catalog>,
        store_name: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            model,
            catalog,
            store_name: store_name.into(),
            timeout,
        }
    }

    /// Whether a model credential is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    /// Catalog the stylist recommends from.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Ask for styling advice on `text` and an optional photo.
    ///
    /// Blank text is replaced with [`DEFAULT_USER_PROMPT`]. Returned IDs are
    /// passed through as the model gave them; callers skip unknown ones.
    #[instrument(skip(self, text, image), fields(has_image = image.is_some()))]
    pub async fn get_advice(&self, text: &str, image: Option<ImagePayload>) -> StylistResponse {
        let Some(model) = &self.model else {
            tracing::warn!("Stylist requested but no Gemini API key is configured");
            return StylistResponse::unconfigured();
        };

        match self.try_get_advice(model, text, image).await {
            Ok(response) => {
                tracing::info!(
                    model = model.model_name(),
                    recommendations = response.recommended_product_ids.len(),
                    "Stylist advice generated"
                );
                response
            }
            Err(StylistError::Reply(e)) => {
                tracing::warn!(error = %e, "Stylist reply did not match the schema");
                StylistResponse::apology()
            }
            Err(e) => {
                tracing::error!(error = %e, model = model.model_name(), "Stylist request failed");
                StylistResponse::apology()
            }
        }
    }

    async fn try_get_advice(
        &self,
        model: &M,
        text: &str,
        image: Option<ImagePayload>,
    ) -> Result<StylistResponse, StylistError> {
        let request = AdviceRequest {
            system_instruction: render_system_instruction(&self.store_name, &self.catalog),
            text: user_prompt(text).to_string(),
            image,
        };

        let reply = tokio::time::timeout(self.timeout, model.generate(&request))
            .await
            .map_err(|_| StylistError::Timeout(self.timeout))??;

        Ok(parse_stylist_reply(&reply)?)
    }
}

//! Application state shared across handlers.

use std::sync::Arc;

use lumistyle_core::{Catalog, CartLedger};
use tokio::sync::Mutex;

use crate::config::StorefrontConfig;
use crate::services::ChatSession;
use crate::stylist::{GeminiClient, Stylist, StylistError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The cart and the chat session each sit
/// behind their own mutex so mutations to either are serialized.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<Catalog>,
    cart: Mutex<CartLedger>,
    chat: Mutex<ChatSession>,
    stylist: Stylist<GeminiClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the stylist's HTTP client cannot be built.
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Result<Self, StylistError> {
        let catalog = Arc::new(catalog);
        let stylist = Stylist::from_config(&config, Arc::clone(&catalog))?;
        let chat = ChatSession::new(Arc::clone(&catalog));

        if !stylist.is_configured() {
            tracing::warn!(
                "GEMINI_API_KEY not set; the stylist will answer with a configuration notice"
            );
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart: Mutex::new(CartLedger::new()),
                chat: Mutex::new(chat),
                stylist,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// The shopper's cart.
    #[must_use]
    pub fn cart(&self) -> &Mutex<CartLedger> {
        &self.inner.cart
    }

    /// The stylist chat session.
    #[must_use]
    pub fn chat(&self) -> &Mutex<ChatSession> {
        &self.inner.chat
    }

    /// Get a reference to the stylist.
    #[must_use]
    pub fn stylist(&self) -> &Stylist<GeminiClient> {
        &self.inner.stylist
    }
}

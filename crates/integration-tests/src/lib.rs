//! Integration tests for the LumiStyle storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lumistyle-integration-tests
//! ```
//!
//! No external services are needed: the Gemini endpoint is replaced by a
//! local axum stub ([`GeminiStub`]) bound to an ephemeral port.
//!
//! # Test Categories
//!
//! - `cart_ledger` - Cart identity and totals against the bundled catalog
//! - `stylist_client` - Recommendation client against the stub
//! - `storefront_api` - JSON API through the full router

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use lumistyle_storefront::catalog::bundled_catalog;
use lumistyle_storefront::config::{StorefrontConfig, StylistConfig};
use lumistyle_storefront::state::AppState;
use secrecy::SecretString;
use serde_json::Value;

/// API key handed to the stub; never leaves the machine.
pub const TEST_API_KEY: &str = "test-gemini-key-9f3Kq2xZ";

/// Canned behaviour of the stub Gemini endpoint.
#[derive(Debug, Clone)]
pub struct StubReply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl StubReply {
    /// A 200 whose first candidate carries `text`.
    #[must_use]
    pub fn model_text(text: &str) -> Self {
        let body = serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        });
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// A 200 whose only candidate has no text and stopped for `finish_reason`.
    #[must_use]
    pub fn no_text(finish_reason: &str) -> Self {
        let body = serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": []},
                "finishReason": finish_reason
            }]
        });
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// A non-2xx status with a Gemini-style error body.
    #[must_use]
    pub fn error(status: StatusCode, message: &str) -> Self {
        let body = serde_json::json!({
            "error": {"code": status.as_u16(), "message": message, "status": "INTERNAL"}
        });
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// Delay the reply.
    #[must_use]
    pub const fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request the stub received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub api_key: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    reply: StubReply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Local stand-in for the Gemini `generateContent` endpoint.
pub struct GeminiStub {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl GeminiStub {
    /// Start a stub that answers every request with `reply`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(reply: StubReply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            reply,
            requests: Arc::clone(&requests),
        };

        let router = Router::new()
            .route("/v1beta/{*path}", post(stub_generate))
            .with_state(state);

        Self {
            addr: spawn_router(router).await,
            requests,
        }
    }

    /// API base URL to point the client at.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("http://{}/v1beta", self.addr)
    }

    /// Stylist configuration aimed at this stub.
    #[must_use]
    pub fn stylist_config(&self, timeout: Duration) -> StylistConfig {
        StylistConfig {
            api_base: self.api_base(),
            timeout,
            ..StylistConfig::new(SecretString::from(TEST_API_KEY))
        }
    }

    /// Requests received so far.
    ///
    /// # Panics
    ///
    /// Panics if the recording lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("stub lock").clone()
    }
}

async fn stub_generate(
    State(state): State<StubState>,
    request: Request<Body>,
) -> Response {
    let path = request.uri().path().to_string();
    let api_key = header_str(request.headers(), "x-goog-api-key");
    let bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    state
        .requests
        .lock()
        .expect("stub lock")
        .push(RecordedRequest { path, api_key, body });

    if !state.reply.delay.is_zero() {
        tokio::time::sleep(state.reply.delay).await;
    }

    (
        state.reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.reply.body.clone(),
    )
        .into_response()
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Serve `router` on an ephemeral local port.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn spawn_router(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    addr
}

/// Application state over the bundled catalog.
///
/// # Panics
///
/// Panics if the bundled catalog is invalid or the state cannot be built.
#[must_use]
pub fn test_state(stylist: Option<StylistConfig>) -> AppState {
    let config = StorefrontConfig {
        stylist,
        ..StorefrontConfig::default()
    };
    let catalog = bundled_catalog().expect("bundled catalog");
    AppState::new(config, catalog).expect("app state")
}

/// Build a JSON request.
///
/// # Panics
///
/// Panics if the request cannot be built.
#[must_use]
pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

/// Build a bodiless request.
///
/// # Panics
///
/// Panics if the request cannot be built.
#[must_use]
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

/// Read a response body as JSON.
///
/// # Panics
///
/// Panics if the body cannot be read or is not JSON.
pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

//! Request ID middleware.
//!
//! Each request carries an ID that ties together its log lines, any Sentry
//! event it raises, and the response the shopper's browser sees. An ID from
//! an upstream proxy is reused when it is well-formed; otherwise a UUID v4
//! is generated.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream ID accepted as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// The current request's ID, available to handlers as an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuse a well-formed upstream ID or generate a new one.
    fn from_header(value: Option<&HeaderValue>) -> Self {
        let upstream = value
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|id| is_valid_request_id(id));

        Self(upstream.map_or_else(|| Uuid::new_v4().to_string(), String::from))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Non-empty, bounded, and made of URL-safe characters.
fn is_valid_request_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

/// Middleware that ensures every request has a request ID.
///
/// The ID is recorded on the current span, tagged on the Sentry scope,
/// inserted as a [`RequestId`] extension and echoed in the response headers.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_header(request.headers().get(REQUEST_ID_HEADER));

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", request_id.as_str());
    });

    let header = HeaderValue::from_str(request_id.as_str()).ok();
    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;
    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

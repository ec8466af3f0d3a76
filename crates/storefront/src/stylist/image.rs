//! Uploaded photos.
//!
//! Browsers hand images over as data URIs (`data:image/png;base64,...`).
//! The header is stripped and the payload decoded before it reaches the
//! model client, which re-encodes it for the wire.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

/// Mime type assumed when the upload does not declare an image type.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Upload that cannot be decoded.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Data URI has no payload.
    #[error("image payload is empty")]
    Empty,

    /// Payload is not valid base64.
    #[error("image payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Decoded image bytes plus their mime type.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl ImagePayload {
    /// Decode a data URI, or a bare base64 string.
    ///
    /// The mime type comes from the header when it names an `image/*` type;
    /// otherwise [`DEFAULT_IMAGE_MIME`] is used.
    ///
    /// # Errors
    ///
    /// Returns `ImageError` if the payload is empty or not base64.
    pub fn from_data_uri(uri: &str) -> Result<Self, ImageError> {
        let uri = uri.trim();
        let (header, payload) = match uri.split_once(',') {
            Some((header, payload)) if header.starts_with("data:") => (Some(header), payload),
            _ => (None, uri),
        };

        let payload = payload.trim();
        if payload.is_empty() {
            return Err(ImageError::Empty);
        }

        let mime_type = header
            .and_then(|h| h.strip_prefix("data:"))
            .and_then(|h| h.split(';').next())
            .filter(|mime| mime.starts_with("image/"))
            .unwrap_or(DEFAULT_IMAGE_MIME)
            .to_string();

        Ok(Self {
            mime_type,
            bytes: BASE64.decode(payload)?,
        })
    }
}

//! HTTP fetch utilities for image paints.
//!
//! Provides a blocking HTTP GET wrapper used by the image resolver, and a
//! decoder for `data:` URLs so inline images never touch the network.

use base64::Engine;
use std::time::Duration;
use thiserror::Error;

/// User-Agent header sent with all requests.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Marker separating `data:` URL metadata from a base64 payload.
const BASE64_MARKER: &str = ";base64";

/// Errors produced while fetching or decoding a resource.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be built or the request failed.
    #[error("request failed: {0}")]
    Request(String),
    /// The server answered with a non-success status.
    #[error("HTTP error: {0}")]
    Status(String),
    /// The `data:` URL is malformed or its payload cannot be decoded.
    #[error("invalid data URL: {0}")]
    DataUrl(String),
}

/// A fetched resource: raw body bytes plus the server-reported media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResource {
    /// Response body.
    pub bytes: Vec<u8>,
    /// Value of the `Content-Type` header (or the `data:` URL media type).
    pub content_type: Option<String>,
}

impl FetchedResource {
    /// Whether the reported media type names an SVG document.
    #[must_use]
    pub fn is_svg_content_type(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("svg"))
    }
}

/// A parsed `data:` URL that can be decoded into raw bytes.
///
/// [RFC 2397](https://www.rfc-editor.org/rfc/rfc2397)
/// `data:[<mediatype>][;base64],<data>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataURL {
    /// Everything between `data:` and the first comma.
    metadata: String,
    /// Everything after the first comma, still encoded.
    payload: String,
}

impl DataURL {
    /// Split a raw `data:` URL into metadata and payload.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::DataUrl`] when the scheme is not `data:` or the
    /// separating comma is missing.
    pub fn parse(raw: &str) -> Result<Self, FetchError> {
        let rest = raw
            .strip_prefix("data:")
            .ok_or_else(|| FetchError::DataUrl("missing 'data:' scheme".to_string()))?;
        let (metadata, payload) = rest
            .split_once(',')
            .ok_or_else(|| FetchError::DataUrl("missing comma".to_string()))?;
        Ok(Self {
            metadata: metadata.to_string(),
            payload: payload.to_string(),
        })
    }

    /// The declared media type, e.g. `image/svg+xml`. Empty when omitted.
    #[must_use]
    pub fn media_type(&self) -> &str {
        self.metadata.split(';').next().unwrap_or_default()
    }

    /// Whether the payload is base64 encoded.
    #[must_use]
    pub fn is_base64(&self) -> bool {
        self.metadata.ends_with(BASE64_MARKER)
    }

    /// Decode the payload into raw bytes.
    ///
    /// Base64 payloads are decoded with the standard alphabet; anything else is
    /// percent-decoded.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::DataUrl`] if decoding fails.
    pub fn decode(&self) -> Result<Vec<u8>, FetchError> {
        if self.is_base64() {
            base64::engine::general_purpose::STANDARD
                .decode(self.payload.trim())
                .map_err(|e| FetchError::DataUrl(format!("base64 decode error: {e}")))
        } else {
            Ok(urlencoding::decode_binary(self.payload.as_bytes()).into_owned())
        }
    }

    /// Decode the payload as UTF-8 text (used for inline SVG markup).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::DataUrl`] if decoding fails or the bytes are not
    /// valid UTF-8.
    pub fn decode_text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.decode()?)
            .map_err(|e| FetchError::DataUrl(format!("payload is not UTF-8: {e}")))
    }
}

/// Fetch a URL and return its body together with its media type.
///
/// `data:` URLs are decoded locally.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created, the request fails,
/// the response has a non-success status, or the body cannot be read.
pub fn fetch_resource(url: &str) -> Result<FetchedResource, FetchError> {
    if url.starts_with("data:") {
        let data_url = DataURL::parse(url)?;
        return Ok(FetchedResource {
            bytes: data_url.decode()?,
            content_type: Some(data_url.media_type().to_string()).filter(|m| !m.is_empty()),
        });
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .build()
        .map_err(|e| FetchError::Request(format!("failed to create HTTP client: {e}")))?;

    let response = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .map_err(|e| FetchError::Request(e.to_string()))?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().to_string()));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let bytes = response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|e| FetchError::Request(format!("failed to read response body: {e}")))?;

    Ok(FetchedResource {
        bytes,
        content_type,
    })
}

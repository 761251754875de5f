//! Error types for the layer compiler.
//!
//! Nothing here is fatal to a whole conversion: captures fail to load, single
//! images fail to resolve, single layers fail to materialize.

use std::path::PathBuf;

use strata_common::net::FetchError;
use thiserror::Error;

/// A capture could not be loaded.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The capture file could not be read.
    #[error("failed to read capture {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The capture is not valid JSON or does not match the capture schema.
    #[error("invalid capture JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The capture parsed but describes an unusable document.
    #[error("invalid capture: {0}")]
    Invalid(String),
}

/// An image paint could not be turned into bytes or SVG markup.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Network or `data:` URL failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// A `data:` URL that is neither SVG nor base64 encoded.
    #[error("data URL could not be converted: {0}")]
    UnsupportedDataUrl(String),
    /// The resource claims to be SVG but is not UTF-8 text.
    #[error("SVG resource is not valid UTF-8: {0}")]
    InvalidSvg(String),
}

/// A single layer could not be created on the host canvas.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// `x`/`y` are NaN or infinite.
    #[error("layer coordinates are not finite: ({x}, {y})")]
    InvalidCoordinates {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// The host has no primitive for this layer.
    #[error("{0} layers are not supported by the host")]
    Unsupported(String),
    /// The host rejected the layer.
    #[error("host canvas error: {0}")]
    Host(String),
}

/// Conversion options could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`crate::ConvertOptions`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value parsed but is out of range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

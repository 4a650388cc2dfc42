//! Error types shared across the Affiche pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RenderError>;

/// Font resolution and measurement failures.
///
/// `Clone` because resolved-font futures are shared between concurrent
/// requesters; every waiter observes the same outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FontError {
    #[error("Unsupported font family: {0}")]
    UnsupportedFamily(String),

    #[error("Failed to fetch font '{family}': {reason}")]
    Fetch { family: String, reason: String },

    #[error("Font data for '{family}' could not be parsed")]
    InvalidData { family: String },
}

/// Asset (image/font bytes) retrieval failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to read asset '{location}': {reason}")]
    Io { location: String, reason: String },

    #[error("Unsupported asset location: {0}")]
    Unsupported(String),
}

/// A failure inside one `Renderer::render` chain.
///
/// Element renders are strictly sequential, so the first error rejects the
/// whole render and no partial artifact is returned.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid render dimensions: {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },

    #[error(transparent)]
    Font(#[from] FontError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("Failed to decode image for element '{key}': {reason}")]
    ImageDecode { key: String, reason: String },

    #[error("Failed to encode artifact: {0}")]
    Encode(String),

    #[error("Document backend error: {0}")]
    Document(String),
}

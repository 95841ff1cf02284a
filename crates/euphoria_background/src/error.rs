//! Image error types

use thiserror::Error;

/// Errors from measuring a background image
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    /// The image could not be fetched or decoded
    #[error("Failed to load image {url}: {reason}")]
    Failed { url: String, reason: String },

    /// The image loaded but reports no natural size
    #[error("Image {url} has no natural size")]
    ZeroSize { url: String },

    /// No image URL was available to load
    #[error("No background image URL")]
    EmptyUrl,
}

/// Result type for image operations
pub type Result<T> = std::result::Result<T, ImageError>;

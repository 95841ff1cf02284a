//! Effect error types

use thiserror::Error;

/// Errors surfaced while mounting or configuring a visual effect.
///
/// Runtime presentation failures (a detached element, a broken image) are not
/// errors: they degrade the effect and are only logged.
#[derive(Error, Debug)]
pub enum EffectError {
    /// Configuration was rejected
    #[error("Invalid effect configuration: {0}")]
    Config(String),

    /// A required element could not be found or created
    #[error("Missing element: {0}")]
    MissingElement(String),

    /// The background image could not be loaded
    #[error("Image load failed: {0}")]
    ImageLoad(String),

    /// The host environment refused an operation
    #[error("Host error: {0}")]
    Host(String),
}

/// Result type for effect operations
pub type Result<T> = std::result::Result<T, EffectError>;

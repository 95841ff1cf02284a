//! Background image load state

use euphoria_core::Size;

use crate::error::ImageError;

/// Outcome of measuring the background image
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ImageLoad {
    /// Not loaded yet
    #[default]
    Pending,
    /// Loaded with a usable natural size
    Loaded(Size),
    /// Load failed; geometry proceeds without a natural size
    Failed(ImageError),
}

impl ImageLoad {
    /// Build from a loader result, treating an empty natural size as failure
    pub fn from_result(url: &str, result: Result<Size, ImageError>) -> Self {
        match result {
            Ok(size) if size.is_positive() => ImageLoad::Loaded(size),
            Ok(_) => ImageLoad::Failed(ImageError::ZeroSize {
                url: url.to_string(),
            }),
            Err(err) => ImageLoad::Failed(err),
        }
    }

    /// Natural size, if known
    pub fn natural_size(&self) -> Option<Size> {
        match self {
            ImageLoad::Loaded(size) => Some(*size),
            _ => None,
        }
    }
}

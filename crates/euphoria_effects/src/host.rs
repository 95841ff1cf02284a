//! Host seams
//!
//! What an effect needs from its environment: the window (size, scroll,
//! events, frames, capability query), the element carrying the page
//! background, a way to create the peephole elements, and image loading.

use std::rc::Rc;

use euphoria_animation::FrameScheduler;
use euphoria_background::{BackgroundStyle, ImageError};
use euphoria_core::{EventSource, Rect, Size};

/// Input device class, evaluated once per mount
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerCapability {
    /// Precise pointer with hover
    #[default]
    Fine,
    /// Touch-like input, or no hover at all
    Coarse,
}

impl PointerCapability {
    /// Combine the `(pointer: coarse)` and `(hover: none)` media queries
    pub fn from_media(pointer_coarse: bool, hover_none: bool) -> Self {
        if pointer_coarse || hover_none {
            PointerCapability::Coarse
        } else {
            PointerCapability::Fine
        }
    }

    pub fn is_coarse(self) -> bool {
        self == PointerCapability::Coarse
    }
}

/// An element the effects write styles to
///
/// Writes to a detached element must be harmless no-ops.
pub trait StyleTarget {
    /// Set a regular style property (`transform`, `background-size`, ...)
    fn set_style(&self, name: &str, value: &str);

    /// Set a CSS custom property (`--cursor-active`, ...)
    fn set_property(&self, name: &str, value: &str);

    /// Rendered bounding box in viewport coordinates, `None` once detached
    fn bounding_rect(&self) -> Option<Rect>;

    /// Full scrollable content height, `None` once detached
    fn scroll_height(&self) -> Option<f32> {
        None
    }

    /// Detach the element if the effect created it
    fn remove(&self) {}
}

/// The element whose background the peepholes mirror
pub trait BackgroundSource {
    /// Computed `background-*` values
    fn computed_background(&self) -> BackgroundStyle;

    /// Rendered bounding box in viewport coordinates
    fn bounding_rect(&self) -> Rect;
}

/// What a peephole element should look like
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeepholeSpec<'a> {
    /// Class list for the root element
    pub class_name: &'a str,
    /// Diameter in pixels
    pub diameter: f32,
}

/// The two elements of a peephole: the moving root and its background layer
#[derive(Clone)]
pub struct PeepholeNodes {
    pub root: Rc<dyn StyleTarget>,
    pub layer: Rc<dyn StyleTarget>,
}

/// Called once with the image's natural size, or why it could not be had
pub type ImageCallback = Box<dyn FnOnce(Result<Size, ImageError>)>;

/// The window-level environment effects run in
pub trait EffectHost {
    /// Viewport size (`innerWidth` x `innerHeight`)
    fn viewport(&self) -> Size;

    /// Vertical document scroll offset
    fn scroll_top(&self) -> f32;

    fn pointer_capability(&self) -> PointerCapability;

    fn frames(&self) -> Rc<dyn FrameScheduler>;

    /// Window-level pointer, blur, scroll and resize events
    fn window_events(&self) -> Rc<dyn EventSource>;

    /// The element flagged as the background source, else the document root
    fn background_source(&self) -> Option<Rc<dyn BackgroundSource>>;

    /// Create and attach a peephole. `None` if the host cannot render one.
    fn create_peephole(&self, spec: &PeepholeSpec<'_>) -> Option<PeepholeNodes>;

    /// Load an image to learn its natural size. The callback may run later,
    /// or never if the host is torn down first.
    fn load_image(&self, url: &str, on_done: ImageCallback);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_from_media() {
        assert_eq!(PointerCapability::from_media(false, false), PointerCapability::Fine);
        assert!(PointerCapability::from_media(true, false).is_coarse());
        assert!(PointerCapability::from_media(false, true).is_coarse());
    }
}

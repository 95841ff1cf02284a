//! `web-sys` implementation of the effect host

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use anyhow::{anyhow, Context, Result};
use euphoria_animation::{FrameCallback, FrameHandle, FrameScheduler};
use euphoria_background::{BackgroundStyle, ImageError};
use euphoria_core::{EventSource, Rect, Size};
use euphoria_effects::{
    BackgroundSource, EffectHost, ImageCallback, PeepholeNodes, PeepholeSpec, PointerCapability,
};
use slotmap::{new_key_type, SlotMap};
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, Window};

use crate::dom::{DomEventSource, WebElement};

/// Marker attribute for the element whose background the peepholes mirror
pub const BACKGROUND_SOURCE_SELECTOR: &str = "[data-cursor-ring-source]";

// ============================================================================
// Frames
// ============================================================================

struct PendingFrame {
    id: Option<i32>,
    closure: Closure<dyn FnMut()>,
}

/// `requestAnimationFrame` scheduler
pub struct WebFrameScheduler {
    window: Window,
    pending: Rc<RefCell<SlotMap<FrameHandle, PendingFrame>>>,
}

impl WebFrameScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            pending: Rc::new(RefCell::new(SlotMap::with_key())),
        }
    }
}

impl FrameScheduler for WebFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameHandle> {
        let pending = Rc::downgrade(&self.pending);
        let mut slots = self.pending.borrow_mut();
        let handle = slots.insert_with_key(|handle| {
            let closure: Closure<dyn FnMut()> = Closure::once(move || {
                // Dropping our own closure mid-call is deferred by wasm-bindgen
                if let Some(pending) = pending.upgrade() {
                    pending.borrow_mut().remove(handle);
                }
                callback();
            });
            PendingFrame {
                id: None,
                closure,
            }
        });

        let requested = self
            .window
            .request_animation_frame(slots[handle].closure.as_ref().unchecked_ref());
        match requested {
            Ok(id) => {
                slots[handle].id = Some(id);
                Some(handle)
            }
            Err(err) => {
                warn!(?err, "requestAnimationFrame failed");
                slots.remove(handle);
                None
            }
        }
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let removed = self.pending.borrow_mut().remove(handle);
        if let Some(PendingFrame { id: Some(id), .. }) = removed {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}

impl Drop for WebFrameScheduler {
    fn drop(&mut self) {
        let ids: Vec<i32> = self
            .pending
            .borrow_mut()
            .drain()
            .filter_map(|(_, frame)| frame.id)
            .collect();
        for id in ids {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}

// ============================================================================
// Background source
// ============================================================================

/// Reads computed background styles from a DOM element
pub struct WebBackgroundSource {
    window: Window,
    element: Element,
}

impl WebBackgroundSource {
    pub fn new(window: Window, element: Element) -> Self {
        Self { window, element }
    }
}

impl BackgroundSource for WebBackgroundSource {
    fn computed_background(&self) -> BackgroundStyle {
        let Ok(Some(style)) = self.window.get_computed_style(&self.element) else {
            return BackgroundStyle::default();
        };
        let read = |name: &str| style.get_property_value(name).unwrap_or_default();
        BackgroundStyle {
            image: read("background-image"),
            size: read("background-size"),
            position: read("background-position"),
            attachment: read("background-attachment"),
            repeat: read("background-repeat"),
        }
    }

    fn bounding_rect(&self) -> Rect {
        let rect = self.element.get_bounding_client_rect();
        Rect::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        )
    }
}

// ============================================================================
// Images
// ============================================================================

new_key_type! {
    struct ImageKey;
}

struct PendingImage {
    image: HtmlImageElement,
    on_done: Option<ImageCallback>,
    _onload: Closure<dyn FnMut()>,
    _onerror: Closure<dyn FnMut()>,
}

impl Drop for PendingImage {
    fn drop(&mut self) {
        self.image.set_onload(None);
        self.image.set_onerror(None);
    }
}

type ImageSlots = Rc<RefCell<SlotMap<ImageKey, PendingImage>>>;

fn settle_image(slots: &Weak<RefCell<SlotMap<ImageKey, PendingImage>>>, key: ImageKey, url: &str, loaded: bool) {
    let Some(slots) = slots.upgrade() else {
        return;
    };
    let Some(mut pending) = slots.borrow_mut().remove(key) else {
        return;
    };
    let result = if loaded {
        Ok(Size::new(
            pending.image.natural_width() as f32,
            pending.image.natural_height() as f32,
        ))
    } else {
        Err(ImageError::Failed {
            url: url.to_string(),
            reason: "image failed to load".to_string(),
        })
    };
    if let Some(on_done) = pending.on_done.take() {
        on_done(result);
    }
}

// ============================================================================
// Host
// ============================================================================

/// The browser window as an [`EffectHost`]
pub struct WebHost {
    window: Window,
    document: Document,
    frames: Rc<WebFrameScheduler>,
    window_events: Rc<DomEventSource>,
    images: ImageSlots,
}

impl WebHost {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
        let document = window.document().ok_or_else(|| anyhow!("no document"))?;
        Ok(Self {
            frames: Rc::new(WebFrameScheduler::new(window.clone())),
            window_events: Rc::new(DomEventSource::new(window.clone().into())),
            images: Rc::new(RefCell::new(SlotMap::with_key())),
            window,
            document,
        })
    }

    fn matches_media(&self, query: &str) -> bool {
        matches!(self.window.match_media(query), Ok(Some(list)) if list.matches())
    }

    fn create_div(&self, class_name: &str) -> Result<HtmlElement> {
        let element = self
            .document
            .create_element("div")
            .map_err(|err| anyhow!("createElement failed: {err:?}"))?;
        element.set_class_name(class_name);
        element
            .dyn_into::<HtmlElement>()
            .map_err(|_| anyhow!("div is not an HtmlElement"))
    }

    fn build_peephole(&self, spec: &PeepholeSpec<'_>) -> Result<PeepholeNodes> {
        let body = self.document.body().context("document has no body")?;
        let root = self.create_div(spec.class_name)?;
        root.set_attribute("aria-hidden", "true")
            .map_err(|err| anyhow!("setAttribute failed: {err:?}"))?;
        let layer = self.create_div("cursor-ring__bg")?;
        root.append_child(&layer)
            .map_err(|err| anyhow!("appendChild failed: {err:?}"))?;
        body.append_child(&root)
            .map_err(|err| anyhow!("appendChild failed: {err:?}"))?;

        Ok(PeepholeNodes {
            root: Rc::new(WebElement::owned(root)),
            layer: Rc::new(WebElement::new(layer)),
        })
    }
}

impl EffectHost for WebHost {
    fn viewport(&self) -> Size {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Size::new(width as f32, height as f32)
    }

    fn scroll_top(&self) -> f32 {
        self.window.scroll_y().unwrap_or(0.0) as f32
    }

    fn pointer_capability(&self) -> PointerCapability {
        PointerCapability::from_media(
            self.matches_media("(pointer: coarse)"),
            self.matches_media("(hover: none)"),
        )
    }

    fn frames(&self) -> Rc<dyn FrameScheduler> {
        self.frames.clone()
    }

    fn window_events(&self) -> Rc<dyn EventSource> {
        self.window_events.clone()
    }

    fn background_source(&self) -> Option<Rc<dyn BackgroundSource>> {
        let element = self
            .document
            .query_selector(BACKGROUND_SOURCE_SELECTOR)
            .ok()
            .flatten()
            .or_else(|| self.document.body().map(Element::from))?;
        Some(Rc::new(WebBackgroundSource::new(self.window.clone(), element)))
    }

    fn create_peephole(&self, spec: &PeepholeSpec<'_>) -> Option<PeepholeNodes> {
        match self.build_peephole(spec) {
            Ok(nodes) => Some(nodes),
            Err(err) => {
                warn!("{err:#}");
                None
            }
        }
    }

    fn load_image(&self, url: &str, on_done: ImageCallback) {
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(err) => {
                warn!(?err, "cannot create image element");
                on_done(Err(ImageError::Failed {
                    url: url.to_string(),
                    reason: "cannot create image element".to_string(),
                }));
                return;
            }
        };

        let weak = Rc::downgrade(&self.images);
        let mut slots = self.images.borrow_mut();
        let key = slots.insert_with_key(|key| {
            let (load_slots, load_url) = (weak.clone(), url.to_string());
            let onload = Closure::<dyn FnMut()>::new(move || {
                settle_image(&load_slots, key, &load_url, true);
            });
            let (error_slots, error_url) = (weak.clone(), url.to_string());
            let onerror = Closure::<dyn FnMut()>::new(move || {
                settle_image(&error_slots, key, &error_url, false);
            });
            image.set_onload(Some(onload.as_ref().unchecked_ref()));
            image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            PendingImage {
                image: image.clone(),
                on_done: Some(on_done),
                _onload: onload,
                _onerror: onerror,
            }
        });
        drop(slots);

        debug!(url, ?key, "loading background image");
        image.set_src(url);
    }
}

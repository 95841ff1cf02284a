//! In-memory host for driving effects without a browser
//!
//! [`TestHost`] owns a window event dispatcher and a [`ManualFrameScheduler`];
//! tests dispatch events, pump frames and then read back what the effects
//! wrote to [`TestElement`]s.
//!
//! ```rust
//! use std::rc::Rc;
//! use euphoria_core::{Size, Event};
//! use euphoria_core::events::event_types;
//! use euphoria_effects::testing::TestHost;
//! use euphoria_effects::{CursorRing, CursorRingConfig, EffectHost};
//!
//! let host = Rc::new(TestHost::new(Size::new(1280.0, 720.0)));
//! let dyn_host: Rc<dyn EffectHost> = host.clone();
//! let ring = CursorRing::mount(&dyn_host, &CursorRingConfig::new("/bg.jpg"))
//!     .unwrap()
//!     .unwrap();
//!
//! host.dispatch(&Event::pointer(event_types::POINTER_MOVE, 100.0, 80.0));
//! host.frames().run_until_idle(500);
//! assert_eq!(ring.driver().current().intensity, 1.0);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use euphoria_animation::{FrameScheduler, ManualFrameScheduler};
use euphoria_background::{BackgroundStyle, ImageError};
use euphoria_core::{Event, EventDispatcher, EventHandler, EventSource, EventType, ListenerId, Rect, Size};

use crate::host::{
    BackgroundSource, EffectHost, ImageCallback, PeepholeNodes, PeepholeSpec, PointerCapability,
    StyleTarget,
};

/// A recorded element: styles, custom properties and its own events
pub struct TestElement {
    rect: Cell<Option<Rect>>,
    scroll_height: Cell<Option<f32>>,
    styles: RefCell<HashMap<String, String>>,
    properties: RefCell<HashMap<String, String>>,
    attributes: RefCell<HashMap<String, String>>,
    events: EventDispatcher,
    removed: Cell<bool>,
    writes: Cell<usize>,
    writes_after_removal: Cell<usize>,
}

impl TestElement {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect: Cell::new(Some(rect)),
            scroll_height: Cell::new(Some(rect.height)),
            styles: RefCell::default(),
            properties: RefCell::default(),
            attributes: RefCell::default(),
            events: EventDispatcher::new(),
            removed: Cell::new(false),
            writes: Cell::new(0),
            writes_after_removal: Cell::new(0),
        }
    }

    pub fn set_rect(&self, rect: Option<Rect>) {
        self.rect.set(rect);
    }

    pub fn set_scroll_height(&self, height: Option<f32>) {
        self.scroll_height.set(height);
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    pub fn style(&self, name: &str) -> Option<String> {
        self.styles.borrow().get(name).cloned()
    }

    pub fn property(&self, name: &str) -> Option<String> {
        self.properties.borrow().get(name).cloned()
    }

    /// A custom property parsed as pixels or a bare number
    pub fn property_f32(&self, name: &str) -> Option<f32> {
        let value = self.property(name)?;
        value.trim_end_matches("px").parse().ok()
    }

    /// Deliver an event to listeners registered on this element
    pub fn dispatch(&self, event: &Event) -> usize {
        self.events.dispatch(event)
    }

    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }

    pub fn is_removed(&self) -> bool {
        self.removed.get()
    }

    /// Style and property writes accepted so far
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Writes attempted after [`StyleTarget::remove`]
    pub fn writes_after_removal(&self) -> usize {
        self.writes_after_removal.get()
    }

    fn record(&self, map: &RefCell<HashMap<String, String>>, name: &str, value: &str) {
        if self.removed.get() {
            self.writes_after_removal.set(self.writes_after_removal.get() + 1);
            return;
        }
        self.writes.set(self.writes.get() + 1);
        map.borrow_mut().insert(name.to_string(), value.to_string());
    }
}

impl StyleTarget for TestElement {
    fn set_style(&self, name: &str, value: &str) {
        self.record(&self.styles, name, value);
    }

    fn set_property(&self, name: &str, value: &str) {
        self.record(&self.properties, name, value);
    }

    fn bounding_rect(&self) -> Option<Rect> {
        if self.removed.get() {
            None
        } else {
            self.rect.get()
        }
    }

    fn scroll_height(&self) -> Option<f32> {
        if self.removed.get() {
            None
        } else {
            self.scroll_height.get()
        }
    }

    fn remove(&self) {
        self.removed.set(true);
    }
}

impl EventSource for TestElement {
    fn listen(&self, event_type: EventType, handler: EventHandler) -> ListenerId {
        self.events.listen(event_type, handler)
    }

    fn unlisten(&self, id: ListenerId) -> bool {
        self.events.unlisten(id)
    }
}

/// Background source with settable computed style and box
pub struct TestBackgroundSource {
    style: RefCell<BackgroundStyle>,
    rect: Cell<Rect>,
}

impl TestBackgroundSource {
    pub fn new(style: BackgroundStyle, rect: Rect) -> Self {
        Self {
            style: RefCell::new(style),
            rect: Cell::new(rect),
        }
    }

    pub fn set_style(&self, style: BackgroundStyle) {
        *self.style.borrow_mut() = style;
    }

    pub fn set_rect(&self, rect: Rect) {
        self.rect.set(rect);
    }
}

impl BackgroundSource for TestBackgroundSource {
    fn computed_background(&self) -> BackgroundStyle {
        self.style.borrow().clone()
    }

    fn bounding_rect(&self) -> Rect {
        self.rect.get()
    }
}

/// A peephole created through [`EffectHost::create_peephole`]
#[derive(Clone)]
pub struct CreatedPeephole {
    pub class_name: String,
    pub diameter: f32,
    pub root: Rc<TestElement>,
    pub layer: Rc<TestElement>,
}

/// Headless [`EffectHost`]
pub struct TestHost {
    window: Rc<EventDispatcher>,
    frames: Rc<ManualFrameScheduler>,
    viewport: Cell<Size>,
    scroll_top: Cell<f32>,
    capability: Cell<PointerCapability>,
    background: RefCell<Option<Rc<TestBackgroundSource>>>,
    peepholes: RefCell<Vec<CreatedPeephole>>,
    pending_images: RefCell<Vec<(String, ImageCallback)>>,
    requested_images: RefCell<Vec<String>>,
}

impl TestHost {
    pub fn new(viewport: Size) -> Self {
        Self {
            window: Rc::new(EventDispatcher::new()),
            frames: Rc::new(ManualFrameScheduler::new()),
            viewport: Cell::new(viewport),
            scroll_top: Cell::new(0.0),
            capability: Cell::new(PointerCapability::Fine),
            background: RefCell::new(None),
            peepholes: RefCell::default(),
            pending_images: RefCell::default(),
            requested_images: RefCell::default(),
        }
    }

    pub fn with_capability(self, capability: PointerCapability) -> Self {
        self.capability.set(capability);
        self
    }

    pub fn with_background(self, source: Rc<TestBackgroundSource>) -> Self {
        *self.background.borrow_mut() = Some(source);
        self
    }

    pub fn frames(&self) -> &Rc<ManualFrameScheduler> {
        &self.frames
    }

    pub fn window(&self) -> &Rc<EventDispatcher> {
        &self.window
    }

    /// Deliver a window event. Returns the number of handlers called.
    pub fn dispatch(&self, event: &Event) -> usize {
        self.window.dispatch(event)
    }

    /// Scroll the document and fire `scroll`
    pub fn scroll_to(&self, top: f32) -> usize {
        self.scroll_top.set(top);
        self.dispatch(&Event::scroll(top))
    }

    /// Resize the viewport and fire `resize`
    pub fn resize(&self, viewport: Size) -> usize {
        self.viewport.set(viewport);
        self.dispatch(&Event::resize(viewport.width, viewport.height))
    }

    pub fn window_listener_count(&self) -> usize {
        self.window.listener_count()
    }

    pub fn peepholes(&self) -> Vec<CreatedPeephole> {
        self.peepholes.borrow().clone()
    }

    /// Every URL passed to `load_image`, in order
    pub fn requested_images(&self) -> Vec<String> {
        self.requested_images.borrow().clone()
    }

    pub fn pending_image_count(&self) -> usize {
        self.pending_images.borrow().len()
    }

    /// Complete the oldest pending load of `url`. Returns `false` if none.
    pub fn finish_image(&self, url: &str, result: Result<Size, ImageError>) -> bool {
        let callback = {
            let mut pending = self.pending_images.borrow_mut();
            match pending.iter().position(|(pending_url, _)| pending_url == url) {
                Some(index) => pending.remove(index).1,
                None => return false,
            }
        };
        callback(result);
        true
    }
}

impl EffectHost for TestHost {
    fn viewport(&self) -> Size {
        self.viewport.get()
    }

    fn scroll_top(&self) -> f32 {
        self.scroll_top.get()
    }

    fn pointer_capability(&self) -> PointerCapability {
        self.capability.get()
    }

    fn frames(&self) -> Rc<dyn FrameScheduler> {
        self.frames.clone()
    }

    fn window_events(&self) -> Rc<dyn EventSource> {
        self.window.clone()
    }

    fn background_source(&self) -> Option<Rc<dyn BackgroundSource>> {
        self.background
            .borrow()
            .clone()
            .map(|source| source as Rc<dyn BackgroundSource>)
    }

    fn create_peephole(&self, spec: &PeepholeSpec<'_>) -> Option<PeepholeNodes> {
        let bounds = Rect::new(0.0, 0.0, spec.diameter, spec.diameter);
        let root = Rc::new(TestElement::new(bounds));
        root.set_attribute("class", spec.class_name);
        root.set_attribute("aria-hidden", "true");
        let layer = Rc::new(TestElement::new(bounds));
        layer.set_attribute("class", "cursor-ring__bg");

        self.peepholes.borrow_mut().push(CreatedPeephole {
            class_name: spec.class_name.to_string(),
            diameter: spec.diameter,
            root: root.clone(),
            layer: layer.clone(),
        });
        Some(PeepholeNodes { root, layer })
    }

    fn load_image(&self, url: &str, on_done: ImageCallback) {
        self.requested_images.borrow_mut().push(url.to_string());
        self.pending_images
            .borrow_mut()
            .push((url.to_string(), on_done));
    }
}

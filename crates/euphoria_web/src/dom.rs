//! DOM-backed event sources and style targets

use std::cell::RefCell;

use euphoria_core::events::event_types;
use euphoria_core::{Event, EventHandler, EventSource, EventType, ListenerId, Rect};
use euphoria_effects::StyleTarget;
use slotmap::SlotMap;
use tracing::{trace, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, HtmlElement, MouseEvent, MutationObserver, MutationObserverInit, Node};

/// Convert a DOM event into an effect event
pub fn translate(event_type: EventType, event: &web_sys::Event) -> Event {
    match event_type {
        event_types::POINTER_MOVE | event_types::POINTER_DOWN | event_types::POINTER_LEAVE => {
            match event.dyn_ref::<MouseEvent>() {
                Some(mouse) => {
                    Event::pointer(event_type, mouse.client_x() as f32, mouse.client_y() as f32)
                }
                None => Event::new(event_type),
            }
        }
        event_types::SCROLL => {
            let top = web_sys::window()
                .and_then(|window| window.scroll_y().ok())
                .unwrap_or(0.0);
            Event::scroll(top as f32)
        }
        event_types::RESIZE => match web_sys::window() {
            Some(window) => {
                let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
                let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
                Event::resize(width as f32, height as f32)
            }
            None => Event::new(event_type),
        },
        _ => Event::new(event_type),
    }
}

enum DomListener {
    Event {
        name: &'static str,
        closure: Closure<dyn FnMut(web_sys::Event)>,
    },
    Mutation {
        observer: MutationObserver,
        _closure: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
    },
    /// Registration the target could not honour
    Inert,
}

/// An [`EventSource`] over a DOM `EventTarget`
///
/// Closures live in a slot map until `unlisten` or drop, so every
/// `addEventListener` is matched by a `removeEventListener`.
pub struct DomEventSource {
    target: EventTarget,
    listeners: RefCell<SlotMap<ListenerId, DomListener>>,
}

impl DomEventSource {
    pub fn new(target: EventTarget) -> Self {
        Self {
            target,
            listeners: RefCell::new(SlotMap::with_key()),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn observe_mutations(&self, handler: EventHandler) -> DomListener {
        let Some(node) = self.target.dyn_ref::<Node>() else {
            warn!("content mutations requested on a target that is not a node");
            return DomListener::Inert;
        };

        let closure = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |_records: js_sys::Array, _observer: MutationObserver| {
                handler(&Event::new(event_types::CONTENT_MUTATED));
            },
        );
        let observer = match MutationObserver::new(closure.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(err) => {
                warn!(?err, "MutationObserver unavailable");
                return DomListener::Inert;
            }
        };

        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        options.set_attributes(true);
        if let Err(err) = observer.observe_with_options(node, &options) {
            warn!(?err, "failed to observe content mutations");
            return DomListener::Inert;
        }

        DomListener::Mutation {
            observer,
            _closure: closure,
        }
    }

    fn add_listener(&self, event_type: EventType, handler: EventHandler) -> DomListener {
        let Some(name) = event_types::dom_name(event_type) else {
            warn!(event_type, "no DOM event for type");
            return DomListener::Inert;
        };

        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            handler(&translate(event_type, &event));
        });
        if let Err(err) = self
            .target
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
        {
            warn!(?err, name, "addEventListener failed");
            return DomListener::Inert;
        }
        DomListener::Event { name, closure }
    }
}

fn detach(target: &EventTarget, listener: DomListener) {
    match listener {
        DomListener::Event { name, closure } => {
            let _ = target.remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        }
        DomListener::Mutation { observer, .. } => observer.disconnect(),
        DomListener::Inert => {}
    }
}

impl EventSource for DomEventSource {
    fn listen(&self, event_type: EventType, handler: EventHandler) -> ListenerId {
        let listener = if event_type == event_types::CONTENT_MUTATED {
            self.observe_mutations(handler)
        } else {
            self.add_listener(event_type, handler)
        };
        trace!(event_type, "listener added");
        self.listeners.borrow_mut().insert(listener)
    }

    fn unlisten(&self, id: ListenerId) -> bool {
        let removed = self.listeners.borrow_mut().remove(id);
        match removed {
            Some(listener) => {
                detach(&self.target, listener);
                true
            }
            None => false,
        }
    }
}

impl Drop for DomEventSource {
    fn drop(&mut self) {
        let listeners: Vec<DomListener> =
            self.listeners.get_mut().drain().map(|(_, listener)| listener).collect();
        for listener in listeners {
            detach(&self.target, listener);
        }
    }
}

/// An element effects write styles to and listen on
pub struct WebElement {
    element: HtmlElement,
    events: DomEventSource,
    /// Created by an effect, detached on `remove`
    owned: bool,
}

impl WebElement {
    /// Wrap a page element. `remove` leaves it in the document.
    pub fn new(element: HtmlElement) -> Self {
        Self {
            events: DomEventSource::new(element.clone().into()),
            element,
            owned: false,
        }
    }

    /// Wrap an element an effect created
    pub fn owned(element: HtmlElement) -> Self {
        Self {
            owned: true,
            ..Self::new(element)
        }
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    pub fn events(&self) -> &DomEventSource {
        &self.events
    }
}

impl StyleTarget for WebElement {
    fn set_style(&self, name: &str, value: &str) {
        if let Err(err) = self.element.style().set_property(name, value) {
            trace!(?err, name, "style write rejected");
        }
    }

    fn set_property(&self, name: &str, value: &str) {
        self.set_style(name, value);
    }

    fn bounding_rect(&self) -> Option<Rect> {
        if !self.element.is_connected() {
            return None;
        }
        let rect = self.element.get_bounding_client_rect();
        Some(Rect::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        ))
    }

    fn scroll_height(&self) -> Option<f32> {
        self.element
            .is_connected()
            .then(|| self.element.scroll_height() as f32)
    }

    fn remove(&self) {
        if self.owned {
            self.element.remove();
        }
    }
}

impl EventSource for WebElement {
    fn listen(&self, event_type: EventType, handler: EventHandler) -> ListenerId {
        self.events.listen(event_type, handler)
    }

    fn unlisten(&self, id: ListenerId) -> bool {
        self.events.unlisten(id)
    }
}

//! Event sources
//!
//! The effects never talk to a window or element directly. They register
//! handlers on an [`EventSource`] and keep the returned [`ListenerId`] so the
//! registration can be undone symmetrically on unmount.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::geometry::Point;

/// Event type identifier
pub type EventType = u32;

/// Event types the effects listen to
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_MOVE: EventType = 3;
    pub const POINTER_LEAVE: EventType = 5;
    pub const SCROLL: EventType = 30;
    pub const RESIZE: EventType = 40;
    pub const WINDOW_BLUR: EventType = 51;
    /// Children or attributes of an observed element changed
    pub const CONTENT_MUTATED: EventType = 62;

    /// DOM event name for an event type, if it maps to one
    pub fn dom_name(event_type: EventType) -> Option<&'static str> {
        match event_type {
            POINTER_DOWN => Some("pointerdown"),
            POINTER_MOVE => Some("pointermove"),
            POINTER_LEAVE => Some("pointerleave"),
            SCROLL => Some("scroll"),
            RESIZE => Some("resize"),
            WINDOW_BLUR => Some("blur"),
            _ => None,
        }
    }
}

/// An input event delivered to effect handlers
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    pub data: EventData,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    /// Pointer position in viewport (client) coordinates
    Pointer { x: f32, y: f32 },
    /// Vertical document scroll offset
    Scroll { top: f32 },
    /// New viewport size
    Resize { width: f32, height: f32 },
    None,
}

impl Event {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            data: EventData::None,
        }
    }

    pub fn pointer(event_type: EventType, x: f32, y: f32) -> Self {
        Self {
            event_type,
            data: EventData::Pointer { x, y },
        }
    }

    pub fn scroll(top: f32) -> Self {
        Self {
            event_type: event_types::SCROLL,
            data: EventData::Scroll { top },
        }
    }

    pub fn resize(width: f32, height: f32) -> Self {
        Self {
            event_type: event_types::RESIZE,
            data: EventData::Resize { width, height },
        }
    }

    /// Client coordinates for pointer events
    pub fn client_point(&self) -> Option<Point> {
        match self.data {
            EventData::Pointer { x, y } => Some(Point::new(x, y)),
            _ => None,
        }
    }
}

new_key_type! {
    /// Handle to a registered listener
    pub struct ListenerId;
}

/// Event handler function type
///
/// Everything runs on the UI thread, so handlers are reference counted rather
/// than `Send + Sync`.
pub type EventHandler = Rc<dyn Fn(&Event)>;

/// Something effects can listen on: the window, or a single element
pub trait EventSource {
    /// Register a handler for one event type
    fn listen(&self, event_type: EventType, handler: EventHandler) -> ListenerId;

    /// Remove a handler. Returns `false` if it was already gone.
    fn unlisten(&self, id: ListenerId) -> bool;
}

struct Registration {
    event_type: EventType,
    handler: EventHandler,
}

/// In-memory event source
///
/// Used as the window/element stand-in by tests and by hosts that feed events
/// from their own loop.
pub struct EventDispatcher {
    listeners: RefCell<SlotMap<ListenerId, Registration>>,
    by_type: RefCell<FxHashMap<EventType, SmallVec<[ListenerId; 4]>>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(SlotMap::with_key()),
            by_type: RefCell::new(FxHashMap::default()),
        }
    }

    /// Dispatch an event to every handler registered for its type.
    ///
    /// Handlers are collected before any of them runs, so a handler may
    /// register or remove listeners. Returns the number of handlers invoked.
    pub fn dispatch(&self, event: &Event) -> usize {
        let handlers: SmallVec<[EventHandler; 4]> = {
            let listeners = self.listeners.borrow();
            let by_type = self.by_type.borrow();
            by_type
                .get(&event.event_type)
                .map(|ids| {
                    ids.iter()
                        .filter_map(|id| listeners.get(*id))
                        .map(|reg| reg.handler.clone())
                        .collect()
                })
                .unwrap_or_default()
        };

        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Total number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Number of listeners for one event type
    pub fn listener_count_for(&self, event_type: EventType) -> usize {
        self.by_type
            .borrow()
            .get(&event_type)
            .map_or(0, |ids| ids.len())
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for EventDispatcher {
    fn listen(&self, event_type: EventType, handler: EventHandler) -> ListenerId {
        let id = self.listeners.borrow_mut().insert(Registration {
            event_type,
            handler,
        });
        self.by_type
            .borrow_mut()
            .entry(event_type)
            .or_default()
            .push(id);
        id
    }

    fn unlisten(&self, id: ListenerId) -> bool {
        let Some(reg) = self.listeners.borrow_mut().remove(id) else {
            return false;
        };
        if let Some(ids) = self.by_type.borrow_mut().get_mut(&reg.event_type) {
            ids.retain(|other| *other != id);
        }
        true
    }
}

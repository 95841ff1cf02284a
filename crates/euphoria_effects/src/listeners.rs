//! Listener bookkeeping

use std::rc::Rc;

use euphoria_core::{EventHandler, EventSource, EventType, ListenerId};

/// Listeners an effect registered, removed together on drop
///
/// Every `add` is paired with exactly one `unlisten` on the same source.
#[derive(Default)]
pub struct ListenerSet {
    registrations: Vec<(Rc<dyn EventSource>, ListenerId)>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, source: &Rc<dyn EventSource>, event_type: EventType, handler: EventHandler) {
        let id = source.listen(event_type, handler);
        self.registrations.push((source.clone(), id));
    }

    /// Register one handler for several event types
    pub fn add_all(
        &mut self,
        source: &Rc<dyn EventSource>,
        event_types: &[EventType],
        handler: EventHandler,
    ) {
        for &event_type in event_types {
            self.add(source, event_type, handler.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Remove every registration now
    pub fn clear(&mut self) {
        for (source, id) in self.registrations.drain(..) {
            source.unlisten(id);
        }
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use euphoria_core::events::event_types;
    use euphoria_core::{Event, EventDispatcher};

    #[test]
    fn test_drop_unlistens_everything() {
        let window = Rc::new(EventDispatcher::new());
        let source: Rc<dyn EventSource> = window.clone();
        {
            let mut set = ListenerSet::new();
            set.add_all(
                &source,
                &[event_types::POINTER_MOVE, event_types::POINTER_DOWN],
                Rc::new(|_: &Event| {}),
            );
            set.add(&source, event_types::RESIZE, Rc::new(|_: &Event| {}));
            assert_eq!(set.len(), 3);
            assert_eq!(window.listener_count(), 3);
        }
        assert_eq!(window.listener_count(), 0);
    }
}

//! Background height sync
//!
//! Keeps an absolutely positioned background element as tall as the page
//! container's scrollable content.

use std::rc::{Rc, Weak};

use euphoria_core::events::event_types;
use euphoria_core::{Event, EventSource};
use tracing::trace;

use crate::host::{EffectHost, StyleTarget};
use crate::listeners::ListenerSet;

/// Resizes `background` to `container`'s scroll height
pub struct BackgroundHeightSync {
    listeners: ListenerSet,
    _container: Rc<dyn StyleTarget>,
    _background: Rc<dyn StyleTarget>,
}

impl BackgroundHeightSync {
    /// Sync now, then again on window resize and whenever `container_events`
    /// reports a content mutation.
    pub fn mount(
        host: &Rc<dyn EffectHost>,
        container: Rc<dyn StyleTarget>,
        container_events: Rc<dyn EventSource>,
        background: Rc<dyn StyleTarget>,
    ) -> Self {
        sync_height(container.as_ref(), background.as_ref());

        let weak_container: Weak<dyn StyleTarget> = Rc::downgrade(&container);
        let weak_background: Weak<dyn StyleTarget> = Rc::downgrade(&background);
        let handler = Rc::new(move |_: &Event| {
            if let (Some(container), Some(background)) =
                (weak_container.upgrade(), weak_background.upgrade())
            {
                sync_height(container.as_ref(), background.as_ref());
            }
        });

        let mut listeners = ListenerSet::new();
        let window: Rc<dyn EventSource> = host.window_events();
        listeners.add(&window, event_types::RESIZE, handler.clone());
        listeners.add(&container_events, event_types::CONTENT_MUTATED, handler);

        Self {
            listeners,
            _container: container,
            _background: background,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn unmount(self) {}
}

fn sync_height(container: &dyn StyleTarget, background: &dyn StyleTarget) {
    let Some(height) = container.scroll_height() else {
        return;
    };
    trace!(height, "syncing background height");
    background.set_style("height", &format!("{height}px"));
}

//! Cursor glow
//!
//! Page-level glow and background reveal that follow the pointer without
//! easing. The stylesheet positions both from viewport coordinates, so the
//! raw client position is written as is.

use std::rc::{Rc, Weak};

use euphoria_core::events::event_types;
use euphoria_core::{Event, EventSource, Result};
use tracing::debug;

use crate::config::GlowConfig;
use crate::host::StyleTarget;
use crate::listeners::ListenerSet;

/// Writes `--cursor-*` and `--reveal-*` properties on the page container
pub struct CursorGlow {
    listeners: ListenerSet,
    _container: Rc<dyn StyleTarget>,
}

impl CursorGlow {
    pub fn mount(
        container: Rc<dyn StyleTarget>,
        events: Rc<dyn EventSource>,
        config: &GlowConfig,
    ) -> Result<Self> {
        config.validate()?;
        let reveal_size = format!("{}px", config.reveal_size);
        let mut listeners = ListenerSet::new();

        let target: Weak<dyn StyleTarget> = Rc::downgrade(&container);
        listeners.add(
            &events,
            event_types::POINTER_MOVE,
            Rc::new(move |event: &Event| {
                let (Some(container), Some(point)) = (target.upgrade(), event.client_point())
                else {
                    return;
                };
                let x = format!("{}px", point.x);
                let y = format!("{}px", point.y);
                container.set_property("--cursor-x", &x);
                container.set_property("--cursor-y", &y);
                container.set_property("--cursor-active", "1");
                container.set_property("--reveal-x", &x);
                container.set_property("--reveal-y", &y);
                container.set_property("--reveal-size", &reveal_size);
            }),
        );

        let target: Weak<dyn StyleTarget> = Rc::downgrade(&container);
        listeners.add(
            &events,
            event_types::POINTER_LEAVE,
            Rc::new(move |_: &Event| {
                if let Some(container) = target.upgrade() {
                    container.set_property("--cursor-active", "0");
                }
            }),
        );

        debug!(reveal_size = config.reveal_size, "cursor glow mounted");
        Ok(Self {
            listeners,
            _container: container,
        })
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn unmount(self) {}
}

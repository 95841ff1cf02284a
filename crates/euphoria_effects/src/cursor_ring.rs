//! Cursor ring
//!
//! A peephole that follows the pointer anywhere in the viewport and fades
//! out when the pointer leaves the window.

use std::rc::{Rc, Weak};

use euphoria_animation::{PointTracker, TrackerDriver};
use euphoria_background::{BackgroundMetrics, ImageLoad};
use euphoria_core::events::event_types;
use euphoria_core::{Event, EventSource, Result};
use tracing::debug;

use crate::config::CursorRingConfig;
use crate::host::{EffectHost, PeepholeSpec};
use crate::peephole::Peephole;

const CLASS_NAME: &str = "cursor-ring";

/// Pointer-following background peephole
pub struct CursorRing {
    peephole: Peephole,
}

impl CursorRing {
    /// Mount the ring.
    ///
    /// Returns `Ok(None)` without creating anything when the pointer is
    /// coarse or cannot hover.
    pub fn mount(host: &Rc<dyn EffectHost>, config: &CursorRingConfig) -> Result<Option<Self>> {
        config.validate()?;
        if host.pointer_capability().is_coarse() {
            debug!("coarse pointer, cursor ring disabled");
            return Ok(None);
        }

        let viewport = host.viewport();
        let tracker = PointTracker::new(viewport.center(), 0.0, config.motion());
        let spec = PeepholeSpec {
            class_name: CLASS_NAME,
            diameter: config.size,
        };
        let mut peephole = Peephole::mount(host, &spec, &config.background_image, tracker)?;

        let window: Rc<dyn EventSource> = host.window_events();
        let handle = peephole.handle();
        let listeners = peephole.listeners_mut();

        let track = handle.clone();
        listeners.add_all(
            &window,
            &[event_types::POINTER_MOVE, event_types::POINTER_DOWN],
            Rc::new(move |event: &Event| {
                if let Some(point) = event.client_point() {
                    track.retarget(|tracker| tracker.set_target(point, 1.0));
                }
            }),
        );

        let fade = handle.clone();
        listeners.add_all(
            &window,
            &[event_types::POINTER_LEAVE, event_types::WINDOW_BLUR],
            Rc::new(move |_: &Event| {
                fade.retarget(|tracker| tracker.set_target_intensity(0.0));
            }),
        );

        let weak_host: Weak<dyn EffectHost> = Rc::downgrade(host);
        listeners.add(
            &window,
            event_types::RESIZE,
            Rc::new(move |_: &Event| {
                if let Some(host) = weak_host.upgrade() {
                    handle.remeasure(host.viewport());
                }
            }),
        );

        debug!(size = config.size, "cursor ring mounted");
        Ok(Some(Self { peephole }))
    }

    pub fn driver(&self) -> &TrackerDriver {
        self.peephole.driver()
    }

    pub fn metrics(&self) -> BackgroundMetrics {
        self.peephole.metrics()
    }

    pub fn image(&self) -> ImageLoad {
        self.peephole.image()
    }

    pub fn listener_count(&self) -> usize {
        self.peephole.listener_count()
    }

    /// Release the ring. Same as dropping it.
    pub fn unmount(self) {}
}

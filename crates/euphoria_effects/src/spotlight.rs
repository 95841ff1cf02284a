//! Spotlight reveal
//!
//! Tracks the pointer inside one container and publishes the reveal as CSS
//! custom properties. The stylesheet draws the radial mask from them:
//!
//! | Property  | Value                                   |
//! |-----------|-----------------------------------------|
//! | `--bg-url`| `url(<image>)`, written once at mount   |
//! | `--mx`    | reveal centre x, container-local, px    |
//! | `--my`    | reveal centre y, container-local, px    |
//! | `--r`     | solid radius, px                        |
//! | `--fade`  | feather width, px                       |
//! | `--alpha` | reveal opacity in `[0, 1]`              |
//!
//! On mount the reveal sits at the container centre with alpha 0 and fades
//! in. Leaving the container fades alpha out and keeps the last point.

use std::rc::{Rc, Weak};

use euphoria_animation::{PointTracker, TrackedFrame, TrackerDriver, WeakDriver};
use euphoria_background::css_url;
use euphoria_core::events::event_types;
use euphoria_core::{EffectError, Event, EventHandler, EventSource, Result};
use tracing::debug;

use crate::config::SpotlightConfig;
use crate::host::{EffectHost, StyleTarget};
use crate::listeners::ListenerSet;

/// Caller hooks, run after the spotlight has handled the event
#[derive(Default, Clone)]
pub struct SpotlightCallbacks {
    pub on_pointer_move: Option<EventHandler>,
    pub on_pointer_leave: Option<EventHandler>,
}

/// Container-scoped radial reveal
pub struct Spotlight {
    driver: TrackerDriver,
    listeners: ListenerSet,
}

impl Spotlight {
    /// Mount on `container`, listening for pointer events on `events`
    /// (normally the container itself).
    ///
    /// Spotlights are not gated on pointer capability.
    pub fn mount(
        host: &Rc<dyn EffectHost>,
        container: Rc<dyn StyleTarget>,
        events: Rc<dyn EventSource>,
        config: &SpotlightConfig,
        callbacks: SpotlightCallbacks,
    ) -> Result<Self> {
        config.validate()?;
        let rect = container
            .bounding_rect()
            .ok_or_else(|| EffectError::MissingElement("spotlight container".into()))?;

        if !config.image_url.is_empty() {
            container.set_property("--bg-url", &css_url(&config.image_url));
        }

        let radius = format!("{}px", config.radius);
        let fade = format!("{}px", config.fade);
        let target = container.clone();
        let apply = move |frame: &TrackedFrame| {
            target.set_property("--mx", &format!("{}px", frame.point.x));
            target.set_property("--my", &format!("{}px", frame.point.y));
            target.set_property("--r", &radius);
            target.set_property("--fade", &fade);
            target.set_property("--alpha", &frame.intensity.to_string());
        };

        let tracker = PointTracker::new(rect.size().center(), 0.0, config.motion());
        let driver = TrackerDriver::new(tracker, host.frames(), apply);
        driver.apply_current();
        driver.retarget(|tracker| tracker.set_target_intensity(1.0));

        let mut listeners = ListenerSet::new();
        let weak_container = Rc::downgrade(&container);

        let track = driver.downgrade();
        let on_move = callbacks.on_pointer_move;
        listeners.add_all(
            &events,
            &[event_types::POINTER_MOVE, event_types::POINTER_DOWN],
            Rc::new(move |event: &Event| {
                follow_pointer(&track, &weak_container, event);
                if let Some(callback) = &on_move {
                    callback(event);
                }
            }),
        );

        let fade_out = driver.downgrade();
        let on_leave = callbacks.on_pointer_leave;
        listeners.add(
            &events,
            event_types::POINTER_LEAVE,
            Rc::new(move |event: &Event| {
                if let Some(driver) = fade_out.upgrade() {
                    driver.retarget(|tracker| tracker.set_target_intensity(0.0));
                }
                if let Some(callback) = &on_leave {
                    callback(event);
                }
            }),
        );

        debug!(radius = config.radius, fade = config.fade, "spotlight mounted");
        Ok(Self { driver, listeners })
    }

    pub fn driver(&self) -> &TrackerDriver {
        &self.driver
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Release the spotlight. Same as dropping it.
    pub fn unmount(self) {}
}

impl Drop for Spotlight {
    fn drop(&mut self) {
        self.driver.stop();
        self.listeners.clear();
        debug!("spotlight unmounted");
    }
}

fn follow_pointer(driver: &WeakDriver, container: &Weak<dyn StyleTarget>, event: &Event) {
    let (Some(driver), Some(container)) = (driver.upgrade(), container.upgrade()) else {
        return;
    };
    let Some(point) = event.client_point() else {
        return;
    };
    // Detached containers have no box to be relative to
    let Some(rect) = container.bounding_rect() else {
        return;
    };
    let local = rect.to_local(point);
    driver.retarget(|tracker| tracker.set_target(local, 1.0));
}

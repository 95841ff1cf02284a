//! Scroll orb
//!
//! A peephole swept sideways across the viewport centre as the page scrolls.

use std::f32::consts::TAU;
use std::rc::{Rc, Weak};

use euphoria_animation::{PointTracker, TrackerDriver};
use euphoria_background::BackgroundMetrics;
use euphoria_core::events::event_types;
use euphoria_core::{Event, EventSource, Point, Result, Size};
use tracing::debug;

use crate::config::{ScrollOrbConfig, SweepConfig};
use crate::host::{EffectHost, PeepholeSpec};
use crate::peephole::{Peephole, PeepholeHandle};

const CLASS_NAME: &str = "scroll-orb mirror-orb";

/// Orb position for a scroll offset.
///
/// One full sine period spans `wavelength_ratio` viewport heights of
/// scrolling; the swing is `amplitude_ratio` of the viewport width, capped at
/// `max_amplitude`. The orb stays vertically centred.
pub fn scroll_target(scroll_top: f32, viewport: Size, sweep: &SweepConfig) -> Point {
    let amplitude = sweep.max_amplitude.min(viewport.width * sweep.amplitude_ratio);
    let wavelength = (viewport.height * sweep.wavelength_ratio).max(1.0);
    let phase = scroll_top / wavelength * TAU;
    let center = viewport.center();
    Point::new(center.x + phase.sin() * amplitude, center.y)
}

/// Scroll-driven background peephole
pub struct ScrollOrb {
    peephole: Peephole,
}

impl ScrollOrb {
    /// Mount the orb. `Ok(None)` on coarse pointers, like the cursor ring.
    pub fn mount(host: &Rc<dyn EffectHost>, config: &ScrollOrbConfig) -> Result<Option<Self>> {
        config.validate()?;
        if host.pointer_capability().is_coarse() {
            debug!("coarse pointer, scroll orb disabled");
            return Ok(None);
        }

        let viewport = host.viewport();
        let start = Point::new(viewport.width * 0.7, viewport.height * 0.25);
        let tracker = PointTracker::new(start, 1.0, config.motion());
        let spec = PeepholeSpec {
            class_name: CLASS_NAME,
            diameter: config.size,
        };
        let mut peephole = Peephole::mount(host, &spec, &config.background_image, tracker)?;

        let sweep = config.sweep;
        let handle = peephole.handle();
        follow_scroll(&handle, host.as_ref(), &sweep);

        let window: Rc<dyn EventSource> = host.window_events();
        let listeners = peephole.listeners_mut();

        let on_scroll = handle.clone();
        let scroll_host: Weak<dyn EffectHost> = Rc::downgrade(host);
        listeners.add(
            &window,
            event_types::SCROLL,
            Rc::new(move |_: &Event| {
                if let Some(host) = scroll_host.upgrade() {
                    follow_scroll(&on_scroll, host.as_ref(), &sweep);
                }
            }),
        );

        let resize_host: Weak<dyn EffectHost> = Rc::downgrade(host);
        listeners.add(
            &window,
            event_types::RESIZE,
            Rc::new(move |_: &Event| {
                if let Some(host) = resize_host.upgrade() {
                    handle.remeasure(host.viewport());
                    follow_scroll(&handle, host.as_ref(), &sweep);
                }
            }),
        );

        debug!(size = config.size, "scroll orb mounted");
        Ok(Some(Self { peephole }))
    }

    pub fn driver(&self) -> &TrackerDriver {
        self.peephole.driver()
    }

    pub fn metrics(&self) -> BackgroundMetrics {
        self.peephole.metrics()
    }

    pub fn listener_count(&self) -> usize {
        self.peephole.listener_count()
    }

    /// Release the orb. Same as dropping it.
    pub fn unmount(self) {}
}

fn follow_scroll(handle: &PeepholeHandle, host: &dyn EffectHost, sweep: &SweepConfig) {
    let target = scroll_target(host.scroll_top(), host.viewport(), sweep);
    handle.retarget(|tracker| tracker.set_target(target, 1.0));
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(1000.0, 800.0);

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn test_sweep_at_rest_is_centred() {
        let target = scroll_target(0.0, VIEWPORT, &SweepConfig::default());
        assert!(close(target, Point::new(500.0, 400.0)));
    }

    #[test]
    fn test_quarter_wavelength_hits_amplitude() {
        // wavelength = 960, amplitude = min(220, 250) = 220
        let target = scroll_target(240.0, VIEWPORT, &SweepConfig::default());
        assert!(close(target, Point::new(720.0, 400.0)));

        let target = scroll_target(720.0, VIEWPORT, &SweepConfig::default());
        assert!(close(target, Point::new(280.0, 400.0)));
    }

    #[test]
    fn test_narrow_viewport_scales_amplitude() {
        let narrow = Size::new(400.0, 800.0);
        let target = scroll_target(240.0, narrow, &SweepConfig::default());
        assert!(close(target, Point::new(300.0, 400.0)));
    }

    #[test]
    fn test_degenerate_viewport_keeps_wavelength_positive() {
        let target = scroll_target(10.0, Size::ZERO, &SweepConfig::default());
        assert!(target.x.is_finite());
        assert_eq!(target, Point::ZERO);
    }
}

//! Point tracking
//!
//! A [`PointTracker`] eases an (x, y, intensity) triple toward its target
//! once per frame. What sets the target (pointer, scroll position) and what
//! the eased values are written to are left to the caller.

use euphoria_core::Point;

use crate::scalar::AnimatedScalar;

/// Easing factor and settle thresholds for a tracker
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Fraction of the remaining gap closed per frame, in `(0, 1]`
    pub easing: f32,
    /// Position delta (px) under which x and y snap to target
    pub position_threshold: f32,
    /// Intensity delta under which intensity snaps to target
    pub intensity_threshold: f32,
}

impl Motion {
    pub const fn new(easing: f32, position_threshold: f32, intensity_threshold: f32) -> Self {
        Self {
            easing,
            position_threshold,
            intensity_threshold,
        }
    }

    /// Pointer-following ring: quick and light
    pub const fn cursor_ring() -> Self {
        Self::new(0.18, 0.3, 0.02)
    }

    /// Scroll-driven orb: slower, heavier sweep
    pub const fn scroll_orb() -> Self {
        Self::new(0.12, 0.3, 0.02)
    }

    /// Element-scoped spotlight
    pub const fn spotlight() -> Self {
        Self::new(0.18, 0.3, 0.01)
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self::cursor_ring()
    }
}

/// Values produced by one tracker step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackedFrame {
    pub point: Point,
    pub intensity: f32,
    /// The tracker snapped to its target on this step
    pub settled: bool,
}

/// Eases a point and an intensity toward their targets
#[derive(Clone, Debug)]
pub struct PointTracker {
    x: AnimatedScalar,
    y: AnimatedScalar,
    intensity: AnimatedScalar,
    motion: Motion,
}

impl PointTracker {
    /// Create a tracker at rest at `point` with the given intensity
    pub fn new(point: Point, intensity: f32, motion: Motion) -> Self {
        Self {
            x: AnimatedScalar::new(point.x),
            y: AnimatedScalar::new(point.y),
            intensity: AnimatedScalar::new(intensity),
            motion,
        }
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn set_target_point(&mut self, point: Point) {
        self.x.set_target(point.x);
        self.y.set_target(point.y);
    }

    pub fn set_target_intensity(&mut self, intensity: f32) {
        self.intensity.set_target(intensity);
    }

    /// Move a point and intensity target in one go
    pub fn set_target(&mut self, point: Point, intensity: f32) {
        self.set_target_point(point);
        self.set_target_intensity(intensity);
    }

    pub fn target_point(&self) -> Point {
        Point::new(self.x.target, self.y.target)
    }

    pub fn target_intensity(&self) -> f32 {
        self.intensity.target
    }

    /// Current values without stepping
    pub fn current(&self) -> TrackedFrame {
        TrackedFrame {
            point: Point::new(self.x.current, self.y.current),
            intensity: self.intensity.current,
            settled: self.is_settled(),
        }
    }

    /// Every delta is under its threshold
    pub fn is_settled(&self) -> bool {
        self.x.is_within(self.motion.position_threshold)
            && self.y.is_within(self.motion.position_threshold)
            && self.intensity.is_within(self.motion.intensity_threshold)
    }

    /// Take one easing step.
    ///
    /// When the step lands within every threshold, all values snap exactly to
    /// their targets and the returned frame is marked settled.
    pub fn advance(&mut self) -> TrackedFrame {
        let factor = self.motion.easing;
        self.x.step(factor);
        self.y.step(factor);
        self.intensity.step(factor);

        let settled = self.is_settled();
        if settled {
            self.x.snap();
            self.y.snap();
            self.intensity.snap();
        }

        TrackedFrame {
            point: Point::new(self.x.current, self.y.current),
            intensity: self.intensity.current,
            settled,
        }
    }
}

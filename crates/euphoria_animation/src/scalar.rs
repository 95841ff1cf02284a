//! A single eased value

use crate::easing::ease_toward;

/// A `current` value chasing a `target`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimatedScalar {
    pub current: f32,
    pub target: f32,
}

impl AnimatedScalar {
    /// Create a scalar already at rest
    pub fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump to a value without animating
    pub fn reset(&mut self, value: f32) {
        self.current = value;
        self.target = value;
    }

    /// Take one easing step and return the new current value
    pub fn step(&mut self, factor: f32) -> f32 {
        self.current = ease_toward(self.current, self.target, factor);
        self.current
    }

    /// Distance left to travel
    pub fn delta(&self) -> f32 {
        (self.target - self.current).abs()
    }

    pub fn is_within(&self, threshold: f32) -> bool {
        self.delta() < threshold
    }

    pub fn snap(&mut self) {
        self.current = self.target;
    }
}

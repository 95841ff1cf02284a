//! Euphoria Room Animation
//!
//! Frame-driven smoothing for the pointer-following effects.
//!
//! # Features
//!
//! - **Exponential easing**: each frame closes a fixed fraction of the gap
//!   between `current` and `target`, so values never overshoot
//! - **Point tracking**: x, y and an intensity scalar eased together and
//!   snapped to target once every delta is under its settle threshold
//! - **Coalesced frames**: at most one pending frame callback per driver,
//!   cancelled when the driver is stopped

pub mod driver;
pub mod easing;
pub mod scalar;
pub mod scheduler;
pub mod tracker;

pub use driver::{TrackerDriver, WeakDriver};
pub use easing::ease_toward;
pub use scalar::AnimatedScalar;
pub use scheduler::{FrameCallback, FrameHandle, FrameScheduler, ManualFrameScheduler};
pub use tracker::{Motion, PointTracker, TrackedFrame};

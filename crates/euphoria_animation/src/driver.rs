//! Frame-coalesced tracker driving
//!
//! A [`TrackerDriver`] owns a [`PointTracker`] and an apply function. Target
//! changes request a frame; each frame advances the tracker one step, hands
//! the result to the apply function, and either stops (settled) or requests
//! the next frame. At most one frame is ever pending per driver.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use euphoria_core::Point;
use tracing::{debug, trace};

use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::tracker::{PointTracker, TrackedFrame};

/// Writes one tracked frame to its visual target
pub type ApplyFn = Box<dyn FnMut(&TrackedFrame)>;

struct DriverState {
    tracker: PointTracker,
    apply: ApplyFn,
    pending: Option<FrameHandle>,
    stopped: bool,
}

struct DriverInner {
    state: RefCell<DriverState>,
    frames: Rc<dyn FrameScheduler>,
}

/// Drives a [`PointTracker`] from a [`FrameScheduler`]
///
/// Cloning shares the same tracker. Handlers that outlive the owning effect
/// should hold a [`WeakDriver`] instead.
#[derive(Clone)]
pub struct TrackerDriver {
    inner: Rc<DriverInner>,
}

/// Non-owning handle to a [`TrackerDriver`]
#[derive(Clone)]
pub struct WeakDriver {
    inner: Weak<DriverInner>,
}

impl WeakDriver {
    pub fn upgrade(&self) -> Option<TrackerDriver> {
        self.inner.upgrade().map(|inner| TrackerDriver { inner })
    }
}

impl TrackerDriver {
    pub fn new(
        tracker: PointTracker,
        frames: Rc<dyn FrameScheduler>,
        apply: impl FnMut(&TrackedFrame) + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(DriverInner {
                state: RefCell::new(DriverState {
                    tracker,
                    apply: Box::new(apply),
                    pending: None,
                    stopped: false,
                }),
                frames,
            }),
        }
    }

    pub fn downgrade(&self) -> WeakDriver {
        WeakDriver {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Change the tracker's target and request a frame
    pub fn retarget(&self, update: impl FnOnce(&mut PointTracker)) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.stopped {
                return;
            }
            update(&mut state.tracker);
        }
        self.request_frame();
    }

    /// Request a frame unless one is already pending.
    ///
    /// Returns `true` if a new frame callback was scheduled. A refused
    /// request leaves nothing pending.
    pub fn request_frame(&self) -> bool {
        Self::schedule(&self.inner)
    }

    /// Write the tracker's current values without stepping
    pub fn apply_current(&self) {
        let mut state = self.inner.state.borrow_mut();
        if state.stopped {
            return;
        }
        let DriverState { tracker, apply, .. } = &mut *state;
        let frame = tracker.current();
        apply(&frame);
    }

    /// Snapshot of the tracker's current values
    pub fn current(&self) -> TrackedFrame {
        self.inner.state.borrow().tracker.current()
    }

    pub fn target_point(&self) -> Point {
        self.inner.state.borrow().tracker.target_point()
    }

    pub fn target_intensity(&self) -> f32 {
        self.inner.state.borrow().tracker.target_intensity()
    }

    pub fn is_pending(&self) -> bool {
        self.inner.state.borrow().pending.is_some()
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.state.borrow().stopped
    }

    /// Cancel any pending frame and refuse further scheduling
    pub fn stop(&self) {
        let pending = {
            let mut state = self.inner.state.borrow_mut();
            state.stopped = true;
            state.pending.take()
        };
        if let Some(handle) = pending {
            self.inner.frames.cancel_frame(handle);
        }
    }

    fn schedule(inner: &Rc<DriverInner>) -> bool {
        {
            let state = inner.state.borrow();
            if state.stopped || state.pending.is_some() {
                return false;
            }
        }

        let weak = Rc::downgrade(inner);
        let handle = inner.frames.request_frame(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                Self::run_frame(&inner);
            }
        }));
        match handle {
            Some(handle) => {
                inner.state.borrow_mut().pending = Some(handle);
                true
            }
            None => {
                debug!("frame request refused; next target change retries");
                false
            }
        }
    }

    fn run_frame(inner: &Rc<DriverInner>) {
        let settled = {
            let mut state = inner.state.borrow_mut();
            state.pending = None;
            if state.stopped {
                return;
            }
            let DriverState { tracker, apply, .. } = &mut *state;
            let frame = tracker.advance();
            apply(&frame);
            frame.settled
        };

        if settled {
            trace!("tracker settled");
        } else {
            Self::schedule(inner);
        }
    }
}

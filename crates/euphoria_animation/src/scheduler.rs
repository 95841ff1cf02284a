//! Frame scheduling
//!
//! [`FrameScheduler`] is the `requestAnimationFrame` seam. A browser host
//! forwards to the window; [`ManualFrameScheduler`] queues callbacks until the
//! caller pumps a frame, which is how tests and headless hosts drive effects.

use std::cell::{Cell, RefCell};

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Identifier of a pending frame callback
    pub struct FrameHandle;
}

/// Callback run on the next animation frame
pub type FrameCallback = Box<dyn FnOnce()>;

/// Schedules callbacks for the next animation frame
pub trait FrameScheduler {
    /// Queue `callback` for the next frame.
    ///
    /// Implementations must not run the callback synchronously. Returns
    /// `None` if the frame could not be requested; the callback is dropped.
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameHandle>;

    /// Drop a pending callback. Unknown or already-fired handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);
}

/// A frame scheduler pumped by hand
pub struct ManualFrameScheduler {
    pending: RefCell<SlotMap<FrameHandle, FrameCallback>>,
    callbacks_run: Cell<u64>,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self {
            pending: RefCell::new(SlotMap::with_key()),
            callbacks_run: Cell::new(0),
        }
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Callbacks executed so far, across all frames
    pub fn callbacks_run(&self) -> u64 {
        self.callbacks_run.get()
    }

    /// Run one frame: every callback pending right now fires once.
    ///
    /// Callbacks requested while the frame runs wait for the next one.
    /// Returns the number of callbacks executed.
    pub fn run_frame(&self) -> usize {
        let batch: Vec<FrameCallback> = {
            let mut pending = self.pending.borrow_mut();
            let handles: Vec<FrameHandle> = pending.keys().collect();
            handles
                .into_iter()
                .filter_map(|handle| pending.remove(handle))
                .collect()
        };

        let count = batch.len();
        for callback in batch {
            callback();
        }
        self.callbacks_run.set(self.callbacks_run.get() + count as u64);
        count
    }

    /// Pump frames until nothing is pending or `max_frames` is reached.
    /// Returns the number of frames that ran at least one callback.
    pub fn run_until_idle(&self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.pending_count() > 0 {
            self.run_frame();
            frames += 1;
        }
        frames
    }
}

impl Default for ManualFrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameHandle> {
        Some(self.pending.borrow_mut().insert(callback))
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.pending.borrow_mut().remove(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_cancelled_callback_never_runs() {
        let frames = ManualFrameScheduler::new();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let handle = frames
            .request_frame(Box::new(move || flag.set(true)))
            .unwrap();

        frames.cancel_frame(handle);
        assert_eq!(frames.run_frame(), 0);
        assert!(!fired.get());
    }

    #[test]
    fn test_callbacks_requested_mid_frame_wait() {
        let frames = Rc::new(ManualFrameScheduler::new());
        let inner = frames.clone();
        frames.request_frame(Box::new(move || {
            inner.request_frame(Box::new(|| {}));
        }));

        assert_eq!(frames.run_frame(), 1);
        assert_eq!(frames.pending_count(), 1);
        assert_eq!(frames.run_until_idle(10), 1);
        assert_eq!(frames.callbacks_run(), 2);
    }
}

//! Euphoria Room Core
//!
//! Foundational primitives shared by the pointer-synced visual effects:
//!
//! - **Geometry**: `Point`, `Size` and `Rect` in CSS pixels
//! - **Events**: pointer, scroll, resize and blur events behind the
//!   `EventSource` seam, with an in-memory `EventDispatcher`
//! - **Errors**: the `EffectError` type every effect crate converts into
//!
//! # Example
//!
//! ```rust
//! use euphoria_core::events::{event_types, Event, EventDispatcher, EventSource};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let window = EventDispatcher::new();
//! let moves = Rc::new(Cell::new(0));
//! let counter = moves.clone();
//! let id = window.listen(
//!     event_types::POINTER_MOVE,
//!     Rc::new(move |_: &Event| counter.set(counter.get() + 1)),
//! );
//!
//! window.dispatch(&Event::pointer(event_types::POINTER_MOVE, 10.0, 20.0));
//! window.unlisten(id);
//! window.dispatch(&Event::pointer(event_types::POINTER_MOVE, 10.0, 20.0));
//! assert_eq!(moves.get(), 1);
//! ```

pub mod error;
pub mod events;
pub mod geometry;

pub use error::{EffectError, Result};
pub use events::{Event, EventData, EventDispatcher, EventHandler, EventSource, EventType, ListenerId};
pub use geometry::{Point, Rect, Size};

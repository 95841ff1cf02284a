//! Euphoria Room Effects
//!
//! Pointer-synced background reveal effects for the euphoria room page.
//!
//! - **Cursor ring**: a small peephole that follows the pointer and mirrors
//!   the page background underneath it
//! - **Scroll orb**: the same peephole, swept sideways by the scroll offset
//! - **Spotlight**: a radial reveal scoped to one container, driven through
//!   CSS custom properties
//! - **Cursor glow** and **background height sync**: the page-level helpers
//!   the effects rely on
//! - **Site**: mounts every effect a [`SiteConfig`] names in one go
//!
//! Effects never touch a browser directly. They talk to an [`EffectHost`]
//! (window, frames, images) and to [`StyleTarget`] elements, so the same
//! controllers run against `web-sys` or the in-memory [`testing`] host.
//!
//! Every controller releases what it registered when dropped: the pending
//! frame is cancelled, every listener is removed and any element it created
//! is detached.

pub mod config;
pub mod cursor_ring;
pub mod glow;
pub mod height_sync;
pub mod host;
pub mod listeners;
mod peephole;
pub mod scroll_orb;
pub mod site;
pub mod spotlight;
pub mod testing;

pub use config::{
    ConfigError, CursorRingConfig, GlowConfig, LoggingConfig, MotionOverrides, ScrollOrbConfig,
    SiteConfig, SpotlightConfig, SweepConfig,
};
pub use cursor_ring::CursorRing;
pub use glow::CursorGlow;
pub use height_sync::BackgroundHeightSync;
pub use host::{
    BackgroundSource, EffectHost, ImageCallback, PeepholeNodes, PeepholeSpec, PointerCapability,
    StyleTarget,
};
pub use listeners::ListenerSet;
pub use scroll_orb::{scroll_target, ScrollOrb};
pub use site::{ElementTarget, Site, SiteElements};
pub use spotlight::{Spotlight, SpotlightCallbacks};

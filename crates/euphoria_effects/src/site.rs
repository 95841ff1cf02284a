//! Whole-page mounting from a [`SiteConfig`]
//!
//! Each section present in the config mounts its effect; absent sections
//! mount nothing. The ring and orb still opt out on coarse pointers.

use std::rc::Rc;

use euphoria_core::{EffectError, EventSource, Result};
use tracing::debug;

use crate::config::SiteConfig;
use crate::cursor_ring::CursorRing;
use crate::glow::CursorGlow;
use crate::host::{EffectHost, StyleTarget};
use crate::scroll_orb::ScrollOrb;
use crate::spotlight::{Spotlight, SpotlightCallbacks};

/// An element effects write to, with the source of its own events
#[derive(Clone)]
pub struct ElementTarget {
    pub style: Rc<dyn StyleTarget>,
    pub events: Rc<dyn EventSource>,
}

impl ElementTarget {
    /// Use one value as both style target and event source
    pub fn new<T: StyleTarget + EventSource + 'static>(element: Rc<T>) -> Self {
        Self {
            style: element.clone(),
            events: element,
        }
    }
}

/// Page elements the element-scoped effects attach to
#[derive(Clone, Default)]
pub struct SiteElements {
    /// Page container carrying the cursor glow
    pub page: Option<ElementTarget>,
    /// Container of the spotlight reveal
    pub spotlight: Option<ElementTarget>,
}

/// Every effect mounted for one page
#[derive(Default)]
pub struct Site {
    cursor_ring: Option<CursorRing>,
    scroll_orb: Option<ScrollOrb>,
    spotlight: Option<Spotlight>,
    glow: Option<CursorGlow>,
}

impl Site {
    /// Mount the configured effects.
    ///
    /// A spotlight or glow section without its element fails the mount, as
    /// does any effect failing to mount. Effects mounted before the failure
    /// are released.
    pub fn mount(
        host: &Rc<dyn EffectHost>,
        config: &SiteConfig,
        elements: &SiteElements,
    ) -> Result<Self> {
        config.validate()?;
        let mut site = Site::default();

        if let Some(ring) = &config.cursor_ring {
            site.cursor_ring = CursorRing::mount(host, ring)?;
        }
        if let Some(orb) = &config.scroll_orb {
            site.scroll_orb = ScrollOrb::mount(host, orb)?;
        }
        if let Some(spotlight) = &config.spotlight {
            let target = elements
                .spotlight
                .as_ref()
                .ok_or_else(|| EffectError::MissingElement("spotlight container".into()))?;
            site.spotlight = Some(Spotlight::mount(
                host,
                target.style.clone(),
                target.events.clone(),
                spotlight,
                SpotlightCallbacks::default(),
            )?);
        }
        if let Some(glow) = &config.glow {
            let target = elements
                .page
                .as_ref()
                .ok_or_else(|| EffectError::MissingElement("page container".into()))?;
            site.glow = Some(CursorGlow::mount(
                target.style.clone(),
                target.events.clone(),
                glow,
            )?);
        }

        debug!(effects = site.mounted_count(), "site mounted");
        Ok(site)
    }

    pub fn cursor_ring(&self) -> Option<&CursorRing> {
        self.cursor_ring.as_ref()
    }

    pub fn scroll_orb(&self) -> Option<&ScrollOrb> {
        self.scroll_orb.as_ref()
    }

    pub fn spotlight(&self) -> Option<&Spotlight> {
        self.spotlight.as_ref()
    }

    pub fn glow(&self) -> Option<&CursorGlow> {
        self.glow.as_ref()
    }

    /// Number of effects actually running
    pub fn mounted_count(&self) -> usize {
        usize::from(self.cursor_ring.is_some())
            + usize::from(self.scroll_orb.is_some())
            + usize::from(self.spotlight.is_some())
            + usize::from(self.glow.is_some())
    }

    /// Release every effect. Same as dropping the site.
    pub fn unmount(self) {}
}

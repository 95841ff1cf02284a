//! Euphoria Room Web
//!
//! Browser entry points. Each `mount_*` function builds a [`WebHost`] over
//! the current window, mounts one effect and returns an [`EffectHandle`];
//! calling `unmount()` (or letting JS free the handle) releases every
//! listener, frame and element the effect created.
//!
//! ```js
//! import init, { init_logging, mount_cursor_ring } from "./euphoria_web.js";
//!
//! await init();
//! init_logging("info");
//! const ring = mount_cursor_ring('{"size": 140, "background_image": "/dasha1.jpg"}');
//! // later
//! ring.unmount();
//!
//! // or everything at once, logging included
//! const site = mount_site(
//!   '{"logging": {"level": "debug"}, "cursor_ring": {}, "glow": {}}',
//!   document.querySelector(".page"),
//!   undefined,
//! );
//! ```

pub mod dom;
pub mod host;
pub mod logging;

use std::rc::Rc;

use anyhow::{Context, Result};
use euphoria_effects::{
    BackgroundHeightSync, CursorGlow, CursorRing, CursorRingConfig, EffectHost, ElementTarget,
    GlowConfig, ScrollOrb, ScrollOrbConfig, Site, SiteConfig, SiteElements, Spotlight,
    SpotlightCallbacks, SpotlightConfig,
};
use serde::de::DeserializeOwned;
use tracing::info;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

pub use dom::{DomEventSource, WebElement};
pub use host::{WebBackgroundSource, WebFrameScheduler, WebHost};

enum MountedEffect {
    CursorRing(CursorRing),
    ScrollOrb(ScrollOrb),
    Spotlight(Spotlight),
    Glow(CursorGlow),
    HeightSync(BackgroundHeightSync),
    Site(Site),
}

/// A mounted effect. Dropping or unmounting it tears the effect down.
#[wasm_bindgen]
pub struct EffectHandle {
    // Declared before the host so it is released first
    effect: Option<MountedEffect>,
    _host: Option<Rc<WebHost>>,
}

impl EffectHandle {
    fn new(effect: Option<MountedEffect>, host: Option<Rc<WebHost>>) -> Self {
        Self {
            effect,
            _host: host,
        }
    }
}

#[wasm_bindgen]
impl EffectHandle {
    /// Release the effect. Calling it twice is harmless.
    pub fn unmount(&mut self) {
        self.effect = None;
    }

    /// `false` if the effect opted out at mount (coarse pointer) or was
    /// unmounted
    pub fn is_active(&self) -> bool {
        self.effect.is_some()
    }
}

/// Parse a JSON config, treating an empty string as all defaults
pub fn parse_config<T: DeserializeOwned + Default>(json: &str) -> Result<T> {
    if json.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(json).context("invalid effect configuration")
}

fn js_error(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{err:#}"))
}

fn host() -> Result<Rc<WebHost>> {
    Ok(Rc::new(WebHost::new()?))
}

/// Install the panic hook and console logging with a `tracing` filter
#[wasm_bindgen]
pub fn init_logging(level: &str) -> Result<(), JsValue> {
    logging::init(level).map_err(js_error)?;
    info!("euphoria effects ready");
    Ok(())
}

/// Mount every effect a site config names, after installing logging at the
/// config's level.
///
/// `config` is JSON or TOML. `page` carries the cursor glow and `spotlight`
/// the reveal; either may be omitted when its section is.
#[wasm_bindgen]
pub fn mount_site(
    config: &str,
    page: Option<HtmlElement>,
    spotlight: Option<HtmlElement>,
) -> Result<EffectHandle, JsValue> {
    let mount = || -> Result<EffectHandle> {
        let config = SiteConfig::parse(config).context("invalid site configuration")?;
        logging::init(&config.logging.level)?;

        let host = host()?;
        let dyn_host: Rc<dyn EffectHost> = host.clone();
        let target = |element: HtmlElement| ElementTarget::new(Rc::new(WebElement::new(element)));
        let elements = SiteElements {
            page: page.map(target),
            spotlight: spotlight.map(target),
        };
        let site = Site::mount(&dyn_host, &config, &elements)?;
        info!(effects = site.mounted_count(), "site effects mounted");
        Ok(EffectHandle::new(Some(MountedEffect::Site(site)), Some(host)))
    };
    mount().map_err(js_error)
}

#[wasm_bindgen]
pub fn mount_cursor_ring(config_json: &str) -> Result<EffectHandle, JsValue> {
    let mount = || -> Result<EffectHandle> {
        let config: CursorRingConfig = parse_config(config_json)?;
        let host = host()?;
        let dyn_host: Rc<dyn EffectHost> = host.clone();
        let ring = CursorRing::mount(&dyn_host, &config)?;
        Ok(EffectHandle::new(ring.map(MountedEffect::CursorRing), Some(host)))
    };
    mount().map_err(js_error)
}

#[wasm_bindgen]
pub fn mount_scroll_orb(config_json: &str) -> Result<EffectHandle, JsValue> {
    let mount = || -> Result<EffectHandle> {
        let config: ScrollOrbConfig = parse_config(config_json)?;
        let host = host()?;
        let dyn_host: Rc<dyn EffectHost> = host.clone();
        let orb = ScrollOrb::mount(&dyn_host, &config)?;
        Ok(EffectHandle::new(orb.map(MountedEffect::ScrollOrb), Some(host)))
    };
    mount().map_err(js_error)
}

/// Mount a spotlight on `element`, listening for pointer events on it
#[wasm_bindgen]
pub fn mount_spotlight(element: HtmlElement, config_json: &str) -> Result<EffectHandle, JsValue> {
    let mount = || -> Result<EffectHandle> {
        let config: SpotlightConfig = parse_config(config_json)?;
        let host = host()?;
        let dyn_host: Rc<dyn EffectHost> = host.clone();
        let container = Rc::new(WebElement::new(element));
        let spotlight = Spotlight::mount(
            &dyn_host,
            container.clone(),
            container,
            &config,
            SpotlightCallbacks::default(),
        )?;
        Ok(EffectHandle::new(
            Some(MountedEffect::Spotlight(spotlight)),
            Some(host),
        ))
    };
    mount().map_err(js_error)
}

/// Mount the page glow on the page container `element`
#[wasm_bindgen]
pub fn mount_glow(element: HtmlElement, config_json: &str) -> Result<EffectHandle, JsValue> {
    let mount = || -> Result<EffectHandle> {
        let config: GlowConfig = parse_config(config_json)?;
        let container = Rc::new(WebElement::new(element));
        let glow = CursorGlow::mount(container.clone(), container, &config)?;
        Ok(EffectHandle::new(Some(MountedEffect::Glow(glow)), None))
    };
    mount().map_err(js_error)
}

/// Keep `background` as tall as `container`'s content
#[wasm_bindgen]
pub fn mount_height_sync(
    container: HtmlElement,
    background: HtmlElement,
) -> Result<EffectHandle, JsValue> {
    let mount = || -> Result<EffectHandle> {
        let host = host()?;
        let dyn_host: Rc<dyn EffectHost> = host.clone();
        let container = Rc::new(WebElement::new(container));
        let background = Rc::new(WebElement::new(background));
        let sync = BackgroundHeightSync::mount(&dyn_host, container.clone(), container, background);
        Ok(EffectHandle::new(
            Some(MountedEffect::HeightSync(sync)),
            Some(host),
        ))
    };
    mount().map_err(js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: CursorRingConfig = parse_config("  ").unwrap();
        assert_eq!(config, CursorRingConfig::default());

        let config: SpotlightConfig = parse_config(r#"{"image_url": "/dasha2.jpg", "radius": 270}"#).unwrap();
        assert_eq!(config.radius, 270.0);
        assert_eq!(config.fade, 80.0);
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let err = parse_config::<ScrollOrbConfig>("{size: 1}").unwrap_err();
        assert!(format!("{err:#}").contains("invalid effect configuration"));
    }
}

//! Shared peephole mechanics for the cursor ring and the scroll orb
//!
//! A peephole is a small round element translated to the tracked point. Its
//! background layer draws the page background at the page background's own
//! scale, shifted so the pixel under the peephole's centre matches the pixel
//! of the real background at the same spot.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use euphoria_animation::{PointTracker, TrackedFrame, TrackerDriver, WeakDriver};
use euphoria_background::{
    css_url, extract_image_url, peephole_position, resolve_metrics, BackgroundDeclaration,
    BackgroundMetrics, BackgroundStyle, ImageError, ImageLoad,
};
use euphoria_core::{EffectError, Point, Rect, Result, Size};
use tracing::{debug, warn};

use crate::host::{BackgroundSource, EffectHost, PeepholeNodes, PeepholeSpec, StyleTarget};
use crate::listeners::ListenerSet;

/// Background geometry of one peephole
struct PeepholeLayer {
    nodes: PeepholeNodes,
    source: Option<Rc<dyn BackgroundSource>>,
    fallback_image: String,
    diameter: f32,
    image: ImageLoad,
    metrics: BackgroundMetrics,
}

impl PeepholeLayer {
    fn computed_style(&self) -> BackgroundStyle {
        self.source
            .as_ref()
            .map(|source| source.computed_background())
            .unwrap_or_default()
    }

    fn source_rect(&self, viewport: Size) -> Rect {
        match &self.source {
            Some(source) => source.bounding_rect(),
            None => Rect::new(0.0, 0.0, viewport.width, viewport.height),
        }
    }

    /// URL to measure: the source's computed image, else the configured one
    fn image_url(&self) -> Option<String> {
        extract_image_url(&self.computed_style().image)
            .or_else(|| Some(self.fallback_image.clone()))
            .filter(|url| !url.is_empty())
    }

    /// Re-read the source's computed background and recompute metrics
    fn refresh(&mut self, viewport: Size) {
        let style = self.computed_style();
        let layer = &self.nodes.layer;

        let image = if style.image.is_empty() || style.image == "none" {
            if self.fallback_image.is_empty() {
                "none".to_string()
            } else {
                css_url(&self.fallback_image)
            }
        } else {
            style.image.clone()
        };
        layer.set_style("background-image", &image);
        layer.set_style("background-repeat", &style.repeat);
        layer.set_style("background-attachment", &style.attachment);

        let decl = BackgroundDeclaration::parse(&style);
        self.metrics = resolve_metrics(
            &decl,
            self.image.natural_size(),
            self.source_rect(viewport),
            viewport,
        );
        layer.set_style(
            "background-size",
            &format!("{}px {}px", self.metrics.drawn.width, self.metrics.drawn.height),
        );
    }

    fn apply(&self, frame: &TrackedFrame) {
        let half = self.diameter / 2.0;
        let root = &self.nodes.root;
        root.set_style(
            "transform",
            &format!(
                "translate3d({}px, {}px, 0)",
                frame.point.x - half,
                frame.point.y - half
            ),
        );
        root.set_property("--cursor-active", &frame.intensity.to_string());

        // The source moves with the document unless the background is fixed
        let origin = self
            .source
            .as_ref()
            .map(|source| source.bounding_rect().origin())
            .unwrap_or(Point::ZERO);
        let position = peephole_position(&self.metrics, frame.point, origin, self.diameter);
        self.nodes
            .layer
            .set_style("background-position", &format!("{}px {}px", position.x, position.y));
    }
}

/// A mounted peephole: its elements, background layer and tracker
pub(crate) struct Peephole {
    driver: TrackerDriver,
    layer: Rc<RefCell<PeepholeLayer>>,
    root: Rc<dyn StyleTarget>,
    listeners: ListenerSet,
    class_name: String,
}

/// Non-owning handle used from event handlers and image callbacks
#[derive(Clone)]
pub(crate) struct PeepholeHandle {
    layer: Weak<RefCell<PeepholeLayer>>,
    driver: WeakDriver,
}

impl PeepholeHandle {
    /// Change the tracker target and schedule a frame
    pub fn retarget(&self, update: impl FnOnce(&mut PointTracker)) {
        if let Some(driver) = self.driver.upgrade() {
            driver.retarget(update);
        }
    }

    /// Recompute background metrics and redraw at the current position
    pub fn remeasure(&self, viewport: Size) {
        let (Some(layer), Some(driver)) = (self.layer.upgrade(), self.driver.upgrade()) else {
            return;
        };
        let drawn = {
            let mut layer = layer.borrow_mut();
            layer.refresh(viewport);
            layer.metrics.drawn
        };
        debug!(width = drawn.width, height = drawn.height, "background remeasured");
        driver.apply_current();
    }

    fn image_settled(&self, url: &str, result: std::result::Result<Size, ImageError>, viewport: Size) {
        let Some(layer) = self.layer.upgrade() else {
            return;
        };
        let load = ImageLoad::from_result(url, result);
        match &load {
            ImageLoad::Loaded(size) => {
                debug!(url, width = size.width, height = size.height, "background image measured")
            }
            ImageLoad::Failed(err) => warn!("{err}; using container size"),
            ImageLoad::Pending => {}
        }
        layer.borrow_mut().image = load;
        self.remeasure(viewport);
    }
}

impl Peephole {
    /// Create the peephole elements and start measuring the background image.
    ///
    /// Listeners are attached by the caller through [`Peephole::listeners_mut`].
    pub fn mount(
        host: &Rc<dyn EffectHost>,
        spec: &PeepholeSpec<'_>,
        fallback_image: &str,
        tracker: PointTracker,
    ) -> Result<Self> {
        let nodes = host
            .create_peephole(spec)
            .ok_or_else(|| EffectError::MissingElement(format!("peephole `{}`", spec.class_name)))?;
        nodes
            .root
            .set_property("--cursor-ring-size", &format!("{}px", spec.diameter));

        let root = nodes.root.clone();
        let mut state = PeepholeLayer {
            nodes,
            source: host.background_source(),
            fallback_image: fallback_image.to_string(),
            diameter: spec.diameter,
            image: ImageLoad::Pending,
            metrics: BackgroundMetrics::default(),
        };
        state.refresh(host.viewport());
        let image_url = state.image_url();
        let layer = Rc::new(RefCell::new(state));

        let apply_layer = layer.clone();
        let driver = TrackerDriver::new(tracker, host.frames(), move |frame: &TrackedFrame| {
            apply_layer.borrow().apply(frame);
        });
        driver.apply_current();

        let peephole = Self {
            driver,
            layer,
            root,
            listeners: ListenerSet::new(),
            class_name: spec.class_name.to_string(),
        };

        match image_url {
            Some(url) => {
                let handle = peephole.handle();
                let weak_host = Rc::downgrade(host);
                let loading = url.clone();
                host.load_image(
                    &url,
                    Box::new(move |result| {
                        if let Some(host) = weak_host.upgrade() {
                            handle.image_settled(&loading, result, host.viewport());
                        }
                    }),
                );
            }
            None => {
                debug!(class = spec.class_name, "no background image to measure");
                peephole.layer.borrow_mut().image = ImageLoad::Failed(ImageError::EmptyUrl);
            }
        }

        Ok(peephole)
    }

    pub fn handle(&self) -> PeepholeHandle {
        PeepholeHandle {
            layer: Rc::downgrade(&self.layer),
            driver: self.driver.downgrade(),
        }
    }

    pub fn driver(&self) -> &TrackerDriver {
        &self.driver
    }

    pub fn listeners_mut(&mut self) -> &mut ListenerSet {
        &mut self.listeners
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn metrics(&self) -> BackgroundMetrics {
        self.layer.borrow().metrics
    }

    pub fn image(&self) -> ImageLoad {
        self.layer.borrow().image.clone()
    }
}

impl Drop for Peephole {
    fn drop(&mut self) {
        self.driver.stop();
        self.listeners.clear();
        self.root.remove();
        debug!(class = %self.class_name, "peephole unmounted");
    }
}

//! Background metrics resolution

use euphoria_core::{Point, Rect, Size};
use tracing::trace;

use crate::parse::{
    parse_attachment, parse_position, parse_size, Attachment, BackgroundPosition, BackgroundSize,
};

/// Computed background style strings, as read from the background source
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BackgroundStyle {
    /// `background-image`, e.g. `url("/bg.jpg")` or `none`
    pub image: String,
    /// `background-size`
    pub size: String,
    /// `background-position`
    pub position: String,
    /// `background-attachment`
    pub attachment: String,
    /// `background-repeat`
    pub repeat: String,
}

/// The geometry-relevant part of a background declaration
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BackgroundDeclaration {
    pub size: BackgroundSize,
    pub position: BackgroundPosition,
    pub attachment: Attachment,
}

impl BackgroundDeclaration {
    pub fn parse(style: &BackgroundStyle) -> Self {
        Self {
            size: parse_size(&style.size),
            position: parse_position(&style.position),
            attachment: parse_attachment(&style.attachment),
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.attachment == Attachment::Fixed
    }
}

/// Where the background image is drawn inside its container
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BackgroundMetrics {
    /// Natural image size, if the image has loaded
    pub image: Option<Size>,
    /// Drawn size after cover/contain/explicit scaling
    pub drawn: Size,
    /// Offset of the drawn image from the container's top-left corner
    pub offset: Point,
    /// The box the background is laid out in (viewport when fixed)
    pub container: Size,
    pub fixed: bool,
}

/// Drawn size of an image with natural size `natural` inside `container`.
///
/// Without a usable natural size the image is assumed to fill the container.
pub fn resolve_drawn_size(size: &BackgroundSize, natural: Option<Size>, container: Size) -> Size {
    let Some(natural) = natural.filter(|n| n.is_positive()) else {
        return container;
    };

    match *size {
        BackgroundSize::Cover => {
            let scale = (container.width / natural.width).max(container.height / natural.height);
            Size::new(natural.width * scale, natural.height * scale)
        }
        BackgroundSize::Contain => {
            let scale = (container.width / natural.width).min(container.height / natural.height);
            Size::new(natural.width * scale, natural.height * scale)
        }
        BackgroundSize::Explicit { x, y } => {
            let ratio = natural.width / natural.height;
            let width = x.resolve(container.width, natural.width);
            let height = y.resolve(container.height, natural.height);
            match (width, height) {
                (None, None) => natural,
                (None, Some(h)) => Size::new(h * ratio, h),
                (Some(w), None) => Size::new(w, w / ratio),
                (Some(w), Some(h)) => Size::new(w, h),
            }
        }
    }
}

/// Resolve full background metrics.
///
/// `source` is the background element's bounding box; `viewport` replaces it
/// as the container when the attachment is fixed.
pub fn resolve_metrics(
    decl: &BackgroundDeclaration,
    natural: Option<Size>,
    source: Rect,
    viewport: Size,
) -> BackgroundMetrics {
    let fixed = decl.is_fixed();
    let container = if fixed { viewport } else { source.size() };
    let image = natural.filter(|n| n.is_positive());
    let drawn = resolve_drawn_size(&decl.size, image, container);
    let offset = Point::new(
        decl.position.x.resolve(container.width, drawn.width),
        decl.position.y.resolve(container.height, drawn.height),
    );

    trace!(
        drawn_w = drawn.width,
        drawn_h = drawn.height,
        offset_x = offset.x,
        offset_y = offset.y,
        fixed,
        "resolved background metrics"
    );

    BackgroundMetrics {
        image,
        drawn,
        offset,
        container,
        fixed,
    }
}

/// `background-position` for a peephole of `diameter` centred on `center`.
///
/// `center` is in viewport coordinates and `source_origin` is the background
/// source's top-left corner. With the layer translated so its centre sits on
/// `center`, the returned position makes the layer's image line up with the
/// page background underneath.
pub fn peephole_position(
    metrics: &BackgroundMetrics,
    center: Point,
    source_origin: Point,
    diameter: f32,
) -> Point {
    let local = if metrics.fixed {
        center
    } else {
        center.relative_to(source_origin)
    };
    let half = diameter / 2.0;
    Point::new(
        metrics.offset.x - local.x + half,
        metrics.offset.y - local.y + half,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{PositionToken, SizeToken};

    fn decl(size: &str, position: &str, attachment: &str) -> BackgroundDeclaration {
        BackgroundDeclaration::parse(&BackgroundStyle {
            size: size.into(),
            position: position.into(),
            attachment: attachment.into(),
            ..Default::default()
        })
    }

    const CONTAINER: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);
    const VIEWPORT: Size = Size::new(1280.0, 720.0);
    const IMAGE: Size = Size::new(400.0, 200.0);

    #[test]
    fn test_cover_centres_overflow() {
        let m = resolve_metrics(&decl("cover", "center center", ""), Some(IMAGE), CONTAINER, VIEWPORT);
        assert_eq!(m.drawn, Size::new(1200.0, 600.0));
        assert_eq!(m.offset, Point::new(-200.0, 0.0));
        assert!(!m.fixed);
    }

    #[test]
    fn test_contain_letterboxes() {
        let m = resolve_metrics(&decl("contain", "50% 50%", ""), Some(IMAGE), CONTAINER, VIEWPORT);
        assert_eq!(m.drawn, Size::new(800.0, 400.0));
        assert_eq!(m.offset, Point::new(0.0, 100.0));
    }

    #[test]
    fn test_keyword_corners() {
        let m = resolve_metrics(&decl("cover", "left top", ""), Some(IMAGE), CONTAINER, VIEWPORT);
        assert_eq!(m.offset, Point::ZERO);

        let m = resolve_metrics(&decl("contain", "right bottom", ""), Some(IMAGE), CONTAINER, VIEWPORT);
        assert_eq!(m.offset, Point::new(800.0 - 800.0, 600.0 - 400.0));
    }

    #[test]
    fn test_fixed_uses_viewport() {
        let m = resolve_metrics(&decl("cover", "50% 50%", "fixed"), Some(IMAGE), CONTAINER, VIEWPORT);
        assert!(m.fixed);
        assert_eq!(m.container, VIEWPORT);
        // scale = max(1280/400, 720/200) = 3.6
        assert!((m.drawn.width - 1440.0).abs() < 1e-3);
        assert!((m.drawn.height - 720.0).abs() < 1e-3);
    }

    #[test]
    fn test_no_image_fills_container() {
        let m = resolve_metrics(&decl("cover", "50% 50%", ""), None, CONTAINER, VIEWPORT);
        assert_eq!(m.drawn, CONTAINER.size());
        assert_eq!(m.offset, Point::ZERO);
        assert_eq!(m.image, None);
    }

    #[test]
    fn test_explicit_axes() {
        let auto_auto = BackgroundSize::default();
        assert_eq!(resolve_drawn_size(&auto_auto, Some(IMAGE), CONTAINER.size()), IMAGE);

        let width_only = BackgroundSize::Explicit {
            x: SizeToken::Px(100.0),
            y: SizeToken::Auto,
        };
        assert_eq!(
            resolve_drawn_size(&width_only, Some(IMAGE), CONTAINER.size()),
            Size::new(100.0, 50.0)
        );

        let height_only = BackgroundSize::Explicit {
            x: SizeToken::Auto,
            y: SizeToken::Percent(50.0),
        };
        assert_eq!(
            resolve_drawn_size(&height_only, Some(IMAGE), CONTAINER.size()),
            Size::new(600.0, 300.0)
        );

        // Both axes given: no aspect correction
        let both = BackgroundSize::Explicit {
            x: SizeToken::Px(10.0),
            y: SizeToken::Px(90.0),
        };
        assert_eq!(
            resolve_drawn_size(&both, Some(IMAGE), CONTAINER.size()),
            Size::new(10.0, 90.0)
        );
    }

    #[test]
    fn test_px_position_not_scaled() {
        let mut d = decl("cover", "50% 50%", "");
        d.position = BackgroundPosition::new(PositionToken::Px(15.0), PositionToken::Px(-5.0));
        let m = resolve_metrics(&d, Some(IMAGE), CONTAINER, VIEWPORT);
        assert_eq!(m.offset, Point::new(15.0, -5.0));
    }

    #[test]
    fn test_peephole_position_scroll_attachment() {
        let m = resolve_metrics(&decl("cover", "center", ""), Some(IMAGE), CONTAINER, VIEWPORT);
        // Source scrolled 100px up: pointer at viewport (300, 200) is local (300, 300)
        let pos = peephole_position(&m, Point::new(300.0, 200.0), Point::new(0.0, -100.0), 140.0);
        assert_eq!(pos, Point::new(-200.0 - 300.0 + 70.0, 0.0 - 300.0 + 70.0));
    }

    #[test]
    fn test_peephole_position_fixed_ignores_source() {
        let m = resolve_metrics(&decl("cover", "center", "fixed"), Some(IMAGE), CONTAINER, VIEWPORT);
        let a = peephole_position(&m, Point::new(640.0, 360.0), Point::ZERO, 64.0);
        let b = peephole_position(&m, Point::new(640.0, 360.0), Point::new(0.0, -900.0), 64.0);
        assert_eq!(a, b);
    }
}

//! Euphoria Room Background Geometry
//!
//! Works out where a browser draws a CSS background image, so a second layer
//! can draw the same image at the same apparent position through a moving
//! peephole.
//!
//! # Features
//!
//! - `background-size`: `cover`, `contain`, and per-axis px / % / `auto`
//! - `background-position`: keywords, percentages and pixel offsets
//! - `background-attachment: fixed` measured against the viewport
//! - Degrades to "drawn size = container size" while the image is unknown
//!
//! # Example
//!
//! ```rust
//! use euphoria_background::{resolve_metrics, BackgroundDeclaration, BackgroundStyle};
//! use euphoria_core::{Rect, Size};
//!
//! let style = BackgroundStyle {
//!     size: "cover".into(),
//!     position: "50% 50%".into(),
//!     ..Default::default()
//! };
//! let decl = BackgroundDeclaration::parse(&style);
//! let metrics = resolve_metrics(
//!     &decl,
//!     Some(Size::new(400.0, 200.0)),
//!     Rect::new(0.0, 0.0, 800.0, 600.0),
//!     Size::new(800.0, 600.0),
//! );
//! assert_eq!(metrics.drawn, Size::new(1200.0, 600.0));
//! assert_eq!(metrics.offset.x, -200.0);
//! ```

mod error;
mod image;
mod metrics;
mod parse;

pub use error::{ImageError, Result};
pub use image::ImageLoad;
pub use metrics::{
    peephole_position, resolve_drawn_size, resolve_metrics, BackgroundDeclaration,
    BackgroundMetrics, BackgroundStyle,
};
pub use parse::{
    css_url, extract_image_url, parse_attachment, parse_position, parse_position_token,
    parse_size, parse_size_token, Attachment, BackgroundPosition, BackgroundSize, PositionToken,
    SizeToken,
};

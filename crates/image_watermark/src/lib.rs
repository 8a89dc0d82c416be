//! Image Watermark
//!
//! An image component that loads a picture, draws it onto a 2D surface and
//! composites a single line of watermark text over it.
//!
//! # Features
//!
//! - Five anchor positions with pixel offsets, opacity, color, font and
//!   rotation about the anchor
//! - Explicit surface size or the image's natural size
//! - Explicit load lifecycle (idle, loading, loaded, errored) with stale
//!   loads dropped by generation
//! - Decoded images are retained, so watermark changes redraw from memory
//! - Props from JSON or TOML documents with the component's camelCase names
//! - A software [`RasterSurface`] and a recording
//!   [`PaintContext`](watermark_paint::PaintContext) surface
//!
//! # Example
//!
//! ```ignore
//! use image_watermark::{
//!     ImageWatermark, ImageWatermarkProps, Position, RasterSurface, WatermarkConfig,
//!     WatermarkHost,
//! };
//!
//! let props = ImageWatermarkProps::new(
//!     "https://picsum.photos/400/300",
//!     WatermarkConfig::new("© 2024 My Company")
//!         .position(Position::BottomRight)
//!         .font_size(16.0)
//!         .color("white"),
//! )
//! .size(400, 300);
//!
//! let component = ImageWatermark::new(props, RasterSurface::default())
//!     .on_error(|e| eprintln!("{e}"));
//! let mut host = WatermarkHost::new(component);
//! host.mount();
//! host.settle().await;
//! ```

pub mod compositor;
pub mod config;
pub mod error;
pub mod fallback;
pub mod props;
pub mod raster;
pub mod surface;

mod component;
mod host;

pub use component::{ErrorCallback, ImageWatermark, LoadCallback, LoadTicket, View};
pub use compositor::{anchor_point, composite, HORIZONTAL_MARGIN, VERTICAL_MARGIN};
pub use config::{Position, WatermarkConfig, WatermarkStyle};
pub use error::{Result, WatermarkError};
pub use fallback::{Placeholder, PLACEHOLDER_MESSAGE};
pub use host::WatermarkHost;
pub use props::{Dimension, ImageWatermarkProps, Style, StyleValue, MAX_SURFACE_DIMENSION};
pub use raster::RasterSurface;
pub use surface::Surface;

pub use watermark_core::LoadState;
pub use watermark_image::{ImageData, ImageError, ImageLoader};

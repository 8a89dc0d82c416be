//! Watermark Paint API
//!
//! A small 2D drawing vocabulary modelled on the HTML canvas context.
//!
//! # Features
//!
//! - Colors with CSS color string parsing (`#rgb`, `rgba()`, named colors)
//! - Canvas font strings (`"24px Arial, sans-serif"`)
//! - Affine transforms with canvas rotation semantics
//! - A recording [`PaintContext`] that captures draw commands together with
//!   the state they were issued under

pub mod color;
pub mod context;
pub mod css;
pub mod primitives;
pub mod text;
pub mod transform;

pub use color::Color;
pub use context::{PaintCommand, PaintContext, TextDraw};
pub use css::{parse_css_color, parse_font};
pub use primitives::{Point, Rect};
pub use text::{FontSpec, TextAlign, TextBaseline};
pub use transform::Transform2D;

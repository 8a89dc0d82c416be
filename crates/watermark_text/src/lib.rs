//! Text rendering for watermark overlays
//!
//! This crate provides:
//! - Font discovery by CSS font-family list (via fontdb)
//! - Glyph rasterization (via swash)
//! - Single-line layout into a coverage mask ready for compositing

pub mod font;
pub mod layout;
pub mod rasterizer;
pub mod registry;

pub use font::{FontFace, LineMetrics};
pub use layout::{layout_line, render_line, PlacedGlyph, TextLine, TextMask};
pub use rasterizer::{GlyphRasterizer, RasterizedGlyph};
pub use registry::{parse_family_list, FontRegistry, GenericFont};

use thiserror::Error;

/// Text rendering errors
#[derive(Error, Debug)]
pub enum TextError {
    #[error("Failed to load font: {0}")]
    FontLoadError(String),

    #[error("Invalid font data")]
    InvalidFontData,
}

pub type Result<T> = std::result::Result<T, TextError>;

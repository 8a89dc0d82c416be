//! Glyph rasterization using swash
//!
//! Converts glyph outlines to 8-bit coverage bitmaps. Color glyphs are
//! rendered as alpha masks and tinted with the fill color like any other
//! glyph.

use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::Format;

use crate::font::FontFace;
use crate::Result;

/// Rasterized glyph bitmap with metrics
#[derive(Debug, Clone)]
pub struct RasterizedGlyph {
    /// Coverage values, one byte per pixel, row-major
    pub bitmap: Vec<u8>,
    /// Bitmap width in pixels
    pub width: u32,
    /// Bitmap height in pixels
    pub height: u32,
    /// Horizontal bearing (offset from pen position to left edge)
    pub bearing_x: i32,
    /// Vertical bearing (offset from baseline up to top edge)
    pub bearing_y: i32,
    /// Horizontal advance in pixels
    pub advance: f32,
}

impl RasterizedGlyph {
    /// True for glyphs without ink, such as spaces
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Glyph rasterizer using swash
pub struct GlyphRasterizer {
    /// Swash scale context (caches scaling state)
    scale_context: ScaleContext,
}

impl GlyphRasterizer {
    pub fn new() -> Self {
        Self {
            scale_context: ScaleContext::new(),
        }
    }

    /// Rasterize a glyph at the given font size
    pub fn rasterize(
        &mut self,
        font: &FontFace,
        glyph_id: u16,
        font_size: f32,
    ) -> Result<RasterizedGlyph> {
        let swash_font = font.swash_ref()?;

        let mut scaler = self
            .scale_context
            .builder(swash_font)
            .size(font_size)
            .hint(false)
            .build();

        let metrics = swash_font.metrics(&[]);
        let scale = font_size / f32::from(metrics.units_per_em.max(1));
        let advance = swash_font.glyph_metrics(&[]).advance_width(glyph_id) * scale;

        let mut render = Render::new(&[
            Source::ColorOutline(0),
            Source::ColorBitmap(StrikeWith::BestFit),
            Source::Outline,
        ]);
        render.format(Format::Alpha);

        let glyph = match render.render(&mut scaler, glyph_id) {
            Some(img) => RasterizedGlyph {
                bitmap: match img.content {
                    // Color bitmaps come back as RGBA regardless of format
                    Content::Color => img.data.chunks_exact(4).map(|px| px[3]).collect(),
                    _ => img.data,
                },
                width: img.placement.width,
                height: img.placement.height,
                bearing_x: img.placement.left,
                bearing_y: img.placement.top,
                advance,
            },
            // Empty glyph (like space) - no bitmap but has advance
            None => RasterizedGlyph {
                bitmap: Vec::new(),
                width: 0,
                height: 0,
                bearing_x: 0,
                bearing_y: 0,
                advance,
            },
        };
        Ok(glyph)
    }
}

impl Default for GlyphRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

//! Single-line text layout
//!
//! Watermarks are one line of text, so layout is a left-to-right walk over
//! the characters using the font's horizontal advances. The laid out line is
//! rendered into a [`TextMask`]: a coverage bitmap positioned relative to the
//! pen origin on the baseline.

use std::sync::Arc;

use crate::font::FontFace;
use crate::rasterizer::GlyphRasterizer;
use crate::Result;

/// A glyph placed on the line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    pub glyph_id: u16,
    /// Pen position relative to the line start
    pub x: f32,
}

/// A laid out line of text
#[derive(Debug, Clone)]
pub struct TextLine {
    pub face: Arc<FontFace>,
    pub glyphs: Vec<PlacedGlyph>,
    /// Total advance width in pixels
    pub advance: f32,
    pub ascent: f32,
    pub descent: f32,
    /// Font size in pixels
    pub size: f32,
}

/// Lay out `text` on a single line at `font_size` pixels.
///
/// Line breaks and tabs render as spaces; characters missing from the face
/// use its `.notdef` glyph.
pub fn layout_line(face: &Arc<FontFace>, text: &str, font_size: f32) -> Result<TextLine> {
    let font = face.swash_ref()?;
    let metrics = face.line_metrics(font_size)?;
    let scale = font_size / f32::from(font.metrics(&[]).units_per_em.max(1));
    let charmap = font.charmap();
    let glyph_metrics = font.glyph_metrics(&[]);

    let mut glyphs = Vec::with_capacity(text.len());
    let mut pen = 0.0f32;
    for ch in text.chars() {
        let ch = if ch.is_whitespace() { ' ' } else { ch };
        let glyph_id = charmap.map(ch);
        glyphs.push(PlacedGlyph { glyph_id, x: pen });
        pen += glyph_metrics.advance_width(glyph_id) * scale;
    }

    Ok(TextLine {
        face: face.clone(),
        glyphs,
        advance: pen,
        ascent: metrics.ascent,
        descent: metrics.descent,
        size: font_size,
    })
}

/// Coverage bitmap for a rendered line.
///
/// `left` and `top` locate the bitmap's top-left pixel relative to the pen
/// origin on the baseline (y down, so `top` is usually negative).
#[derive(Debug, Clone, Default)]
pub struct TextMask {
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
    pub coverage: Vec<u8>,
}

impl TextMask {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn texel(&self, x: i32, y: i32) -> f32 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0.0;
        }
        f32::from(self.coverage[y as usize * self.width as usize + x as usize]) / 255.0
    }

    /// Bilinearly sampled coverage (0.0 to 1.0) at a point in line space.
    ///
    /// Pixel centers sit at half-integer coordinates; points outside the
    /// mask have zero coverage.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        if self.is_empty() || !x.is_finite() || !y.is_finite() {
            return 0.0;
        }
        let u = x - self.left as f32 - 0.5;
        let v = y - self.top as f32 - 0.5;
        let x0 = u.floor();
        let y0 = v.floor();
        let fx = u - x0;
        let fy = v - y0;
        let (x0, y0) = (x0 as i32, y0 as i32);

        let top = self.texel(x0, y0) * (1.0 - fx) + self.texel(x0 + 1, y0) * fx;
        let bottom = self.texel(x0, y0 + 1) * (1.0 - fx) + self.texel(x0 + 1, y0 + 1) * fx;
        top * (1.0 - fy) + bottom * fy
    }
}

/// Rasterize every glyph of `line` into a single coverage mask
pub fn render_line(rasterizer: &mut GlyphRasterizer, line: &TextLine) -> Result<TextMask> {
    let mut placed = Vec::with_capacity(line.glyphs.len());
    let (mut min_x, mut min_y) = (i32::MAX, i32::MAX);
    let (mut max_x, mut max_y) = (i32::MIN, i32::MIN);

    for glyph in &line.glyphs {
        let raster = rasterizer.rasterize(&line.face, glyph.glyph_id, line.size)?;
        if raster.is_empty() || raster.bitmap.len() < (raster.width * raster.height) as usize {
            continue;
        }
        let left = glyph.x.round() as i32 + raster.bearing_x;
        let top = -raster.bearing_y;
        min_x = min_x.min(left);
        min_y = min_y.min(top);
        max_x = max_x.max(left + raster.width as i32);
        max_y = max_y.max(top + raster.height as i32);
        placed.push((left, top, raster));
    }

    if placed.is_empty() {
        return Ok(TextMask::default());
    }

    let width = (max_x - min_x) as u32;
    let height = (max_y - min_y) as u32;
    let mut coverage = vec![0u8; width as usize * height as usize];

    for (left, top, raster) in &placed {
        let ox = (left - min_x) as usize;
        let oy = (top - min_y) as usize;
        for row in 0..raster.height as usize {
            let src = &raster.bitmap[row * raster.width as usize..][..raster.width as usize];
            let dst_start = (oy + row) * width as usize + ox;
            let dst = &mut coverage[dst_start..dst_start + raster.width as usize];
            // Overlapping glyphs (kerned pairs) keep the stronger coverage
            for (d, s) in dst.iter_mut().zip(src) {
                *d = (*d).max(*s);
            }
        }
    }

    tracing::trace!(
        glyphs = placed.len(),
        width,
        height,
        "rendered text line"
    );

    Ok(TextMask {
        width,
        height,
        left: min_x,
        top: min_y,
        coverage,
    })
}

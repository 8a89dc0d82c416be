//! Software raster surface
//!
//! Pixels are straight-alpha RGBA8 and every draw composites source-over.
//! Shapes and text are drawn by mapping each covered device pixel back
//! through the inverse transform, so rotated text keeps smooth edges.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use watermark_image::ImageData;
use watermark_paint::{Color, FontSpec, Point, Rect, TextAlign, TextBaseline, Transform2D};
use watermark_text::{layout_line, render_line, FontRegistry, GlyphRasterizer};

use crate::surface::Surface;

#[derive(Clone, Debug)]
struct DrawState {
    transform: Transform2D,
    global_alpha: f32,
    fill: Color,
    font: FontSpec,
    align: TextAlign,
    baseline: TextBaseline,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Transform2D::identity(),
            global_alpha: 1.0,
            fill: Color::BLACK,
            font: FontSpec::default(),
            align: TextAlign::default(),
            baseline: TextBaseline::default(),
        }
    }
}

/// A surface backed by an in-memory RGBA image
pub struct RasterSurface {
    pixels: RgbaImage,
    state: DrawState,
    state_stack: Vec<DrawState>,
    fonts: FontRegistry,
    rasterizer: GlyphRasterizer,
}

impl RasterSurface {
    /// Create a transparent surface that draws text with system fonts
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_fonts(width, height, FontRegistry::new())
    }

    /// Create a transparent surface drawing text from `fonts`
    pub fn with_fonts(width: u32, height: u32, fonts: FontRegistry) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            state: DrawState::default(),
            state_stack: Vec::new(),
            fonts,
            rasterizer: GlyphRasterizer::new(),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    pub fn fonts_mut(&mut self) -> &mut FontRegistry {
        &mut self.fonts
    }

    /// Write the surface as a PNG file
    pub fn save_png(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        self.pixels
            .save_with_format(path.as_ref(), image::ImageFormat::Png)
    }

    /// Fill color premultiplied by the global alpha
    fn effective_fill(&self) -> Color {
        let fill = self.state.fill.clamped();
        fill.with_alpha(fill.a * self.state.global_alpha)
    }

    /// Device-space pixel bounds of a local-space quad, clipped to the surface
    fn device_bounds(&self, corners: [Point; 4]) -> Option<(u32, u32, u32, u32)> {
        let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
        let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for corner in corners {
            let p = self.state.transform.apply(corner);
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
            return None;
        }

        let x0 = min_x.floor().max(0.0) as u32;
        let y0 = min_y.floor().max(0.0) as u32;
        let x1 = (max_x.ceil().max(0.0) as u32).min(self.pixels.width());
        let y1 = (max_y.ceil().max(0.0) as u32).min(self.pixels.height());
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    /// Composite `color` over every device pixel, weighted by `coverage`
    /// evaluated at the pixel center in local space
    fn fill_coverage(
        &mut self,
        corners: [Point; 4],
        color: Color,
        coverage: impl Fn(Point) -> f32,
    ) {
        let Some((x0, y0, x1, y1)) = self.device_bounds(corners) else {
            return;
        };
        let Some(inverse) = self.state.transform.invert() else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let local = inverse.apply(Point::new(x as f32 + 0.5, y as f32 + 0.5));
                let c = coverage(local);
                if c > 0.0 {
                    blend(self.pixels.get_pixel_mut(x, y), color, c);
                }
            }
        }
    }

    fn draw_image_translated(&mut self, image: &ImageData, dest: Rect) {
        let width = dest.width.round() as u32;
        let height = dest.height.round() as u32;
        if width == 0 || height == 0 {
            return;
        }

        let scaled;
        let source = if (width, height) == (image.width(), image.height()) {
            image.pixels()
        } else {
            scaled = imageops::resize(image.pixels(), width, height, FilterType::Triangle);
            &scaled
        };

        let left = (dest.x + self.state.transform.e).round() as i64;
        let top = (dest.y + self.state.transform.f).round() as i64;
        let alpha = self.state.global_alpha;

        for (sx, sy, px) in source.enumerate_pixels() {
            let dx = left + i64::from(sx);
            let dy = top + i64::from(sy);
            if dx < 0 || dy < 0 || dx >= i64::from(self.pixels.width()) || dy >= i64::from(self.pixels.height()) {
                continue;
            }
            let [r, g, b, a] = px.0;
            blend(
                self.pixels.get_pixel_mut(dx as u32, dy as u32),
                Color::from_rgba8(r, g, b, a),
                alpha,
            );
        }
    }

    fn draw_image_transformed(&mut self, image: &ImageData, dest: Rect) {
        if dest.width <= 0.0 || dest.height <= 0.0 || image.width() == 0 || image.height() == 0 {
            return;
        }
        let source = image.pixels();
        let (sw, sh) = (source.width(), source.height());
        let alpha = self.state.global_alpha;
        let Some((x0, y0, x1, y1)) = self.device_bounds(dest.corners()) else {
            return;
        };
        let Some(inverse) = self.state.transform.invert() else {
            return;
        };

        // Nearest-neighbour sampling
        for y in y0..y1 {
            for x in x0..x1 {
                let local = inverse.apply(Point::new(x as f32 + 0.5, y as f32 + 0.5));
                let u = (local.x - dest.x) / dest.width;
                let v = (local.y - dest.y) / dest.height;
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    continue;
                }
                let sx = ((u * sw as f32) as u32).min(sw - 1);
                let sy = ((v * sh as f32) as u32).min(sh - 1);
                let [r, g, b, a] = source.get_pixel(sx, sy).0;
                blend(
                    self.pixels.get_pixel_mut(x, y),
                    Color::from_rgba8(r, g, b, a),
                    alpha,
                );
            }
        }
    }
}

impl Default for RasterSurface {
    /// A 300x150 surface, the default canvas size
    fn default() -> Self {
        Self::new(300, 150)
    }
}

/// Source-over on straight alpha
fn blend(dst: &mut Rgba<u8>, src: Color, coverage: f32) {
    let sa = (src.a * coverage).clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let [dr, dg, db, da] = dst.0;
    let da = f32::from(da) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }

    let mix = |s: f32, d: u8| {
        let d = f32::from(d) / 255.0;
        let c = (s * sa + d * da * (1.0 - sa)) / out_a;
        (c.clamp(0.0, 1.0) * 255.0).round() as u8
    };
    *dst = Rgba([
        mix(src.r, dr),
        mix(src.g, dg),
        mix(src.b, db),
        (out_a.clamp(0.0, 1.0) * 255.0).round() as u8,
    ]);
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.pixels = RgbaImage::new(width, height);
        self.state = DrawState::default();
        self.state_stack.clear();
    }

    fn clear(&mut self) {
        for px in self.pixels.pixels_mut() {
            *px = Rgba([0, 0, 0, 0]);
        }
    }

    fn draw_image(&mut self, image: &ImageData, dest: Rect) {
        if self.state.transform.is_translation() {
            self.draw_image_translated(image, dest);
        } else {
            self.draw_image_transformed(image, dest);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let color = color.clamped();
        let color = color.with_alpha(color.a * self.state.global_alpha);
        self.fill_coverage(rect.corners(), color, |p| {
            if rect.contains(p) {
                1.0
            } else {
                0.0
            }
        });
    }

    fn set_font(&mut self, font: FontSpec) {
        self.state.font = font;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.fill = color;
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }

    fn global_alpha(&self) -> f32 {
        self.state.global_alpha
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.state.align = align;
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.baseline = baseline;
    }

    fn save(&mut self) {
        self.state_stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.state.transform = self
            .state
            .transform
            .then_apply(&Transform2D::translate(x, y));
    }

    fn rotate(&mut self, angle: f32) {
        self.state.transform = self.state.transform.then_apply(&Transform2D::rotate(angle));
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        if text.is_empty() {
            return;
        }
        let font = self.state.font.clone();
        let Some(face) = self.fonts.resolve_css(&font.family) else {
            tracing::warn!(font = %font, "no font available, skipping text");
            return;
        };

        let line = match layout_line(&face, text, font.size) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(font = %font, "text layout failed: {e}");
                return;
            }
        };
        let mask = match render_line(&mut self.rasterizer, &line) {
            Ok(mask) => mask,
            Err(e) => {
                tracing::warn!(font = %font, "glyph rasterization failed: {e}");
                return;
            }
        };
        if mask.is_empty() {
            return;
        }

        // Pen origin on the baseline, in local space
        let origin = Point::new(
            x + self.state.align.offset(line.advance),
            y + self.state.baseline.offset(line.ascent, line.descent),
        );
        let bounds = Rect::new(
            origin.x + mask.left as f32,
            origin.y + mask.top as f32,
            mask.width as f32,
            mask.height as f32,
        );
        tracing::trace!(
            text,
            face = face.family(),
            x = origin.x,
            y = origin.y,
            "fill_text"
        );

        let color = self.effective_fill();
        self.fill_coverage(bounds.corners(), color, |p| {
            mask.sample(p.x - origin.x, p.y - origin.y)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::composite;
    use crate::config::{Position, WatermarkConfig};
    use std::f32::consts::FRAC_PI_2;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> ImageData {
        ImageData::from_rgba(RgbaImage::from_pixel(width, height, Rgba(rgba)))
    }

    fn no_fonts(width: u32, height: u32) -> RasterSurface {
        RasterSurface::with_fonts(width, height, FontRegistry::empty())
    }

    #[test]
    fn test_draw_image_scales_to_destination() {
        let mut surface = no_fonts(8, 6);
        surface.draw_image(&solid(2, 2, [200, 10, 10, 255]), Rect::from_size(8.0, 6.0));
        assert!(surface.pixels().pixels().all(|p| p.0 == [200, 10, 10, 255]));
    }

    #[test]
    fn test_global_alpha_blends_source_over() {
        let mut surface = no_fonts(2, 2);
        surface.fill_rect(Rect::from_size(2.0, 2.0), Color::WHITE);
        surface.set_global_alpha(0.5);
        surface.fill_rect(Rect::from_size(2.0, 2.0), Color::BLACK);
        assert_eq!(surface.pixels().get_pixel(0, 0).0, [128, 128, 128, 255]);
    }

    #[test]
    fn test_fill_rect_on_transparent_keeps_straight_color() {
        let mut surface = no_fonts(1, 1);
        surface.fill_rect(Rect::from_size(1.0, 1.0), Color::RED.with_alpha(0.5));
        assert_eq!(surface.pixels().get_pixel(0, 0).0, [255, 0, 0, 128]);
    }

    #[test]
    fn test_rotated_rect_pivots_on_translation() {
        let mut surface = no_fonts(20, 20);
        surface.translate(10.0, 10.0);
        surface.rotate(FRAC_PI_2);
        // Local +x maps onto device +y after a quarter turn
        surface.fill_rect(Rect::new(0.0, -1.0, 8.0, 2.0), Color::BLUE);

        assert_eq!(surface.pixels().get_pixel(10, 15).0[3], 255);
        assert_eq!(surface.pixels().get_pixel(15, 10).0[3], 0);
    }

    #[test]
    fn test_save_restore_and_resize_reset_state() {
        let mut surface = no_fonts(4, 4);
        surface.set_global_alpha(0.3);
        surface.save();
        surface.set_global_alpha(0.9);
        surface.restore();
        assert_eq!(surface.global_alpha(), 0.3);

        surface.resize(10, 5);
        assert_eq!((surface.width(), surface.height()), (10, 5));
        assert_eq!(surface.global_alpha(), 1.0);
        assert!(surface.pixels().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_text_without_fonts_is_skipped() {
        let mut surface = no_fonts(50, 20);
        surface.set_fill_color(Color::BLACK);
        surface.fill_text("hello", 25.0, 10.0);
        assert!(surface.pixels().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_centered_text_inks_around_anchor() {
        let mut surface = RasterSurface::new(200, 100);
        if surface.fonts_mut().resolve_css("sans-serif").is_none() {
            return;
        }
        surface.set_font(FontSpec::new(32.0, "sans-serif"));
        surface.set_fill_color(Color::BLACK);
        surface.set_text_align(TextAlign::Center);
        surface.set_text_baseline(TextBaseline::Middle);
        surface.fill_text("HHHH", 100.0, 50.0);

        let inked: Vec<(u32, u32)> = surface
            .pixels()
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[3] > 0)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!inked.is_empty());

        let n = inked.len() as f32;
        let cx = inked.iter().map(|(x, _)| *x as f32).sum::<f32>() / n;
        let cy = inked.iter().map(|(_, y)| *y as f32).sum::<f32>() / n;
        assert!((cx - 100.0).abs() < 6.0, "ink centered at x={cx}");
        assert!((cy - 50.0).abs() < 10.0, "ink centered at y={cy}");
    }

    fn ink_box(surface: &RasterSurface) -> Option<(u32, u32, u32, u32, f32, f32)> {
        let inked: Vec<(u32, u32)> = surface
            .pixels()
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[3] > 0)
            .map(|(x, y, _)| (x, y))
            .collect();
        if inked.is_empty() {
            return None;
        }
        let n = inked.len() as f32;
        let cx = inked.iter().map(|(x, _)| *x as f32).sum::<f32>() / n;
        let cy = inked.iter().map(|(_, y)| *y as f32).sum::<f32>() / n;
        let min_x = inked.iter().map(|(x, _)| *x).min()?;
        let max_x = inked.iter().map(|(x, _)| *x).max()?;
        let min_y = inked.iter().map(|(_, y)| *y).min()?;
        let max_y = inked.iter().map(|(_, y)| *y).max()?;
        Some((min_x, max_x, min_y, max_y, cx, cy))
    }

    #[test]
    fn test_rotated_watermark_inks_around_anchor() {
        let mut surface = RasterSurface::new(200, 200);
        if surface.fonts_mut().resolve_css("sans-serif").is_none() {
            return;
        }
        let clear = solid(1, 1, [0, 0, 0, 0]);
        let config = WatermarkConfig::new("HHHHHH")
            .position(Position::Center)
            .font_size(32.0)
            .font_family("sans-serif")
            .opacity(1.0)
            .color("black");

        composite(&mut surface, &clear, &config.resolve());
        let (min_x, max_x, min_y, max_y, _, _) = ink_box(&surface).unwrap();
        assert!(max_x - min_x > max_y - min_y, "level text runs along x");

        composite(&mut surface, &clear, &config.rotation(90.0).resolve());
        let (min_x, max_x, min_y, max_y, cx, cy) = ink_box(&surface).unwrap();
        assert!(max_y - min_y > max_x - min_x, "quarter turn runs along y");
        assert!((cx - 100.0).abs() < 10.0, "ink centered at x={cx}");
        assert!((cy - 100.0).abs() < 6.0, "ink centered at y={cy}");
    }
}

//! Drawing surface abstraction
//!
//! The compositor draws through [`Surface`], a stateful 2D context in the
//! style of the HTML canvas. [`RasterSurface`](crate::RasterSurface)
//! produces pixels; [`PaintContext`] records commands for inspection.

use watermark_image::ImageData;
use watermark_paint::{Color, FontSpec, PaintContext, Rect, TextAlign, TextBaseline};

/// A stateful 2D drawing target
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Resize to `width`×`height`, clearing the pixels and resetting all
    /// drawing state
    fn resize(&mut self, width: u32, height: u32);

    /// Clear every pixel to transparent
    fn clear(&mut self);

    /// Draw `image` scaled into `dest`
    fn draw_image(&mut self, image: &ImageData, dest: Rect);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn set_font(&mut self, font: FontSpec);
    fn set_fill_color(&mut self, color: Color);

    /// Set the global alpha. Values outside `0.0..=1.0` are ignored.
    fn set_global_alpha(&mut self, alpha: f32);
    fn global_alpha(&self) -> f32;

    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);

    /// Push the drawing state
    fn save(&mut self);
    /// Pop the drawing state. Unbalanced calls are ignored.
    fn restore(&mut self);

    fn translate(&mut self, x: f32, y: f32);
    /// Rotate by `angle` radians, clockwise on screen
    fn rotate(&mut self, angle: f32);

    /// Fill `text` anchored at `(x, y)` in the current transform
    fn fill_text(&mut self, text: &str, x: f32, y: f32);
}

impl Surface for PaintContext {
    fn width(&self) -> u32 {
        PaintContext::width(self)
    }

    fn height(&self) -> u32 {
        PaintContext::height(self)
    }

    fn resize(&mut self, width: u32, height: u32) {
        PaintContext::resize(self, width, height);
    }

    fn clear(&mut self) {
        PaintContext::clear(self);
    }

    fn draw_image(&mut self, image: &ImageData, dest: Rect) {
        PaintContext::draw_image(self, image.width(), image.height(), dest);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        PaintContext::fill_rect(self, rect, color);
    }

    fn set_font(&mut self, font: FontSpec) {
        PaintContext::set_font(self, font);
    }

    fn set_fill_color(&mut self, color: Color) {
        PaintContext::set_fill_color(self, color);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        PaintContext::set_global_alpha(self, alpha);
    }

    fn global_alpha(&self) -> f32 {
        PaintContext::global_alpha(self)
    }

    fn set_text_align(&mut self, align: TextAlign) {
        PaintContext::set_text_align(self, align);
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        PaintContext::set_text_baseline(self, baseline);
    }

    fn save(&mut self) {
        PaintContext::save(self);
    }

    fn restore(&mut self) {
        PaintContext::restore(self);
    }

    fn translate(&mut self, x: f32, y: f32) {
        PaintContext::translate(self, x, y);
    }

    fn rotate(&mut self, angle: f32) {
        PaintContext::rotate(self, angle);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        PaintContext::fill_text(self, text, x, y);
    }
}

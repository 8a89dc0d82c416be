//! Image and watermark compositing

use watermark_image::ImageData;
use watermark_paint::{Point, Rect, TextAlign, TextBaseline};

use crate::config::{Position, WatermarkStyle};
use crate::surface::Surface;

/// Horizontal inset of corner positions, in pixels
pub const HORIZONTAL_MARGIN: f32 = 50.0;
/// Vertical inset of corner positions, in pixels
pub const VERTICAL_MARGIN: f32 = 30.0;

/// The point the watermark text is centered on (and rotates about)
pub fn anchor_point(
    position: Position,
    surface_width: f32,
    surface_height: f32,
    offset_x: f32,
    offset_y: f32,
) -> Point {
    let (x, y) = match position {
        Position::TopLeft => (HORIZONTAL_MARGIN, VERTICAL_MARGIN),
        Position::TopRight => (surface_width - HORIZONTAL_MARGIN, VERTICAL_MARGIN),
        Position::BottomLeft => (HORIZONTAL_MARGIN, surface_height - VERTICAL_MARGIN),
        Position::BottomRight => (
            surface_width - HORIZONTAL_MARGIN,
            surface_height - VERTICAL_MARGIN,
        ),
        Position::Center => (surface_width / 2.0, surface_height / 2.0),
    };
    Point::new(x + offset_x, y + offset_y)
}

/// Draw `image` filling the whole surface, then the watermark over it.
///
/// Global alpha is back at 1.0 when this returns.
pub fn composite<S: Surface + ?Sized>(surface: &mut S, image: &ImageData, style: &WatermarkStyle) {
    let width = surface.width() as f32;
    let height = surface.height() as f32;

    surface.clear();
    surface.draw_image(image, Rect::from_size(width, height));

    surface.set_font(style.font.clone());
    surface.set_fill_color(style.color);
    surface.set_global_alpha(style.opacity);
    surface.set_text_align(TextAlign::Center);
    surface.set_text_baseline(TextBaseline::Middle);

    let anchor = anchor_point(style.position, width, height, style.offset_x, style.offset_y);
    tracing::trace!(
        position = %style.position,
        x = anchor.x,
        y = anchor.y,
        rotation = style.rotation,
        "compositing watermark"
    );

    if style.is_rotated() {
        surface.save();
        surface.translate(anchor.x, anchor.y);
        surface.rotate(style.rotation_radians());
        surface.fill_text(&style.text, 0.0, 0.0);
        surface.restore();
    } else {
        surface.fill_text(&style.text, anchor.x, anchor.y);
    }

    surface.set_global_alpha(1.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WatermarkConfig;
    use image::{Rgba, RgbaImage};
    use watermark_paint::{parse_font, Color, PaintCommand, PaintContext};

    fn image(width: u32, height: u32) -> ImageData {
        ImageData::from_rgba(RgbaImage::from_pixel(width, height, Rgba([9, 9, 9, 255])))
    }

    #[test]
    fn test_anchor_formulas() {
        let cases = [
            (Position::TopLeft, (50.0, 30.0)),
            (Position::TopRight, (350.0, 30.0)),
            (Position::BottomLeft, (50.0, 270.0)),
            (Position::BottomRight, (350.0, 270.0)),
            (Position::Center, (200.0, 150.0)),
        ];
        for (position, (x, y)) in cases {
            assert_eq!(
                anchor_point(position, 400.0, 300.0, 0.0, 0.0),
                Point::new(x, y),
                "{position}"
            );
        }
    }

    #[test]
    fn test_offsets_shift_the_anchor() {
        assert_eq!(
            anchor_point(Position::TopLeft, 400.0, 300.0, 10.0, 10.0),
            Point::new(60.0, 40.0)
        );
        assert_eq!(
            anchor_point(Position::Center, 400.0, 300.0, -5.0, 2.5),
            Point::new(195.0, 152.5)
        );
    }

    #[test]
    fn test_composite_draw_order_and_state() {
        let mut ctx = PaintContext::new(400, 300);
        let style = WatermarkConfig::new("© 2024 My Company")
            .position(Position::BottomRight)
            .font_size(16.0)
            .color("white")
            .resolve();
        composite(&mut ctx, &image(40, 30), &style);

        let commands = ctx.commands();
        assert_eq!(commands[0], PaintCommand::Clear);
        match &commands[1] {
            PaintCommand::DrawImage {
                source_width,
                dest,
                global_alpha,
                ..
            } => {
                assert_eq!(*source_width, 40);
                assert_eq!(*dest, Rect::from_size(400.0, 300.0));
                assert_eq!(*global_alpha, 1.0);
            }
            other => panic!("expected DrawImage, got {other:?}"),
        }

        let draw = ctx.text_draws().next().unwrap();
        assert_eq!(draw.text, "© 2024 My Company");
        assert_eq!(draw.font.to_string(), "16px Arial, sans-serif");
        assert_eq!(parse_font(&draw.font.to_string()), Some(style.font.clone()));
        assert_eq!(draw.color, Color::WHITE);
        assert_eq!(draw.global_alpha, 0.7);
        assert_eq!(draw.align, TextAlign::Center);
        assert_eq!(draw.baseline, TextBaseline::Middle);
        assert_eq!(draw.device_position(), Point::new(350.0, 270.0));
        assert!(draw.transform.is_identity());
    }

    #[test]
    fn test_zero_rotation_draws_without_transform() {
        let mut rotated_zero = PaintContext::new(400, 300);
        composite(
            &mut rotated_zero,
            &image(4, 3),
            &WatermarkConfig::new("x").rotation(0.0).resolve(),
        );
        let mut omitted = PaintContext::new(400, 300);
        composite(&mut omitted, &image(4, 3), &WatermarkConfig::new("x").resolve());

        assert_eq!(rotated_zero.commands(), omitted.commands());
        assert!(!rotated_zero
            .commands()
            .iter()
            .any(|c| matches!(c, PaintCommand::Rotate { .. } | PaintCommand::Save)));
    }

    #[test]
    fn test_rotation_pivots_on_anchor() {
        let mut ctx = PaintContext::new(400, 300);
        let style = WatermarkConfig::new("CONFIDENTIAL")
            .position(Position::TopLeft)
            .rotation(90.0)
            .resolve();
        composite(&mut ctx, &image(4, 3), &style);

        let draw = ctx.text_draws().next().unwrap();
        assert_eq!(draw.position, Point::ZERO);
        let pivot = draw.device_position();
        assert!((pivot.x - 50.0).abs() < 1e-4 && (pivot.y - 30.0).abs() < 1e-4);

        // A step along the text's baseline moves down the screen
        let along = draw.transform.apply(Point::new(10.0, 0.0));
        assert!((along.x - 50.0).abs() < 1e-4 && (along.y - 40.0).abs() < 1e-4);

        // State is balanced once compositing finishes
        assert_eq!(ctx.state_depth(), 0);
        assert!(ctx.transform().is_identity());
    }

    #[test]
    fn test_alpha_restored_after_composite() {
        let mut ctx = PaintContext::new(100, 100);
        let style = WatermarkConfig::new("x").opacity(0.3).resolve();
        composite(&mut ctx, &image(1, 1), &style);

        assert_eq!(ctx.text_draws().next().unwrap().global_alpha, 0.3);
        assert_eq!(ctx.global_alpha(), 1.0);

        ctx.fill_rect(Rect::from_size(1.0, 1.0), Color::BLACK);
        match ctx.commands().last() {
            Some(PaintCommand::FillRect { global_alpha, .. }) => assert_eq!(*global_alpha, 1.0),
            other => panic!("expected FillRect, got {other:?}"),
        }
    }
}

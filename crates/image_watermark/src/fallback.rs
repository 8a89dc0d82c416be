//! Fallback placeholder shown when the image fails to load

use watermark_paint::{Color, FontSpec, Rect, TextAlign, TextBaseline};

use crate::props::{ImageWatermarkProps, Style};
use crate::surface::Surface;

pub const PLACEHOLDER_MESSAGE: &str = "Failed to load image";
/// Placeholder size when the props give none (the default canvas size)
pub const DEFAULT_PLACEHOLDER_SIZE: (u32, u32) = (300, 150);
pub const PLACEHOLDER_BACKGROUND: Color = Color::new(245.0 / 255.0, 245.0 / 255.0, 245.0 / 255.0, 1.0);
pub const PLACEHOLDER_TEXT_COLOR: Color = Color::new(102.0 / 255.0, 102.0 / 255.0, 102.0 / 255.0, 1.0);

/// The neutral box rendered in place of the surface after a failed load
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub width: u32,
    pub height: u32,
    pub message: &'static str,
    pub background: Color,
    pub text_color: Color,
    /// Inline style of the placeholder element
    pub style: Style,
    pub class_name: Option<String>,
}

impl Placeholder {
    pub fn for_props(props: &ImageWatermarkProps) -> Self {
        let (width, height) = props.explicit_size().unwrap_or(DEFAULT_PLACEHOLDER_SIZE);
        Self {
            width,
            height,
            message: PLACEHOLDER_MESSAGE,
            background: PLACEHOLDER_BACKGROUND,
            text_color: PLACEHOLDER_TEXT_COLOR,
            style: props.fallback_style(),
            class_name: props.class_name.clone(),
        }
    }

    /// Paint the placeholder onto `surface`, resizing it to fit
    pub fn paint<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.resize(self.width, self.height);
        surface.fill_rect(
            Rect::from_size(self.width as f32, self.height as f32),
            self.background,
        );
        surface.set_font(FontSpec::new(16.0, "sans-serif"));
        surface.set_fill_color(self.text_color);
        surface.set_text_align(TextAlign::Center);
        surface.set_text_baseline(TextBaseline::Middle);
        surface.fill_text(
            self.message,
            self.width as f32 / 2.0,
            self.height as f32 / 2.0,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WatermarkConfig;
    use watermark_paint::{parse_css_color, PaintCommand, PaintContext};

    #[test]
    fn test_colors_match_css() {
        assert_eq!(
            PLACEHOLDER_BACKGROUND.to_rgba8(),
            parse_css_color("#f5f5f5").unwrap().to_rgba8()
        );
        assert_eq!(
            PLACEHOLDER_TEXT_COLOR.to_rgba8(),
            parse_css_color("#666").unwrap().to_rgba8()
        );
    }

    #[test]
    fn test_size_follows_props() {
        let props = ImageWatermarkProps::new("x.png", WatermarkConfig::new("x"));
        let placeholder = Placeholder::for_props(&props);
        assert_eq!((placeholder.width, placeholder.height), (300, 150));

        let placeholder = Placeholder::for_props(&props.size(400, 300));
        assert_eq!((placeholder.width, placeholder.height), (400, 300));
        assert_eq!(placeholder.message, "Failed to load image");
    }

    #[test]
    fn test_paint_draws_box_then_message() {
        let props = ImageWatermarkProps::new("x.png", WatermarkConfig::new("x")).size(200, 100);
        let mut ctx = PaintContext::default();
        Placeholder::for_props(&props).paint(&mut ctx);

        assert_eq!(
            ctx.commands()[0],
            PaintCommand::Resize {
                width: 200,
                height: 100
            }
        );
        let draw = ctx.text_draws().next().unwrap();
        assert_eq!(draw.text, PLACEHOLDER_MESSAGE);
        assert_eq!(draw.device_position(), watermark_paint::Point::new(100.0, 50.0));
    }
}

//! Paint context - a recording drawing API
//!
//! `PaintContext` mirrors the stateful canvas API: styling calls mutate the
//! current state, `save`/`restore` push and pop it, and every draw call is
//! recorded as a [`PaintCommand`] carrying the state it was issued under.

use smallvec::SmallVec;

use crate::color::Color;
use crate::primitives::{Point, Rect};
use crate::text::{FontSpec, TextAlign, TextBaseline};
use crate::transform::Transform2D;

/// A text draw with the full effective state at the time of the call
#[derive(Clone, Debug, PartialEq)]
pub struct TextDraw {
    pub text: String,
    /// Anchor in local (pre-transform) coordinates
    pub position: Point,
    pub font: FontSpec,
    pub color: Color,
    pub global_alpha: f32,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    pub transform: Transform2D,
}

impl TextDraw {
    /// The anchor after applying the transform
    pub fn device_position(&self) -> Point {
        self.transform.apply(self.position)
    }
}

/// A paint command for the renderer
#[derive(Clone, Debug, PartialEq)]
pub enum PaintCommand {
    /// Reset the surface to transparent and resize it
    Resize { width: u32, height: u32 },
    Clear,
    DrawImage {
        source_width: u32,
        source_height: u32,
        dest: Rect,
        global_alpha: f32,
        transform: Transform2D,
    },
    FillRect {
        rect: Rect,
        color: Color,
        global_alpha: f32,
        transform: Transform2D,
    },
    FillText(TextDraw),
    Save,
    Restore,
    Translate { x: f32, y: f32 },
    Rotate { angle: f32 },
}

#[derive(Clone, Debug, PartialEq)]
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

/// The paint context used for recording drawing
#[derive(Debug)]
pub struct PaintContext {
    width: u32,
    height: u32,
    commands: Vec<PaintCommand>,
    state: DrawState,
    state_stack: SmallVec<[DrawState; 4]>,
}

impl PaintContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            state: DrawState::default(),
            state_stack: SmallVec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get all recorded commands
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Take ownership of recorded commands
    pub fn take_commands(&mut self) -> Vec<PaintCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Every text draw recorded so far
    pub fn text_draws(&self) -> impl Iterator<Item = &TextDraw> {
        self.commands.iter().filter_map(|cmd| match cmd {
            PaintCommand::FillText(draw) => Some(draw),
            _ => None,
        })
    }

    /// Current save/restore depth
    pub fn state_depth(&self) -> usize {
        self.state_stack.len()
    }

    /// Resize the surface. Like a canvas, this also resets all state.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.state = DrawState::default();
        self.state_stack.clear();
        self.commands.push(PaintCommand::Resize { width, height });
    }

    pub fn clear(&mut self) {
        self.commands.push(PaintCommand::Clear);
    }

    // === State ===

    pub fn global_alpha(&self) -> f32 {
        self.state.global_alpha
    }

    pub fn set_global_alpha(&mut self, alpha: f32) {
        // Canvas ignores out-of-range assignments
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }

    pub fn fill_color(&self) -> Color {
        self.state.fill
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.state.fill = color;
    }

    pub fn font(&self) -> &FontSpec {
        &self.state.font
    }

    pub fn set_font(&mut self, font: FontSpec) {
        self.state.font = font;
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.state.align = align;
    }

    pub fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.baseline = baseline;
    }

    pub fn transform(&self) -> Transform2D {
        self.state.transform
    }

    pub fn save(&mut self) {
        self.state_stack.push(self.state.clone());
        self.commands.push(PaintCommand::Save);
    }

    /// Pops the most recently saved state. Does nothing if the stack is empty.
    pub fn restore(&mut self) {
        match self.state_stack.pop() {
            Some(state) => {
                self.state = state;
                self.commands.push(PaintCommand::Restore);
            }
            None => tracing::trace!("restore() with an empty state stack"),
        }
    }

    // === Transforms ===

    pub fn translate(&mut self, x: f32, y: f32) {
        self.state.transform = self
            .state
            .transform
            .then_apply(&Transform2D::translate(x, y));
        self.commands.push(PaintCommand::Translate { x, y });
    }

    pub fn rotate(&mut self, angle: f32) {
        self.state.transform = self.state.transform.then_apply(&Transform2D::rotate(angle));
        self.commands.push(PaintCommand::Rotate { angle });
    }

    // === Drawing ===

    pub fn draw_image(&mut self, source_width: u32, source_height: u32, dest: Rect) {
        self.commands.push(PaintCommand::DrawImage {
            source_width,
            source_height,
            dest,
            global_alpha: self.state.global_alpha,
            transform: self.state.transform,
        });
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(PaintCommand::FillRect {
            rect,
            color,
            global_alpha: self.state.global_alpha,
            transform: self.state.transform,
        });
    }

    pub fn fill_text(&mut self, text: impl Into<String>, x: f32, y: f32) {
        self.commands.push(PaintCommand::FillText(TextDraw {
            text: text.into(),
            position: Point::new(x, y),
            font: self.state.font.clone(),
            color: self.state.fill,
            global_alpha: self.state.global_alpha,
            align: self.state.align,
            baseline: self.state.baseline,
            transform: self.state.transform,
        }));
    }
}

impl Default for PaintContext {
    /// A 300x150 context, the default canvas size
    fn default() -> Self {
        Self::new(300, 150)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_returns_to_saved_state() {
        let mut ctx = PaintContext::default();
        ctx.set_global_alpha(0.4);
        ctx.save();
        ctx.translate(10.0, 20.0);
        ctx.set_global_alpha(0.9);
        ctx.restore();

        assert_eq!(ctx.global_alpha(), 0.4);
        assert!(ctx.transform().is_identity());
        assert_eq!(ctx.state_depth(), 0);
    }

    #[test]
    fn test_unbalanced_restore_is_ignored() {
        let mut ctx = PaintContext::default();
        ctx.restore();
        assert!(ctx.commands().is_empty());
    }

    #[test]
    fn test_out_of_range_alpha_is_ignored() {
        let mut ctx = PaintContext::default();
        ctx.set_global_alpha(0.5);
        ctx.set_global_alpha(1.5);
        ctx.set_global_alpha(f32::NAN);
        assert_eq!(ctx.global_alpha(), 0.5);
    }

    #[test]
    fn test_fill_text_captures_state() {
        let mut ctx = PaintContext::new(400, 300);
        ctx.set_font(FontSpec::new(16.0, "serif"));
        ctx.set_fill_color(Color::RED);
        ctx.set_text_align(TextAlign::Center);
        ctx.translate(5.0, 6.0);
        ctx.fill_text("hello", 1.0, 2.0);

        let draw = ctx.text_draws().next().unwrap();
        assert_eq!(draw.text, "hello");
        assert_eq!(draw.font.to_string(), "16px serif");
        assert_eq!(draw.color, Color::RED);
        assert_eq!(draw.align, TextAlign::Center);
        assert_eq!(draw.device_position(), Point::new(6.0, 8.0));
    }

    #[test]
    fn test_resize_resets_state() {
        let mut ctx = PaintContext::default();
        ctx.set_global_alpha(0.2);
        ctx.save();
        ctx.resize(64, 32);

        assert_eq!((ctx.width(), ctx.height()), (64, 32));
        assert_eq!(ctx.global_alpha(), 1.0);
        assert_eq!(ctx.state_depth(), 0);
    }
}

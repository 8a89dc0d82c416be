//! Text drawing state

use std::fmt;

/// Canvas font: pixel size plus a CSS font-family list
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub family: String,
}

impl FontSpec {
    pub fn new(size: f32, family: impl Into<String>) -> Self {
        Self {
            size,
            family: family.into(),
        }
    }
}

impl Default for FontSpec {
    /// The canvas default, `10px sans-serif`
    fn default() -> Self {
        Self::new(10.0, "sans-serif")
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {}", self.size, self.family)
    }
}

/// Horizontal text anchor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Start,
    Left,
    Center,
    Right,
    End,
}

impl TextAlign {
    /// Offset of the pen origin relative to the anchor for a run `width` wide
    pub fn offset(self, width: f32) -> f32 {
        match self {
            TextAlign::Start | TextAlign::Left => 0.0,
            TextAlign::Center => -width / 2.0,
            TextAlign::Right | TextAlign::End => -width,
        }
    }
}

/// Vertical text anchor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextBaseline {
    #[default]
    Alphabetic,
    Top,
    Middle,
    Bottom,
}

impl TextBaseline {
    /// Offset of the baseline relative to the anchor.
    ///
    /// `ascent` and `descent` are both positive distances from the baseline.
    pub fn offset(self, ascent: f32, descent: f32) -> f32 {
        match self {
            TextBaseline::Alphabetic => 0.0,
            TextBaseline::Top => ascent,
            TextBaseline::Middle => (ascent - descent) / 2.0,
            TextBaseline::Bottom => -descent,
        }
    }
}

//! Watermark configuration
//!
//! [`WatermarkConfig`] is the caller-facing value, deserialized with the
//! component's camelCase option names. Every optional field may be absent
//! or nonsensical; [`WatermarkConfig::resolve`] turns it into a fully
//! specified [`WatermarkStyle`] without ever failing.

use std::fmt;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use watermark_paint::{parse_css_color, Color, FontSpec};

pub const DEFAULT_OPACITY: f32 = 0.7;
pub const DEFAULT_FONT_SIZE: f32 = 24.0;
pub const DEFAULT_FONT_FAMILY: &str = "Arial, sans-serif";
pub const DEFAULT_COLOR_CSS: &str = "rgba(255, 255, 255, 0.7)";
/// `DEFAULT_COLOR_CSS` as a color
pub const DEFAULT_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.7);

/// Where the watermark anchor sits on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    #[default]
    Center,
}

impl Position {
    /// Parse a position keyword. Unrecognized values mean center.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.trim() {
            "top-left" => Position::TopLeft,
            "top-right" => Position::TopRight,
            "bottom-left" => Position::BottomLeft,
            "bottom-right" => Position::BottomRight,
            _ => Position::Center,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::TopLeft => "top-left",
            Position::TopRight => "top-right",
            Position::BottomLeft => "bottom-left",
            Position::BottomRight => "bottom-right",
            Position::Center => "center",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Position {
    fn from(keyword: &str) -> Self {
        Position::from_keyword(keyword)
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Loose::deserialize(deserializer)? {
            Loose::Text(keyword) => Position::from_keyword(&keyword),
            _ => Position::Center,
        })
    }
}

/// Any document value, narrowed to what a watermark option can use
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(f64),
    Text(String),
    Other(#[allow(dead_code)] IgnoredAny),
}

/// Numbers and numeric strings; anything else is unset
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f32>, D::Error> {
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Number(n)) => Some(n as f32),
        Some(Loose::Text(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Strings only; anything else is unset
fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Text(s)) => Some(s),
        _ => None,
    })
}

/// Watermark options as supplied by the caller.
///
/// Only `text` is required. An option of the wrong type deserializes as
/// unset, so it takes its default instead of rejecting the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkConfig {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub opacity: Option<f32>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub font_size: Option<f32>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub font_family: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<String>,
    /// Degrees, clockwise-positive
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub rotation: Option<f32>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub offset_x: Option<f32>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub offset_y: Option<f32>,
}

impl WatermarkConfig {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn rotation(mut self, degrees: f32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn offset(mut self, x: f32, y: f32) -> Self {
        self.offset_x = Some(x);
        self.offset_y = Some(y);
        self
    }

    /// Apply defaults and sanitize every field
    pub fn resolve(&self) -> WatermarkStyle {
        let opacity = match self.opacity {
            Some(o) if o.is_finite() && o > 0.0 => o.min(1.0),
            _ => DEFAULT_OPACITY,
        };

        let size = match self.font_size {
            Some(s) if s.is_finite() && s > 0.0 => s,
            _ => DEFAULT_FONT_SIZE,
        };

        let family = self
            .font_family
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_FONT_FAMILY);

        let color = match self.color.as_deref() {
            Some(css) => parse_css_color(css).unwrap_or_else(|| {
                tracing::debug!(color = css, "unparsable watermark color, using default");
                DEFAULT_COLOR
            }),
            None => DEFAULT_COLOR,
        };

        WatermarkStyle {
            text: self.text.clone(),
            position: self.position.unwrap_or_default(),
            opacity,
            font: FontSpec::new(size, family),
            color,
            rotation: finite_or_zero(self.rotation),
            offset_x: finite_or_zero(self.offset_x),
            offset_y: finite_or_zero(self.offset_y),
        }
    }
}

fn finite_or_zero(value: Option<f32>) -> f32 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// A watermark with every option resolved
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkStyle {
    pub text: String,
    pub position: Position,
    /// Global alpha in (0, 1]
    pub opacity: f32,
    pub font: FontSpec,
    pub color: Color,
    /// Degrees, clockwise-positive
    pub rotation: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl WatermarkStyle {
    pub fn is_rotated(&self) -> bool {
        self.rotation != 0.0
    }

    pub fn rotation_radians(&self) -> f32 {
        self.rotation.to_radians()
    }
}

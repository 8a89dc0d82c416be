//! Component props and style passthrough

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::WatermarkConfig;
use crate::error::Result;

/// Largest explicit surface side, matching common canvas limits
pub const MAX_SURFACE_DIMENSION: u32 = 32_767;

/// A width or height as the caller wrote it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    /// A bare number of pixels
    Pixels(f64),
    /// Any CSS length string, e.g. `"400"` or `"400px"`
    Css(String),
}

impl Dimension {
    /// Pixel count for sizing the surface.
    ///
    /// Strings read their leading integer the way `parseInt` does, so
    /// `"400px"` is 400 and `"50%"` is 50. Returns `None` unless the result
    /// is a positive whole number of pixels.
    pub fn to_pixels(&self) -> Option<u32> {
        let value = match self {
            Dimension::Pixels(px) => *px,
            Dimension::Css(css) => leading_integer(css)? as f64,
        };
        if value.is_finite() && value >= 1.0 {
            Some(value.min(u32::MAX as f64) as u32)
        } else {
            None
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            Dimension::Pixels(px) => *px == 0.0 || px.is_nan(),
            Dimension::Css(css) => css.is_empty(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Pixels(px) => write!(f, "{px}px"),
            Dimension::Css(css) => f.write_str(css),
        }
    }
}

impl From<u32> for Dimension {
    fn from(px: u32) -> Self {
        Dimension::Pixels(f64::from(px))
    }
}

impl From<f64> for Dimension {
    fn from(px: f64) -> Self {
        Dimension::Pixels(px)
    }
}

impl From<&str> for Dimension {
    fn from(css: &str) -> Self {
        Dimension::Css(css.to_string())
    }
}

fn leading_integer(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// A single inline style value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

/// Properties that take bare numbers
const UNITLESS_PROPERTIES: &[&str] = &[
    "flex",
    "flex-grow",
    "flex-shrink",
    "font-weight",
    "line-height",
    "opacity",
    "order",
    "z-index",
    "zoom",
];

impl StyleValue {
    /// CSS text for this value under `property`, adding `px` to numbers
    /// where the property expects a length
    pub fn to_css(&self, property: &str) -> String {
        match self {
            StyleValue::Number(n) if *n == 0.0 || UNITLESS_PROPERTIES.contains(&property) => {
                n.to_string()
            }
            StyleValue::Number(n) => format!("{n}px"),
            StyleValue::Text(text) => text.clone(),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(text: &str) -> Self {
        StyleValue::Text(text.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(text: String) -> Self {
        StyleValue::Text(text)
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        StyleValue::Number(n)
    }
}

/// Convert a camelCase style key (`borderRadius`) to its CSS property name
/// (`border-radius`). Already hyphenated names pass through.
pub fn css_property_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            name.push('-');
            name.push(ch.to_ascii_lowercase());
        } else {
            name.push(ch);
        }
    }
    name
}

/// Inline style map keyed by CSS property name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, StyleValue>", into = "BTreeMap<String, StyleValue>")]
pub struct Style {
    properties: BTreeMap<String, StyleValue>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Style::set`]
    pub fn with(mut self, key: &str, value: impl Into<StyleValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<StyleValue>) {
        self.properties.insert(css_property_name(key), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.properties.get(&css_property_name(key))
    }

    /// CSS text of a property, if set
    pub fn css_value(&self, key: &str) -> Option<String> {
        let name = css_property_name(key);
        self.properties.get(&name).map(|v| v.to_css(&name))
    }

    /// Overlay `other`; its properties win
    pub fn extend(&mut self, other: &Style) {
        for (name, value) in &other.properties {
            self.properties.insert(name.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render as an inline `style` attribute
    pub fn to_css(&self) -> String {
        self.properties
            .iter()
            .map(|(name, value)| format!("{name}: {}", value.to_css(name)))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl From<BTreeMap<String, StyleValue>> for Style {
    fn from(raw: BTreeMap<String, StyleValue>) -> Self {
        Self {
            properties: raw
                .into_iter()
                .map(|(key, value)| (css_property_name(&key), value))
                .collect(),
        }
    }
}

impl From<Style> for BTreeMap<String, StyleValue> {
    fn from(style: Style) -> Self {
        style.properties
    }
}

fn size_or_auto(dimension: Option<&Dimension>) -> StyleValue {
    match dimension {
        Some(d) if !d.is_blank() => StyleValue::Text(d.to_string()),
        _ => StyleValue::Text("auto".to_string()),
    }
}

/// Props of the image watermark component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageWatermarkProps {
    /// Image to load: a path, `file://` or `http(s)://` URL, or data URI
    pub src: String,
    /// Accessibility label for the surface
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
    pub watermark: WatermarkConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Applied to the root element, surface or fallback
    #[serde(default, skip_serializing_if = "Style::is_empty")]
    pub style: Style,
    /// Applied to the drawing surface only
    #[serde(default, skip_serializing_if = "Style::is_empty")]
    pub canvas_style: Style,
}

impl ImageWatermarkProps {
    pub fn new(src: impl Into<String>, watermark: WatermarkConfig) -> Self {
        Self {
            src: src.into(),
            alt: String::new(),
            width: None,
            height: None,
            watermark,
            class_name: None,
            style: Style::default(),
            canvas_style: Style::default(),
        }
    }

    /// Parse props from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse props from a TOML document
    pub fn from_toml_str(document: &str) -> Result<Self> {
        Ok(toml::from_str(document)?)
    }

    pub fn alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = alt.into();
        self
    }

    pub fn size(mut self, width: impl Into<Dimension>, height: impl Into<Dimension>) -> Self {
        self.width = Some(width.into());
        self.height = Some(height.into());
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn canvas_style(mut self, style: Style) -> Self {
        self.canvas_style = style;
        self
    }

    /// Explicit surface size. Applies only when both width and height
    /// resolve to positive pixel counts; each side is capped at
    /// [`MAX_SURFACE_DIMENSION`].
    pub fn explicit_size(&self) -> Option<(u32, u32)> {
        let width = self.width.as_ref()?.to_pixels()?;
        let height = self.height.as_ref()?.to_pixels()?;
        Some((
            width.min(MAX_SURFACE_DIMENSION),
            height.min(MAX_SURFACE_DIMENSION),
        ))
    }

    /// Whether moving from `self` to `next` requires a fresh load
    pub fn needs_reload(&self, next: &ImageWatermarkProps) -> bool {
        self.src != next.src || self.width != next.width || self.height != next.height
    }

    /// `alt`, when non-empty
    pub fn accessibility_label(&self) -> Option<&str> {
        (!self.alt.is_empty()).then_some(self.alt.as_str())
    }

    /// Inline style of the drawing surface
    pub fn surface_style(&self) -> Style {
        let mut style = Style::new()
            .with("width", size_or_auto(self.width.as_ref()))
            .with("height", size_or_auto(self.height.as_ref()))
            .with("max-width", "100%");
        style.extend(&self.canvas_style);
        style.extend(&self.style);
        style
    }

    /// Inline style of the fallback placeholder
    pub fn fallback_style(&self) -> Style {
        let mut style = Style::new()
            .with("width", size_or_auto(self.width.as_ref()))
            .with("height", size_or_auto(self.height.as_ref()))
            .with("display", "flex")
            .with("align-items", "center")
            .with("justify-content", "center")
            .with("background-color", "#f5f5f5")
            .with("color", "#666");
        style.extend(&self.style);
        style
    }
}

//! Loaded font faces

use std::fmt;
use std::sync::Arc;

use crate::{Result, TextError};

/// Vertical metrics of a face at a given pixel size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    /// Distance from the baseline to the top of the em box (positive)
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the em box (positive)
    pub descent: f32,
}

/// A font face backed by shared font file data
#[derive(Clone)]
pub struct FontFace {
    data: Arc<Vec<u8>>,
    face_index: u32,
    family: String,
}

impl FontFace {
    /// Wrap raw font data, validating that swash can parse the face
    pub fn new(data: Arc<Vec<u8>>, face_index: u32, family: impl Into<String>) -> Result<Self> {
        if swash::FontRef::from_index(&data, face_index as usize).is_none() {
            return Err(TextError::InvalidFontData);
        }
        Ok(Self {
            data,
            face_index,
            family: family.into(),
        })
    }

    /// Raw font file data (may be a collection)
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Index of this face within the font file
    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    /// Family name reported by the font
    pub fn family(&self) -> &str {
        &self.family
    }

    pub(crate) fn swash_ref(&self) -> Result<swash::FontRef<'_>> {
        swash::FontRef::from_index(&self.data, self.face_index as usize)
            .ok_or(TextError::InvalidFontData)
    }

    /// Ascent and descent scaled to `font_size` pixels
    pub fn line_metrics(&self, font_size: f32) -> Result<LineMetrics> {
        let font = self.swash_ref()?;
        let metrics = font.metrics(&[]);
        let scale = font_size / f32::from(metrics.units_per_em.max(1));
        Ok(LineMetrics {
            ascent: metrics.ascent.abs() * scale,
            descent: metrics.descent.abs() * scale,
        })
    }
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("face_index", &self.face_index)
            .field("bytes", &self.data.len())
            .finish()
    }
}

//! Component errors

use thiserror::Error;
use watermark_image::ImageError;

/// Errors surfaced by the watermark component
#[derive(Error, Debug)]
pub enum WatermarkError {
    /// The image behind `src` could not be fetched or decoded
    #[error("Failed to load image: {src}")]
    ImageLoad {
        src: String,
        #[source]
        source: ImageError,
    },

    /// A props document could not be parsed
    #[error("invalid props document: {0}")]
    Config(String),
}

impl WatermarkError {
    /// The source that failed to load, if this is a load failure
    pub fn src(&self) -> Option<&str> {
        match self {
            WatermarkError::ImageLoad { src, .. } => Some(src),
            WatermarkError::Config(_) => None,
        }
    }
}

impl From<serde_json::Error> for WatermarkError {
    fn from(err: serde_json::Error) -> Self {
        WatermarkError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for WatermarkError {
    fn from(err: toml::de::Error) -> Self {
        WatermarkError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WatermarkError>;

//! Image loading errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while fetching or decoding an image
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("invalid base64 image data: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("invalid image data: {0}")]
    InvalidData(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("loading {0} requires the `network` feature")]
    NetworkDisabled(String),

    #[error("{0} must be loaded asynchronously")]
    RequiresAsync(String),

    #[error("image load task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, ImageError>;

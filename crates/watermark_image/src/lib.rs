//! Watermark Image
//!
//! Image loading for the image watermark component.
//!
//! # Features
//!
//! - Load images from file paths, URLs, data URIs, raw bytes and RGBA buffers
//! - Support for PNG, JPEG, GIF, WebP, BMP formats
//! - Decoded-image LRU cache so redraws never re-fetch
//! - Async [`ImageLoader`] for driving loads off the UI thread
//!
//! # Example
//!
//! ```ignore
//! use watermark_image::{ImageData, ImageSource};
//!
//! // Load from file
//! let data = ImageData::load(&ImageSource::file("image.png"))?;
//!
//! // Load from a data URI
//! let data = ImageData::load(&ImageSource::from_uri("data:image/png;base64,iVBORw0KGgo..."))?;
//!
//! // Load from URL (requires "network" feature)
//! let data = ImageData::load_async(ImageSource::url("https://example.com/image.png")).await?;
//! ```

mod cache;
mod error;
mod loader;
mod source;

pub use cache::ImageCache;
pub use error::{ImageError, Result};
pub use loader::{ImageData, ImageLoader};
pub use source::{ImageFormat, ImageSource};

/// Re-exported so downstream crates share one pixel buffer type
pub use image::RgbaImage;

//! Image decoding and async loading

use std::sync::{Arc, Mutex};

use base64::Engine as _;
use image::RgbaImage;

use crate::cache::ImageCache;
use crate::error::{ImageError, Result};
use crate::source::{ImageFormat, ImageSource};

/// A decoded image in straight-alpha RGBA8
#[derive(Debug, Clone)]
pub struct ImageData {
    pixels: RgbaImage,
}

impl ImageData {
    /// Wrap an already decoded buffer
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Natural width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Natural height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }

    /// Load an image synchronously.
    ///
    /// URL sources are rejected with [`ImageError::RequiresAsync`]; use
    /// [`ImageData::load_async`] for those.
    pub fn load(source: &ImageSource) -> Result<Self> {
        match source {
            ImageSource::File(path) => {
                let bytes = std::fs::read(path).map_err(|source| ImageError::Io {
                    path: path.clone(),
                    source,
                })?;
                Self::decode(&bytes, source.format_hint())
            }
            ImageSource::Base64(data) => {
                let bytes = decode_base64(data)?;
                Self::decode(&bytes, source.format_hint())
            }
            ImageSource::Bytes { data, format } => Self::decode(data, *format),
            ImageSource::Rgba {
                data,
                width,
                height,
            } => RgbaImage::from_raw(*width, *height, data.clone())
                .map(Self::from_rgba)
                .ok_or_else(|| {
                    ImageError::InvalidData(format!(
                        "{} bytes is not a {}x{} RGBA buffer",
                        data.len(),
                        width,
                        height
                    ))
                }),
            ImageSource::Url(url) => Err(ImageError::RequiresAsync(url.clone())),
        }
    }

    /// Load an image without blocking the calling task.
    ///
    /// Local sources decode on the blocking pool; URLs are fetched with
    /// reqwest when the `network` feature is enabled.
    pub async fn load_async(source: ImageSource) -> Result<Self> {
        match source {
            ImageSource::Url(url) => fetch_url(url).await,
            local => {
                tokio::task::spawn_blocking(move || Self::load(&local))
                    .await
                    .map_err(|e| ImageError::Task(e.to_string()))?
            }
        }
    }

    /// Decode encoded bytes, trusting `format` when given and sniffing otherwise
    pub fn decode(bytes: &[u8], format: Option<ImageFormat>) -> Result<Self> {
        let decoded = match format {
            Some(format) => image::load_from_memory_with_format(bytes, format.into())?,
            None => image::load_from_memory(bytes)?,
        };
        tracing::trace!(
            width = decoded.width(),
            height = decoded.height(),
            "decoded image"
        );
        Ok(Self::from_rgba(decoded.to_rgba8()))
    }
}

/// Strip an optional data URI header and decode the payload
fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let payload = if data.starts_with("data:") {
        let (header, payload) = data.split_once(',').ok_or_else(|| {
            ImageError::InvalidData("data URI is missing its ',' separator".to_string())
        })?;
        if !header.ends_with(";base64") {
            return Err(ImageError::InvalidData(
                "only base64 data URIs are supported".to_string(),
            ));
        }
        payload
    } else {
        data
    };

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(base64::engine::general_purpose::STANDARD.decode(compact)?)
}

#[cfg(feature = "network")]
async fn fetch_url(url: String) -> Result<ImageData> {
    tracing::debug!(%url, "fetching image");
    let response = reqwest::get(&url)
        .await
        .map_err(|e| ImageError::Http(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ImageError::Http(format!("{url} returned {status}")));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ImageError::Http(format!("{url}: {e}")))?;

    tokio::task::spawn_blocking(move || ImageData::decode(&bytes, None))
        .await
        .map_err(|e| ImageError::Task(e.to_string()))?
}

#[cfg(not(feature = "network"))]
async fn fetch_url(url: String) -> Result<ImageData> {
    Err(ImageError::NetworkDisabled(url))
}

/// Async image loader backed by a shared decoded-image cache.
///
/// Clones share the cache, so a loader can be handed to spawned tasks.
#[derive(Clone)]
pub struct ImageLoader {
    cache: Arc<Mutex<ImageCache>>,
}

impl ImageLoader {
    pub fn new() -> Self {
        Self::with_cache(ImageCache::default())
    }

    pub fn with_cache(cache: ImageCache) -> Self {
        Self {
            cache: Arc::new(Mutex::new(cache)),
        }
    }

    /// Cached image for `src`, if it was decoded before
    pub fn cached(&self, src: &str) -> Option<Arc<ImageData>> {
        self.cache.lock().ok()?.get(src)
    }

    /// Resolve `src` to a decoded image, consulting the cache first.
    /// Failures are not cached.
    pub async fn load(&self, src: &str) -> Result<Arc<ImageData>> {
        if let Some(hit) = self.cached(src) {
            tracing::debug!(src, "image cache hit");
            return Ok(hit);
        }

        let image = Arc::new(ImageData::load_async(ImageSource::from_uri(src)).await?);

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(src, image.clone());
        }
        tracing::debug!(
            src,
            width = image.width(),
            height = image.height(),
            "image loaded"
        );
        Ok(image)
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

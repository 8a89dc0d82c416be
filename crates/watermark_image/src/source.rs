//! Image source types

use std::path::{Path, PathBuf};

/// Source of an image
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Load from a file path
    File(PathBuf),

    /// Load from a URL (requires "network" feature)
    Url(String),

    /// Load from base64-encoded data
    /// Can optionally include data URI prefix (e.g., "data:image/png;base64,...")
    Base64(String),

    /// Load from raw encoded bytes with format hint
    Bytes {
        data: Vec<u8>,
        format: Option<ImageFormat>,
    },

    /// Pre-decoded RGBA image data (already in memory)
    Rgba {
        /// RGBA pixel data (4 bytes per pixel)
        data: Vec<u8>,
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
}

impl ImageSource {
    /// Create a file source
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Create a URL source
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Create a base64 source
    pub fn base64(data: impl Into<String>) -> Self {
        Self::Base64(data.into())
    }

    /// Create a bytes source
    pub fn bytes(data: Vec<u8>) -> Self {
        Self::Bytes { data, format: None }
    }

    /// Create a bytes source with format hint
    pub fn bytes_with_format(data: Vec<u8>, format: ImageFormat) -> Self {
        Self::Bytes {
            data,
            format: Some(format),
        }
    }

    /// Create an RGBA source from pre-decoded pixel data
    pub fn rgba(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self::Rgba {
            data,
            width,
            height,
        }
    }

    /// Parse a resource URI string into an ImageSource
    ///
    /// Supported formats:
    /// - `data:image/png;base64,...` - Data URI with base64
    /// - `http://...` or `https://...` - URL
    /// - `file:///path/to/image.png` - File path
    /// - `/path/to/image.png` - Treated as file path
    pub fn from_uri(uri: &str) -> Self {
        let trimmed = uri.trim();
        if trimmed.starts_with("data:") {
            Self::Base64(trimmed.to_string())
        } else if is_http_url(trimmed) {
            Self::Url(trimmed.to_string())
        } else if let Some(path) = trimmed.strip_prefix("file://") {
            Self::File(PathBuf::from(path))
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    /// Whether loading this source has to go through the network
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Url(_))
    }

    /// Format hint derived from the source itself, if any
    pub fn format_hint(&self) -> Option<ImageFormat> {
        match self {
            Self::File(path) => path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(ImageFormat::from_extension),
            Self::Base64(data) => data
                .strip_prefix("data:")
                .and_then(|rest| rest.split([';', ',']).next())
                .and_then(ImageFormat::from_mime),
            Self::Bytes { format, .. } => *format,
            Self::Url(_) | Self::Rgba { .. } => None,
        }
    }
}

fn is_http_url(uri: &str) -> bool {
    let lower = uri.get(..8).unwrap_or(uri).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl From<&str> for ImageSource {
    fn from(s: &str) -> Self {
        Self::from_uri(s)
    }
}

impl From<String> for ImageSource {
    fn from(s: String) -> Self {
        Self::from_uri(&s)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

/// Image format hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
    Bmp,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::WebP),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Detect format from MIME type
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::WebP),
            "image/bmp" => Some(Self::Bmp),
            _ => None,
        }
    }
}

impl From<ImageFormat> for image::ImageFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::WebP => image::ImageFormat::WebP,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_uri_classification() {
        assert!(matches!(
            ImageSource::from_uri("https://picsum.photos/400/300"),
            ImageSource::Url(_)
        ));
        assert!(matches!(
            ImageSource::from_uri("HTTP://EXAMPLE.COM/a.png"),
            ImageSource::Url(_)
        ));
        assert!(matches!(
            ImageSource::from_uri("data:image/png;base64,AAAA"),
            ImageSource::Base64(_)
        ));
        assert_eq!(
            ImageSource::from_uri("file:///tmp/photo.jpg"),
            ImageSource::File(PathBuf::from("/tmp/photo.jpg"))
        );
        assert_eq!(
            ImageSource::from_uri("assets/photo.png"),
            ImageSource::File(PathBuf::from("assets/photo.png"))
        );
    }

    #[test]
    fn test_format_hints() {
        assert_eq!(
            ImageSource::file("a/b.JPEG").format_hint(),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageSource::from_uri("data:image/webp;base64,AAAA").format_hint(),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageSource::url("https://x/y.png").format_hint(), None);
    }
}

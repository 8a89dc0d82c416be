//! Decoded image cache

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use crate::loader::ImageData;

/// LRU cache of decoded images keyed by their source string
pub struct ImageCache {
    entries: LruCache<String, Arc<ImageData>>,
}

impl ImageCache {
    /// Default number of decoded images kept alive
    pub const DEFAULT_CAPACITY: usize = 32;

    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Look up a decoded image, marking it most recently used
    pub fn get(&mut self, key: &str) -> Option<Arc<ImageData>> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, image: Arc<ImageData>) {
        self.entries.put(key.into(), image);
    }

    pub fn remove(&mut self, key: &str) -> Option<Arc<ImageData>> {
        self.entries.pop(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn image(width: u32) -> Arc<ImageData> {
        Arc::new(ImageData::from_rgba(RgbaImage::new(width, 1)))
    }

    #[test]
    fn test_least_recently_used_entry_is_evicted() {
        let mut cache = ImageCache::new(2);
        cache.insert("a", image(1));
        cache.insert("b", image(2));

        // Touch "a" so "b" becomes the eviction candidate
        assert!(cache.get("a").is_some());
        cache.insert("c", image(3));

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_capacity_still_holds_one_entry() {
        let mut cache = ImageCache::new(0);
        cache.insert("a", image(1));
        assert_eq!(cache.get("a").map(|img| img.width()), Some(1));
    }
}

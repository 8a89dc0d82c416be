//! Font registry for system font discovery and caching
//!
//! Uses fontdb to discover and load fonts by CSS family name or generic
//! category.

use std::sync::Arc;

use fontdb::{Database, Family, Query, Stretch, Style, Weight, ID};
use rustc_hash::FxHashMap;

use crate::font::FontFace;
use crate::{Result, TextError};

/// Generic font category for fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GenericFont {
    /// Default system UI font
    System,
    /// Monospace font for code
    Monospace,
    /// Serif font
    Serif,
    /// Sans-serif font
    #[default]
    SansSerif,
    Cursive,
    Fantasy,
}

impl GenericFont {
    /// Map a CSS generic family keyword
    pub fn from_css(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "serif" => Some(Self::Serif),
            "sans-serif" => Some(Self::SansSerif),
            "monospace" => Some(Self::Monospace),
            "cursive" => Some(Self::Cursive),
            "fantasy" => Some(Self::Fantasy),
            "system-ui" | "-apple-system" | "ui-sans-serif" => Some(Self::System),
            _ => None,
        }
    }

    fn family(self) -> Family<'static> {
        match self {
            // fontdb has no dedicated system-ui family
            Self::System | Self::SansSerif => Family::SansSerif,
            Self::Serif => Family::Serif,
            Self::Monospace => Family::Monospace,
            Self::Cursive => Family::Cursive,
            Self::Fantasy => Family::Fantasy,
        }
    }
}

/// Split a CSS `font-family` value into family names, stripping quotes
pub fn parse_family_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|part| part.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Font registry that discovers and caches fonts
pub struct FontRegistry {
    /// fontdb database containing all known fonts
    db: Database,
    /// Cached FontFace instances keyed by lowercase family (None = not found)
    faces: FxHashMap<String, Option<Arc<FontFace>>>,
}

impl FontRegistry {
    /// Create a registry and load system fonts
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self::from_database(db)
    }

    /// Create a registry with no fonts at all
    pub fn empty() -> Self {
        Self::from_database(Database::new())
    }

    fn from_database(db: Database) -> Self {
        Self {
            db,
            faces: FxHashMap::default(),
        }
    }

    /// Number of font faces known to the registry
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Register a font file from memory (e.g. a bundled TTF)
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
        // Earlier misses may now resolve
        self.faces.retain(|_, face| face.is_some());
    }

    /// Check whether a family name resolves without loading it
    pub fn has_font(&self, name: &str) -> bool {
        self.query(Family::Name(name)).is_some()
    }

    /// Load a font by family name or CSS generic keyword
    pub fn load_font(&mut self, name: &str) -> Result<Arc<FontFace>> {
        let key = name.to_ascii_lowercase();
        if let Some(cached) = self.faces.get(&key) {
            return cached
                .clone()
                .ok_or_else(|| TextError::FontLoadError(format!("Font '{name}' not found (cached)")));
        }

        let family = match GenericFont::from_css(name) {
            Some(generic) => generic.family(),
            None => Family::Name(name),
        };

        let face = self.query(family).and_then(|id| self.face_from_id(id));
        self.faces.insert(key, face.clone());
        face.ok_or_else(|| TextError::FontLoadError(format!("Font '{name}' not found")))
    }

    /// Load a generic category
    pub fn load_generic(&mut self, generic: GenericFont) -> Result<Arc<FontFace>> {
        let name = match generic {
            GenericFont::System => "system-ui",
            GenericFont::Monospace => "monospace",
            GenericFont::Serif => "serif",
            GenericFont::SansSerif => "sans-serif",
            GenericFont::Cursive => "cursive",
            GenericFont::Fantasy => "fantasy",
        };
        self.load_font(name)
    }

    /// Resolve the first available family of a CSS family list.
    ///
    /// Falls back to sans-serif, then to any loaded face. Returns `None` only
    /// when the registry has no usable fonts.
    pub fn resolve(&mut self, families: &[String]) -> Option<Arc<FontFace>> {
        for name in families {
            if let Ok(face) = self.load_font(name) {
                return Some(face);
            }
            tracing::trace!(family = %name, "font family unavailable, trying next");
        }

        if let Ok(face) = self.load_generic(GenericFont::SansSerif) {
            return Some(face);
        }

        let any = self.db.faces().map(|info| info.id).next()?;
        let face = self.face_from_id(any);
        if face.is_none() {
            tracing::warn!("no usable font faces available");
        }
        face
    }

    /// Resolve a CSS `font-family` value
    pub fn resolve_css(&mut self, family_list: &str) -> Option<Arc<FontFace>> {
        self.resolve(&parse_family_list(family_list))
    }

    fn query(&self, family: Family<'_>) -> Option<ID> {
        let families = [family];
        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        self.db.query(&query)
    }

    fn face_from_id(&self, id: ID) -> Option<Arc<FontFace>> {
        let family = self
            .db
            .face(id)
            .and_then(|info| info.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_default();

        let (data, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))?;

        match FontFace::new(Arc::new(data), index, family) {
            Ok(face) => Some(Arc::new(face)),
            Err(e) => {
                tracing::warn!("Failed to parse font face {:?}: {:?}", id, e);
                None
            }
        }
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_family_list() {
        assert_eq!(
            parse_family_list("Arial Black, \"Open Sans\", 'Noto Serif' ,sans-serif"),
            vec!["Arial Black", "Open Sans", "Noto Serif", "sans-serif"]
        );
        assert!(parse_family_list(" , ").is_empty());
    }

    #[test]
    fn test_generic_keywords() {
        assert_eq!(GenericFont::from_css("Sans-Serif"), Some(GenericFont::SansSerif));
        assert_eq!(GenericFont::from_css("monospace"), Some(GenericFont::Monospace));
        assert_eq!(GenericFont::from_css("Impact"), None);
    }

    #[test]
    fn test_empty_registry_resolves_nothing() {
        let mut registry = FontRegistry::empty();
        assert_eq!(registry.face_count(), 0);
        assert!(registry.resolve_css("Arial, sans-serif").is_none());
        assert!(registry.load_font("Arial").is_err());
    }

    #[test]
    fn test_misses_are_cached() {
        let mut registry = FontRegistry::empty();
        assert!(registry.load_font("Nope").is_err());
        let err = registry.load_font("nope").unwrap_err();
        assert!(err.to_string().contains("cached"));
    }

    #[test]
    fn test_system_fonts_resolve_with_fallback() {
        let mut registry = FontRegistry::new();
        if registry.face_count() == 0 {
            // Nothing to resolve on machines without fonts
            return;
        }
        let face = registry
            .resolve_css("Some Family That Does Not Exist, sans-serif")
            .expect("fallback face");
        assert!(face.line_metrics(24.0).unwrap().ascent > 0.0);
    }
}

//! Sprite resolution boundary
//!
//! The render graph never looks sprites up itself: callers hand it a
//! [`SpriteResolver`] that turns a [`SpriteDescriptor`] into a
//! [`SpriteHandle`]. A handle whose `manifest` is `None` means the sprite was
//! not found in the asset catalogue and the resolver fell back to whatever
//! the descriptor carried.
//!
//! [`SpriteCatalog`] is an in-memory resolver over already-decoded manifest
//! entries. Reading the manifest from disk is the asset layer's job.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::frame::SpriteDescriptor;

/// Manifest entry for a known sprite
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ManifestSprite {
    /// Manifest identifier
    pub id: String,
    /// Texture path relative to the asset root
    pub texture: String,
    /// Pixel size, if the manifest pins it
    #[serde(default)]
    pub size: Option<(u32, u32)>,
    /// Pivot, if the manifest pins it
    #[serde(default)]
    pub pivot: Option<(f32, f32)>,
    /// Tint, if the manifest pins it
    #[serde(default)]
    pub tint: Option<[u8; 3]>,
    /// Material hint used when an instruction names no material
    #[serde(default)]
    pub lighting: String,
}

impl ManifestSprite {
    /// Create a manifest entry
    pub fn new(id: impl Into<String>, texture: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            texture: texture.into(),
            ..Self::default()
        }
    }

    /// Set the material hint
    #[must_use]
    pub fn with_lighting(mut self, lighting: impl Into<String>) -> Self {
        self.lighting = lighting.into();
        self
    }

    /// Set the tint
    #[must_use]
    pub const fn with_tint(mut self, tint: [u8; 3]) -> Self {
        self.tint = Some(tint);
        self
    }

    /// The material hint, or `None` when empty
    pub fn material_hint(&self) -> Option<&str> {
        (!self.lighting.is_empty()).then_some(self.lighting.as_str())
    }
}

/// Resolved sprite reference
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteHandle {
    /// Resolved identifier (descriptor id, or texture when the id is empty)
    pub id: String,
    /// Texture path
    pub texture_path: String,
    /// Pixel size
    pub size: (u32, u32),
    /// Pivot
    pub pivot: (f32, f32),
    /// Optional 8-bit tint
    pub tint: Option<[u8; 3]>,
    /// Matching manifest entry, `None` when the sprite is unknown
    pub manifest: Option<ManifestSprite>,
}

impl SpriteHandle {
    /// Build the fallback handle for a sprite with no manifest entry
    pub fn fallback(descriptor: &SpriteDescriptor) -> Self {
        Self {
            id: descriptor_key(descriptor).to_string(),
            texture_path: descriptor.texture.clone(),
            size: descriptor.size,
            pivot: descriptor.pivot,
            tint: descriptor.tint,
            manifest: None,
        }
    }

    /// Build a handle backed by a manifest entry
    ///
    /// Manifest values win over the descriptor's.
    pub fn from_manifest(descriptor: &SpriteDescriptor, manifest: ManifestSprite) -> Self {
        Self {
            id: descriptor_key(descriptor).to_string(),
            texture_path: manifest.texture.clone(),
            size: manifest.size.unwrap_or(descriptor.size),
            pivot: manifest.pivot.unwrap_or(descriptor.pivot),
            tint: manifest.tint.or(descriptor.tint),
            manifest: Some(manifest),
        }
    }

    /// Whether the sprite matched a manifest entry
    pub const fn is_known(&self) -> bool {
        self.manifest.is_some()
    }
}

fn descriptor_key(descriptor: &SpriteDescriptor) -> &str {
    if descriptor.id.is_empty() {
        &descriptor.texture
    } else {
        &descriptor.id
    }
}

/// Turns sprite references into resolved handles
///
/// Implementations must always return a handle; unknown sprites get a
/// fallback handle with `manifest == None`.
pub trait SpriteResolver {
    /// Resolve a sprite reference
    fn resolve(&mut self, descriptor: &SpriteDescriptor) -> SpriteHandle;
}

impl<F> SpriteResolver for F
where
    F: FnMut(&SpriteDescriptor) -> SpriteHandle,
{
    fn resolve(&mut self, descriptor: &SpriteDescriptor) -> SpriteHandle {
        self(descriptor)
    }
}

/// In-memory sprite catalogue with handle caching and miss accounting
#[derive(Debug, Default)]
pub struct SpriteCatalog {
    entries: HashMap<String, ManifestSprite>,
    handles: HashMap<String, SpriteHandle>,
    missing: HashMap<String, usize>,
}

impl SpriteCatalog {
    /// Create a catalogue from manifest entries
    pub fn new(entries: impl IntoIterator<Item = ManifestSprite>) -> Self {
        Self {
            entries: entries.into_iter().map(|entry| (entry.id.clone(), entry)).collect(),
            handles: HashMap::new(),
            missing: HashMap::new(),
        }
    }

    /// Look up a manifest entry
    pub fn entry(&self, id: &str) -> Option<&ManifestSprite> {
        self.entries.get(id)
    }

    /// Number of manifest entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalogue is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How often each unknown sprite id was resolved to a fallback handle
    ///
    /// Handles are cached, so each id counts at most once.
    pub const fn missing_counts(&self) -> &HashMap<String, usize> {
        &self.missing
    }

    fn build_handle(&mut self, descriptor: &SpriteDescriptor) -> SpriteHandle {
        if let Some(entry) = self.entries.get(&descriptor.id) {
            return SpriteHandle::from_manifest(descriptor, entry.clone());
        }
        if !descriptor.id.is_empty() {
            *self.missing.entry(descriptor.id.clone()).or_insert(0) += 1;
            log::warn!(
                "Sprite {} not present in manifest; using descriptor fallback",
                descriptor.id
            );
        }
        SpriteHandle::fallback(descriptor)
    }
}

impl SpriteResolver for SpriteCatalog {
    fn resolve(&mut self, descriptor: &SpriteDescriptor) -> SpriteHandle {
        let key = descriptor_key(descriptor).to_string();
        if let Some(handle) = self.handles.get(&key) {
            return handle.clone();
        }
        let handle = self.build_handle(descriptor);
        self.handles.insert(key, handle.clone());
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SpriteCatalog {
        SpriteCatalog::new([
            ManifestSprite::new("hero", "sprites/hero.png")
                .with_lighting("default_lit")
                .with_tint([255, 128, 0]),
        ])
    }

    #[test]
    fn test_known_sprite_uses_manifest_values() {
        let mut catalog = catalog();
        let descriptor = SpriteDescriptor::new("hero", "other.png").with_tint([1, 2, 3]);

        let handle = catalog.resolve(&descriptor);

        assert!(handle.is_known());
        assert_eq!(handle.texture_path, "sprites/hero.png");
        assert_eq!(handle.tint, Some([255, 128, 0]));
        assert_eq!(handle.manifest.as_ref().and_then(ManifestSprite::material_hint), Some("default_lit"));
        assert!(catalog.missing_counts().is_empty());
    }

    #[test]
    fn test_unknown_sprite_falls_back_and_is_counted_once() {
        let mut catalog = catalog();
        let descriptor = SpriteDescriptor::new("ghost", "ghost.png").with_tint([10, 20, 30]);

        let first = catalog.resolve(&descriptor);
        let second = catalog.resolve(&descriptor);

        assert!(!first.is_known());
        assert_eq!(first, second);
        assert_eq!(first.texture_path, "ghost.png");
        assert_eq!(first.tint, Some([10, 20, 30]));
        assert_eq!(catalog.missing_counts().get("ghost"), Some(&1));
    }

    #[test]
    fn test_anonymous_sprite_is_keyed_by_texture() {
        let mut catalog = catalog();
        let handle = catalog.resolve(&SpriteDescriptor::new("", "loose.png"));

        assert_eq!(handle.id, "loose.png");
        assert!(!handle.is_known());
        assert!(catalog.missing_counts().is_empty());
    }

    #[test]
    fn test_closures_are_resolvers() {
        let mut resolver = |descriptor: &SpriteDescriptor| SpriteHandle::fallback(descriptor);
        let handle = SpriteResolver::resolve(&mut resolver, &SpriteDescriptor::new("a", "a.png"));

        assert_eq!(handle.id, "a");
    }
}

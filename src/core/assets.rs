//=========================================================================
// Asset & Audio Contracts
//=========================================================================
//
// Keyed lookups over loaded assets. Loading and decoding (file I/O, image
// formats, audio formats) belong to the backend implementing these traits;
// the core only ever asks "what are the dimensions of sprite X" and
// "play sound Y".
//
// Missing keys return `None` or are ignored, never an error. A game that
// references an unloaded sprite simply draws nothing there.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};

use log::warn;

//=== SpriteInfo ==========================================================

/// Metadata for one loaded sprite.
///
/// `origin_x`/`origin_y` is the pixel within the sprite that draw calls
/// position at (x, y). Defaults to the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteInfo {
    pub width: f32,
    pub height: f32,
    pub origin_x: f32,
    pub origin_y: f32,
}

impl SpriteInfo {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height, origin_x: 0.0, origin_y: 0.0 }
    }

    pub fn with_origin(mut self, x: f32, y: f32) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    /// Centers the origin on the sprite.
    pub fn centered(self) -> Self {
        let (ox, oy) = (self.width / 2.0, self.height / 2.0);
        self.with_origin(ox, oy)
    }
}

//=== AssetStore Trait ====================================================

/// Read-only view over loaded assets.
pub trait AssetStore {
    /// Looks up a sprite by name. `None` if not loaded.
    fn sprite(&self, name: &str) -> Option<&SpriteInfo>;

    /// Whether a sound with this name is loaded.
    fn has_sound(&self, name: &str) -> bool;

    /// Whether a font with this name is loaded.
    fn has_font(&self, name: &str) -> bool;
}

//=== AssetCatalog ========================================================

/// In-memory asset registry.
///
/// The default store. Backends that actually decode files can populate one
/// of these at load time, or implement [`AssetStore`] themselves.
#[derive(Debug, Default)]
pub struct AssetCatalog {
    sprites: HashMap<String, SpriteInfo>,
    sounds: HashSet<String>,
    fonts: HashSet<String>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a sprite, replacing any previous entry with the same name.
    pub fn insert_sprite(&mut self, name: impl Into<String>, info: SpriteInfo) {
        let name = name.into();
        if self.sprites.insert(name.clone(), info).is_some() {
            warn!("Sprite '{name}' was already registered and has been replaced");
        }
    }

    pub fn insert_sound(&mut self, name: impl Into<String>) {
        self.sounds.insert(name.into());
    }

    pub fn insert_font(&mut self, name: impl Into<String>) {
        self.fonts.insert(name.into());
    }
}

impl AssetStore for AssetCatalog {
    fn sprite(&self, name: &str) -> Option<&SpriteInfo> {
        self.sprites.get(name)
    }

    fn has_sound(&self, name: &str) -> bool {
        self.sounds.contains(name)
    }

    fn has_font(&self, name: &str) -> bool {
        self.fonts.contains(name)
    }
}

//=== Audio ===============================================================

/// Sound playback backend.
///
/// Unknown sound names are ignored; gameplay never fails on a missing
/// asset.
pub trait Audio {
    /// Plays a sound at the given volume (0.0 – 1.0).
    fn play_sound(&mut self, name: &str, volume: f32);

    /// Stops all playing instances of a sound.
    fn stop_sound(&mut self, name: &str);
}

/// Audio backend that plays nothing. Headless default.
#[derive(Debug, Default)]
pub struct NullAudio;

impl Audio for NullAudio {
    fn play_sound(&mut self, _name: &str, _volume: f32) {}
    fn stop_sound(&mut self, _name: &str) {}
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup_hits_and_misses() {
        let mut catalog = AssetCatalog::new();
        catalog.insert_sprite("hero", SpriteInfo::new(32.0, 48.0));

        let hero = catalog.sprite("hero").expect("registered sprite");
        assert_eq!(hero.width, 32.0);
        assert_eq!(hero.height, 48.0);
        assert!(catalog.sprite("ghost").is_none());
    }

    #[test]
    fn catalog_tracks_sounds_and_fonts() {
        let mut catalog = AssetCatalog::new();
        catalog.insert_sound("explosion");
        catalog.insert_font("mono");

        assert!(catalog.has_sound("explosion"));
        assert!(!catalog.has_sound("laser"));
        assert!(catalog.has_font("mono"));
        assert!(!catalog.has_font("serif"));
    }

    #[test]
    fn sprite_origin_defaults_to_top_left() {
        let info = SpriteInfo::new(16.0, 16.0);
        assert_eq!((info.origin_x, info.origin_y), (0.0, 0.0));
    }

    #[test]
    fn centered_origin_is_half_size() {
        let info = SpriteInfo::new(16.0, 24.0).centered();
        assert_eq!((info.origin_x, info.origin_y), (8.0, 12.0));
    }

    #[test]
    fn reinserting_a_sprite_replaces_it() {
        let mut catalog = AssetCatalog::new();
        catalog.insert_sprite("hero", SpriteInfo::new(32.0, 32.0));
        catalog.insert_sprite("hero", SpriteInfo::new(64.0, 64.0));
        assert_eq!(catalog.sprite("hero").unwrap().width, 64.0);
    }
}

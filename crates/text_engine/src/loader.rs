//! Font loading service
//!
//! A [`FontLoader`] turns a (family, weight) request into font bytes. The
//! system loader asks font-kit for the best installed match; the memory
//! loader serves faces registered up front (bundled fonts, tests).

use crate::{FontKey, LoadedFace, Result, TextError};
use font_kit::family_name::FamilyName;
use font_kit::handle::Handle;
use font_kit::properties::{Properties, Style, Weight};
use font_kit::source::SystemSource;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Source of font faces
pub trait FontLoader: Send + Sync {
    fn load(&self, family: &str, weight: u16) -> Result<LoadedFace>;
}

/// Map a CSS family name onto font-kit's family selector
fn family_name(family: &str) -> FamilyName {
    match family.trim().to_lowercase().as_str() {
        "sans-serif" => FamilyName::SansSerif,
        "serif" => FamilyName::Serif,
        "monospace" => FamilyName::Monospace,
        "cursive" => FamilyName::Cursive,
        "fantasy" => FamilyName::Fantasy,
        _ => FamilyName::Title(family.trim().to_string()),
    }
}

/// Loads installed fonts through font-kit
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFontLoader;

impl SystemFontLoader {
    pub fn new() -> Self {
        Self
    }
}

impl FontLoader for SystemFontLoader {
    fn load(&self, family: &str, weight: u16) -> Result<LoadedFace> {
        let properties = Properties {
            weight: Weight(weight as f32),
            style: Style::Normal,
            ..Default::default()
        };

        let handle = SystemSource::new()
            .select_best_match(&[family_name(family)], &properties)
            .map_err(|_| TextError::FontNotFound(family.to_string()))?;

        let font = handle
            .load()
            .map_err(|e| TextError::InvalidFontData(format!("Failed to load font: {}", e)))?;

        let (data, index) = match handle {
            Handle::Path { path, font_index } => (Arc::new(std::fs::read(path)?), font_index),
            Handle::Memory { bytes, font_index } => (bytes, font_index),
        };

        let actual_weight = font.properties().weight.0.round() as u16;
        Ok(LoadedFace::new(font.family_name(), actual_weight, data, index))
    }
}

/// Serves faces registered in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryFontLoader {
    faces: HashMap<String, Vec<LoadedFace>>,
}

impl MemoryFontLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font bytes under `family` at `weight`.
    ///
    /// The bytes must parse as a font face.
    pub fn add(&mut self, family: &str, weight: u16, data: Vec<u8>) -> Result<()> {
        if rustybuzz::Face::from_slice(&data, 0).is_none() {
            return Err(TextError::InvalidFontData(format!(
                "{} {} is not a usable font",
                family, weight
            )));
        }
        let face = LoadedFace::new(family.trim(), weight, Arc::new(data), 0);
        self.faces
            .entry(FontKey::new(family, weight).family)
            .or_default()
            .push(face);
        Ok(())
    }

    /// Register a font file from disk
    pub fn add_file(&mut self, family: &str, weight: u16, path: &Path) -> Result<()> {
        let data = std::fs::read(path)?;
        self.add(family, weight, data)
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

impl FontLoader for MemoryFontLoader {
    fn load(&self, family: &str, weight: u16) -> Result<LoadedFace> {
        let variants = self
            .faces
            .get(&FontKey::new(family, weight).family)
            .ok_or_else(|| TextError::FontNotFound(family.to_string()))?;

        variants
            .iter()
            .min_by_key(|face| face.weight.abs_diff(weight))
            .cloned()
            .ok_or_else(|| TextError::FontNotFound(family.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_family_names() {
        assert!(matches!(family_name("sans-serif"), FamilyName::SansSerif));
        assert!(matches!(family_name(" Serif "), FamilyName::Serif));
        assert!(matches!(family_name("Open Sans"), FamilyName::Title(ref t) if t == "Open Sans"));
    }

    #[test]
    fn test_memory_loader_rejects_garbage() {
        let mut loader = MemoryFontLoader::new();
        let err = loader.add("Broken", 400, vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, TextError::InvalidFontData(_)));
        assert!(loader.is_empty());
    }

    #[test]
    fn test_memory_loader_unknown_family() {
        let loader = MemoryFontLoader::new();
        assert!(matches!(
            loader.load("Nope", 400),
            Err(TextError::FontNotFound(ref f)) if f == "Nope"
        ));
    }
}

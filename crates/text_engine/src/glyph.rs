//! Glyph rasterization with fontdue
//!
//! Produces coverage masks for shaped runs. Glyph ids come from the shaper,
//! so the same face bytes must back both steps.

use crate::{FontKey, LoadedFace, Result, ShapedRun, TextError};
use std::collections::HashMap;

/// A coverage mask positioned relative to the run origin on the baseline
#[derive(Debug, Clone)]
pub struct RasterGlyph {
    /// Left edge of the mask
    pub x: i32,
    /// Top edge of the mask (negative is above the baseline)
    pub y: i32,
    pub width: usize,
    pub height: usize,
    /// One coverage byte per pixel, row-major
    pub coverage: Vec<u8>,
}

/// Rasterizes glyphs, caching one parsed fontdue font per face
#[derive(Default)]
pub struct GlyphRasterizer {
    fonts: HashMap<FontKey, fontdue::Font>,
}

impl GlyphRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn font_for(&mut self, face: &LoadedFace) -> Result<&fontdue::Font> {
        let key = FontKey::new(&face.family, face.weight);
        if !self.fonts.contains_key(&key) {
            let settings = fontdue::FontSettings {
                collection_index: face.index,
                ..fontdue::FontSettings::default()
            };
            let font = fontdue::Font::from_bytes(face.data.as_slice(), settings)
                .map_err(|e| TextError::InvalidFontData(e.to_string()))?;
            self.fonts.insert(key.clone(), font);
        }
        self.fonts
            .get(&key)
            .ok_or_else(|| TextError::RasterizerMiss(key.to_string()))
    }

    /// Rasterize every visible glyph of a run shaped with `face`
    pub fn rasterize(&mut self, run: &ShapedRun, face: &LoadedFace) -> Result<Vec<RasterGlyph>> {
        let font = self.font_for(face)?;
        let mut out = Vec::with_capacity(run.glyphs.len());
        for (glyph, pen_x, pen_y) in run.positions() {
            let (metrics, coverage) = font.rasterize_indexed(glyph.glyph_id, run.font_size);
            if metrics.width == 0 || metrics.height == 0 {
                continue;
            }
            out.push(RasterGlyph {
                x: (pen_x + metrics.xmin as f32).round() as i32,
                y: (pen_y - (metrics.ymin + metrics.height as i32) as f32).round() as i32,
                width: metrics.width,
                height: metrics.height,
                coverage,
            });
        }
        Ok(out)
    }
}

impl std::fmt::Debug for GlyphRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphRasterizer")
            .field("fonts", &self.fonts.len())
            .finish()
    }
}

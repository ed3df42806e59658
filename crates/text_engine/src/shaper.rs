//! Text shaping using rustybuzz
//!
//! Shaping converts a string into positioned glyphs for one face. When no
//! face is available the shaper falls back to per-character width
//! estimates so layout can still proceed.

use crate::{FontMetrics, LoadedFace};

/// A shaped glyph with position information
#[derive(Debug, Clone)]
pub struct ShapedGlyph {
    /// Glyph ID in the font (codepoint for estimated runs)
    pub glyph_id: u16,
    /// Horizontal advance in font units
    pub x_advance: i32,
    /// Horizontal offset from the origin
    pub x_offset: i32,
    /// Vertical offset from the origin
    pub y_offset: i32,
    /// Byte offset of the source cluster
    pub cluster: u32,
}

/// A run of shaped glyphs with associated metrics
#[derive(Debug, Clone)]
pub struct ShapedRun {
    pub glyphs: Vec<ShapedGlyph>,
    /// Total advance in pixels
    pub width: f32,
    pub font_size: f32,
    pub units_per_em: u16,
    /// True when the run came from a real face rather than estimates
    pub shaped: bool,
}

impl ShapedRun {
    /// Pixels per font unit
    pub fn scale(&self) -> f32 {
        self.font_size / self.units_per_em.max(1) as f32
    }

    /// Pen positions of each glyph, relative to the run origin
    pub fn positions(&self) -> impl Iterator<Item = (&ShapedGlyph, f32, f32)> + '_ {
        let scale = self.scale();
        let mut pen = 0.0f32;
        self.glyphs.iter().map(move |glyph| {
            let x = pen + glyph.x_offset as f32 * scale;
            let y = -(glyph.y_offset as f32) * scale;
            pen += glyph.x_advance as f32 * scale;
            (glyph, x, y)
        })
    }
}

/// Text shaper using rustybuzz
#[derive(Debug, Clone, Default)]
pub struct TextShaper {
    /// Metrics used for estimated runs
    default_metrics: FontMetrics,
}

impl TextShaper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shape `text` at `font_size` pixels with `face`, or estimate without one
    pub fn shape(&self, text: &str, font_size: f32, face: Option<&LoadedFace>) -> ShapedRun {
        let parsed = face.and_then(|f| rustybuzz::Face::from_slice(&f.data, f.index));
        match parsed {
            Some(face) => self.shape_with_face(text, font_size, &face),
            None => self.shape_fallback(text, font_size),
        }
    }

    fn shape_with_face(&self, text: &str, font_size: f32, face: &rustybuzz::Face<'_>) -> ShapedRun {
        let units_per_em = face.units_per_em() as u16;

        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(text);
        let output = rustybuzz::shape(face, &[], buffer);

        let mut total_advance = 0i32;
        let glyphs = output
            .glyph_infos()
            .iter()
            .zip(output.glyph_positions())
            .map(|(info, pos)| {
                total_advance += pos.x_advance;
                ShapedGlyph {
                    glyph_id: info.glyph_id as u16,
                    x_advance: pos.x_advance,
                    x_offset: pos.x_offset,
                    y_offset: pos.y_offset,
                    cluster: info.cluster,
                }
            })
            .collect();

        ShapedRun {
            glyphs,
            width: total_advance as f32 * font_size / units_per_em.max(1) as f32,
            font_size,
            units_per_em,
            shaped: true,
        }
    }

    fn shape_fallback(&self, text: &str, font_size: f32) -> ShapedRun {
        let units_per_em = self.default_metrics.units_per_em;

        let mut glyphs = Vec::new();
        let mut total_advance = 0i32;
        let mut byte_offset = 0u32;

        for ch in text.chars() {
            let advance = estimate_char_width(ch, units_per_em);
            glyphs.push(ShapedGlyph {
                glyph_id: ch as u16,
                x_advance: advance,
                x_offset: 0,
                y_offset: 0,
                cluster: byte_offset,
            });
            total_advance += advance;
            byte_offset += ch.len_utf8() as u32;
        }

        ShapedRun {
            glyphs,
            width: total_advance as f32 * font_size / units_per_em as f32,
            font_size,
            units_per_em,
            shaped: false,
        }
    }
}

/// Estimate character width from its typical proportions
fn estimate_char_width(ch: char, units_per_em: u16) -> i32 {
    let em = units_per_em as i32;

    match ch {
        ' ' | 'i' | 'l' | 'j' | 't' | 'f' | 'r' | '!' | '|' | '\'' | '.' | ',' | ':' | ';' => {
            em * 30 / 100
        }
        'I' | '1' => em * 35 / 100,
        'm' | 'w' | 'M' | 'W' | '@' | '%' => em * 90 / 100,
        'A'..='Z' => em * 70 / 100,
        'a'..='z' => em * 55 / 100,
        '0'..='9' => em * 60 / 100,
        // CJK is full-width
        '\u{4E00}'..='\u{9FFF}' | '\u{3000}'..='\u{303F}' => em,
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' | '\u{00AD}' => 0,
        '\u{00A0}' => em * 30 / 100,
        _ => em * 60 / 100,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_fallback_widths() {
        let shaper = TextShaper::new();
        let run = shaper.shape("Hello", 10.0, None);
        assert!(!run.shaped);
        assert_eq!(run.glyphs.len(), 5);
        // H 0.7 + e 0.55 + l 0.3 + l 0.3 + o 0.55
        assert!((run.width - 24.0).abs() < 1e-4);
    }

    #[test]
    fn test_unparseable_face_falls_back() {
        let face = LoadedFace::new("Broken", 400, Arc::new(vec![0; 16]), 0);
        let run = TextShaper::new().shape("abc", 12.0, Some(&face));
        assert!(!run.shaped);
    }

    #[test]
    fn test_positions_accumulate_advances() {
        let run = TextShaper::new().shape("ab", 100.0, None);
        let xs: Vec<f32> = run.positions().map(|(_, x, _)| x).collect();
        assert_eq!(xs, vec![0.0, 55.0]);
    }

    proptest! {
        #[test]
        fn prop_width_scales_with_size(text in "[a-zA-Z ]{1,30}", size in 1.0f32..100.0) {
            let shaper = TextShaper::new();
            let small = shaper.shape(&text, size, None).width;
            let large = shaper.shape(&text, size * 2.0, None).width;
            prop_assert!((large - small * 2.0).abs() < 1e-2);
        }
    }
}

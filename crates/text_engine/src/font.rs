//! Font requests and loaded faces

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A font request at a concrete pixel size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    /// Numeric CSS weight (100..=900)
    pub weight: u16,
    /// Em size in destination pixels
    pub size: f32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, weight: u16, size: f32) -> Self {
        Self {
            family: family.into(),
            weight,
            size,
        }
    }

    pub fn key(&self) -> FontKey {
        FontKey::new(&self.family, self.weight)
    }
}

/// Cache key for a face: case-folded family plus weight
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FontKey {
    pub family: String,
    pub weight: u16,
}

impl FontKey {
    pub fn new(family: &str, weight: u16) -> Self {
        Self {
            family: family.trim().to_lowercase(),
            weight,
        }
    }
}

impl fmt::Display for FontKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.weight)
    }
}

/// Font file bytes ready for shaping and rasterization
#[derive(Clone)]
pub struct LoadedFace {
    /// Family name reported by the font itself
    pub family: String,
    pub weight: u16,
    pub data: Arc<Vec<u8>>,
    /// Face index inside a collection file
    pub index: u32,
}

impl LoadedFace {
    pub fn new(family: impl Into<String>, weight: u16, data: Arc<Vec<u8>>, index: u32) -> Self {
        Self {
            family: family.into(),
            weight,
            data,
            index,
        }
    }

    pub fn metrics(&self) -> Option<FontMetrics> {
        let face = rustybuzz::Face::from_slice(&self.data, self.index)?;
        Some(FontMetrics {
            units_per_em: face.units_per_em() as u16,
            ascender: face.ascender(),
            descender: face.descender(),
            line_gap: face.line_gap(),
        })
    }
}

impl fmt::Debug for LoadedFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedFace")
            .field("family", &self.family)
            .field("weight", &self.weight)
            .field("bytes", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

/// Vertical font metrics in font units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub units_per_em: u16,
    /// Ascender (positive)
    pub ascender: i16,
    /// Descender (negative)
    pub descender: i16,
    pub line_gap: i16,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            units_per_em: 1000,
            ascender: 800,
            descender: -200,
            line_gap: 0,
        }
    }
}

/// Vertical metrics scaled to a pixel size
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    /// Depth below the baseline (positive)
    pub descent: f32,
    pub line_gap: f32,
}

impl LineMetrics {
    pub fn from_font_metrics(metrics: &FontMetrics, size: f32) -> Self {
        let scale = size / metrics.units_per_em.max(1) as f32;
        Self {
            ascent: metrics.ascender as f32 * scale,
            descent: metrics.descender.unsigned_abs() as f32 * scale,
            line_gap: metrics.line_gap.max(0) as f32 * scale,
        }
    }

    pub fn height(&self) -> f32 {
        self.ascent + self.descent + self.line_gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_key_folds_case() {
        assert_eq!(FontKey::new(" Open Sans ", 700), FontKey::new("open sans", 700));
        assert_ne!(FontKey::new("Open Sans", 400), FontKey::new("Open Sans", 700));
    }

    #[test]
    fn test_line_metrics_scale() {
        let lm = LineMetrics::from_font_metrics(&FontMetrics::default(), 50.0);
        assert_eq!(lm.ascent, 40.0);
        assert_eq!(lm.descent, 10.0);
        assert_eq!(lm.height(), 50.0);
    }

    #[test]
    fn test_invalid_face_has_no_metrics() {
        let face = LoadedFace::new("Broken", 400, Arc::new(vec![0, 1, 2, 3]), 0);
        assert!(face.metrics().is_none());
    }
}

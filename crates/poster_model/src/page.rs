//! Physical page geometry
//!
//! A0 is the only sheet the exporter produces. Pixel and point sizes are
//! derived from millimetres so the raster surface and the document page
//! always describe the same sheet.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MM_PER_INCH: f32 = 25.4;
pub const POINTS_PER_INCH: f32 = 72.0;

/// A0 short edge in millimetres
pub const A0_WIDTH_MM: f32 = 841.0;
/// A0 long edge in millimetres
pub const A0_HEIGHT_MM: f32 = 1189.0;

/// Page orientation chosen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => f.write_str("portrait"),
            Orientation::Landscape => f.write_str("landscape"),
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" | "p" => Ok(Orientation::Portrait),
            "landscape" | "l" => Ok(Orientation::Landscape),
            other => Err(format!("unknown orientation `{other}`")),
        }
    }
}

/// Sheet dimensions in millimetres, already oriented
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PageSize {
    /// The A0 sheet in the given orientation
    pub fn a0(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Portrait => Self {
                width_mm: A0_WIDTH_MM,
                height_mm: A0_HEIGHT_MM,
            },
            Orientation::Landscape => Self {
                width_mm: A0_HEIGHT_MM,
                height_mm: A0_WIDTH_MM,
            },
        }
    }

    /// Pixel dimensions at `dpi`, rounded to the nearest pixel
    pub fn pixels(&self, dpi: u32) -> (u32, u32) {
        let px = |mm: f32| ((mm as f64 / MM_PER_INCH as f64) * dpi as f64).round() as u32;
        (px(self.width_mm), px(self.height_mm))
    }

    /// Dimensions in PDF points
    pub fn points(&self) -> (f32, f32) {
        let pt = |mm: f32| mm / MM_PER_INCH * POINTS_PER_INCH;
        (pt(self.width_mm), pt(self.height_mm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a0_at_300_dpi() {
        assert_eq!(PageSize::a0(Orientation::Portrait).pixels(300), (9933, 14043));
        assert_eq!(PageSize::a0(Orientation::Landscape).pixels(300), (14043, 9933));
    }

    #[test]
    fn test_a0_points() {
        let (w, h) = PageSize::a0(Orientation::Portrait).points();
        assert!((w - 2383.937).abs() < 0.01);
        assert!((h - 3370.394).abs() < 0.01);
    }

    #[test]
    fn test_orientation_parsing() {
        assert_eq!("Landscape".parse::<Orientation>(), Ok(Orientation::Landscape));
        assert_eq!("p".parse::<Orientation>(), Ok(Orientation::Portrait));
        assert!("square".parse::<Orientation>().is_err());
        assert_eq!(Orientation::Landscape.to_string(), "landscape");
    }
}

//! SurfaceFactory
//!
//! Allocates the white A0 print surface for an orientation.

use crate::{RasterSurface, Result};
use poster_model::{Orientation, PageSize};
use style_engine::Color;

pub const PRINT_DPI: u32 = 300;

/// Pixel dimensions of the A0 sheet at `dpi`, axes swapped for landscape
pub fn surface_dimensions(orientation: Orientation, dpi: u32) -> (u32, u32) {
    PageSize::a0(orientation).pixels(dpi)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceFactory {
    dpi: u32,
}

impl Default for SurfaceFactory {
    fn default() -> Self {
        Self { dpi: PRINT_DPI }
    }
}

impl SurfaceFactory {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn dimensions(&self, orientation: Orientation) -> (u32, u32) {
        surface_dimensions(orientation, self.dpi)
    }

    /// Allocate a surface pre-filled with white
    pub fn create(&self, orientation: Orientation) -> Result<RasterSurface> {
        let (width, height) = self.dimensions(orientation);
        tracing::info!(width, height, dpi = self.dpi, %orientation, "allocating print surface");
        let mut surface = RasterSurface::new(width, height)?;
        surface.fill(Color::WHITE);
        Ok(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_surface_is_white() {
        let surface = SurfaceFactory::new(10).create(Orientation::Landscape).unwrap();
        assert_eq!((surface.width(), surface.height()), (468, 331));
        assert_eq!(surface.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(467, 330), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_print_resolution() {
        assert_eq!(SurfaceFactory::default().dimensions(Orientation::Portrait), (9933, 14043));
    }

    proptest! {
        #[test]
        fn prop_dimensions_follow_sheet(dpi in 1u32..600, landscape in any::<bool>()) {
            let orientation = if landscape { Orientation::Landscape } else { Orientation::Portrait };
            let (w, h) = surface_dimensions(orientation, dpi);
            let short = (841.0 / 25.4 * dpi as f64).round() as u32;
            let long = (1189.0 / 25.4 * dpi as f64).round() as u32;
            if landscape {
                prop_assert_eq!((w, h), (long, short));
            } else {
                prop_assert_eq!((w, h), (short, long));
            }
        }
    }
}

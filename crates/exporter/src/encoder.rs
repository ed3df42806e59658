//! DocumentEncoder
//!
//! Turns the finished surface into the one-page print PDF. The surface is
//! read back first; a tainted surface is reported as such and never
//! encoded.

use crate::{ExportError, Result};
use poster_model::{Orientation, PageSize};
use print_pdf::PdfOptions;
use raster::{RasterError, RasterSurface};

#[derive(Debug, Clone, Default)]
pub struct DocumentEncoder {
    options: PdfOptions,
}

impl DocumentEncoder {
    pub fn new(options: PdfOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PdfOptions {
        &self.options
    }

    /// Encode `surface` onto an A0 page in `orientation`, consuming it
    pub fn encode(&self, surface: RasterSurface, orientation: Orientation) -> Result<Vec<u8>> {
        let pixmap = surface.read_back().map_err(|e| match e {
            RasterError::Tainted => ExportError::TaintedSurface,
            other => ExportError::Encoding(other.to_string()),
        })?;

        let rgb = flatten_to_rgb(pixmap.data());
        let page = PageSize::a0(orientation);
        print_pdf::encode_rgb_page(&rgb, pixmap.width(), pixmap.height(), page, &self.options)
            .map_err(|e| {
                tracing::error!(error = %e, "PDF encoding failed");
                ExportError::Encoding(e.to_string())
            })
    }
}

/// Premultiplied RGBA to opaque RGB, composited over white
fn flatten_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let uncovered = 255 - px[3];
        rgb.extend(px[..3].iter().map(|&c| c.saturating_add(uncovered)));
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use print_pdf::RasterEncoding;
    use style_engine::Color;

    fn flate() -> DocumentEncoder {
        DocumentEncoder::new(PdfOptions::new().with_encoding(RasterEncoding::Flate))
    }

    #[test]
    fn test_flatten_over_white() {
        // opaque red, fully transparent, half-covered black
        let rgba = [255, 0, 0, 255, 0, 0, 0, 0, 0, 0, 0, 128];
        assert_eq!(flatten_to_rgb(&rgba), vec![255, 0, 0, 255, 255, 255, 127, 127, 127]);
    }

    #[test]
    fn test_encodes_clean_surface() {
        let mut surface = RasterSurface::new(4, 6).unwrap();
        surface.fill(Color::WHITE);
        let bytes = flate().encode(surface, Orientation::Portrait).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_tainted_surface_is_classified() {
        let mut surface = RasterSurface::new(4, 6).unwrap();
        surface.mark_tainted();
        let result = flate().encode(surface, Orientation::Portrait);
        assert!(matches!(result, Err(ExportError::TaintedSurface)));
    }
}

//! Glyph painting for laid-out lines

use crate::RasterSurface;
use style_engine::Color;
use text_engine::{FontRegistry, FontSpec, GlyphRasterizer, ShapingMeasurer, TextShaper};

/// Shapes, rasterizes and blends text onto the surface
#[derive(Debug)]
pub struct TextPainter<'a> {
    registry: &'a FontRegistry,
    shaper: TextShaper,
    rasterizer: GlyphRasterizer,
}

impl<'a> TextPainter<'a> {
    pub fn new(registry: &'a FontRegistry) -> Self {
        Self {
            registry,
            shaper: TextShaper::new(),
            rasterizer: GlyphRasterizer::new(),
        }
    }

    pub fn registry(&self) -> &'a FontRegistry {
        self.registry
    }

    /// Measurer consistent with what [`TextPainter::draw_line`] paints
    pub fn measurer(&self) -> ShapingMeasurer<'_> {
        ShapingMeasurer::new(self.registry, &self.shaper)
    }

    /// Paint one line with its left edge at `x` on `baseline`.
    ///
    /// Returns false when no face is available and nothing was drawn.
    pub fn draw_line(
        &mut self,
        surface: &mut RasterSurface,
        text: &str,
        font: &FontSpec,
        x: f32,
        baseline: f32,
        color: Color,
    ) -> bool {
        let Some(face) = self.registry.face(&font.family, font.weight) else {
            tracing::debug!(family = %font.family, weight = font.weight, "no face; line not drawn");
            return false;
        };
        let run = self.shaper.shape(text, font.size, Some(face.as_ref()));
        if !run.shaped {
            return false;
        }
        let glyphs = match self.rasterizer.rasterize(&run, face) {
            Ok(glyphs) => glyphs,
            Err(err) => {
                tracing::warn!(family = %face.family, error = %err, "glyph rasterization failed");
                return false;
            }
        };

        let (ox, oy) = (x.round() as i32, baseline.round() as i32);
        for glyph in &glyphs {
            surface.draw_coverage(
                ox + glyph.x,
                oy + glyph.y,
                glyph.width,
                glyph.height,
                &glyph.coverage,
                color,
            );
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fonts::{fixture_registry, ink_bounds};
    use poster_model::BoxRect;
    use std::sync::Arc;
    use text_engine::{MemoryFontLoader, TextMeasurer};

    fn white(width: u32, height: u32) -> RasterSurface {
        let mut surface = RasterSurface::new(width, height).unwrap();
        surface.fill(Color::WHITE);
        surface
    }

    #[test]
    fn test_line_ink_sits_on_baseline() {
        let registry = fixture_registry();
        let mut painter = TextPainter::new(&registry);
        let font = FontSpec::new("Arial", 400, 24.0);
        let width = painter.measurer().measure("Hello", &font);
        let mut surface = white(120, 60);

        assert!(painter.draw_line(&mut surface, "Hello", &font, 10.0, 40.0, Color::BLACK));

        let (left, top, right, bottom) = ink_bounds(&surface, &surface.bounds()).unwrap();
        assert!((10..=15).contains(&left), "left {}", left);
        assert!(right as f32 <= 10.0 + width + 1.0, "right {} width {}", right, width);
        // ascenders reach about 0.76 em above the baseline
        assert!((16..=26).contains(&top), "top {}", top);
        assert!((37..=41).contains(&bottom), "bottom {}", bottom);
    }

    #[test]
    fn test_descenders_drop_below_baseline() {
        let registry = fixture_registry();
        let mut painter = TextPainter::new(&registry);
        let font = FontSpec::new("Arial", 400, 24.0);
        let mut surface = white(80, 60);

        assert!(painter.draw_line(&mut surface, "gyp", &font, 5.0, 30.0, Color::BLACK));
        let (_, _, _, bottom) = ink_bounds(&surface, &surface.bounds()).unwrap();
        assert!(bottom >= 33, "bottom {}", bottom);
    }

    #[test]
    fn test_colored_ink() {
        let registry = fixture_registry();
        let mut painter = TextPainter::new(&registry);
        let font = FontSpec::new("Arial", 400, 40.0);
        let mut surface = white(60, 60);

        assert!(painter.draw_line(&mut surface, "I", &font, 20.0, 50.0, Color::rgb(0, 0, 255)));
        let (left, top, right, bottom) = ink_bounds(&surface, &surface.bounds()).unwrap();
        let middle = surface.pixel((left + right) / 2, (top + bottom) / 2).unwrap();
        assert!(middle[0] < 10 && middle[1] < 10 && middle[2] > 245, "{:?}", middle);
    }

    #[test]
    fn test_no_face_draws_nothing() {
        let registry = FontRegistry::new(Arc::new(MemoryFontLoader::new()), "Arial");
        let mut painter = TextPainter::new(&registry);
        let mut surface = white(40, 40);
        let font = FontSpec::new("Arial", 400, 20.0);

        assert!(!painter.draw_line(&mut surface, "Hi", &font, 2.0, 30.0, Color::BLACK));
        assert_eq!(ink_bounds(&surface, &BoxRect::new(0.0, 0.0, 40.0, 40.0)), None);
    }
}

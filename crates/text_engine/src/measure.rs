//! Text measurement capability used by layout

use crate::{FontRegistry, FontSpec, LineMetrics, TextShaper};

/// Measures rendered text at destination scale
pub trait TextMeasurer {
    /// Advance width of `text` in pixels
    fn measure(&self, text: &str, font: &FontSpec) -> f32;

    /// Vertical metrics in pixels of the face that paints `font`; `None`
    /// when widths are estimated
    fn line_metrics(&self, font: &FontSpec) -> Option<LineMetrics>;
}

/// Measures with the faces prepared in a [`FontRegistry`].
///
/// Requests without a usable face are measured with estimated widths.
#[derive(Debug, Clone, Copy)]
pub struct ShapingMeasurer<'a> {
    registry: &'a FontRegistry,
    shaper: &'a TextShaper,
}

impl<'a> ShapingMeasurer<'a> {
    pub fn new(registry: &'a FontRegistry, shaper: &'a TextShaper) -> Self {
        Self { registry, shaper }
    }
}

impl TextMeasurer for ShapingMeasurer<'_> {
    fn measure(&self, text: &str, font: &FontSpec) -> f32 {
        let face = self.registry.face(&font.family, font.weight);
        self.shaper.shape(text, font.size, face.map(|f| f.as_ref())).width
    }

    fn line_metrics(&self, font: &FontSpec) -> Option<LineMetrics> {
        let metrics = self.registry.face(&font.family, font.weight)?.metrics()?;
        Some(LineMetrics::from_font_metrics(&metrics, font.size))
    }
}

//! ScaleMapper
//!
//! Maps source (on-screen) coordinates onto the destination surface. The
//! two axes scale independently; the root box always lands at (0, 0).

use crate::{LayoutError, Result};
use poster_model::{BoxRect, Diagnostics, TraceEvent};
use serde::{Deserialize, Serialize};

/// Relative difference between axis scales above which a warning is logged
pub const DEFAULT_MISMATCH_TOLERANCE: f32 = 0.01;

/// Destination pixels per source unit, plus the offset cancelling the
/// root's viewport position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleContext {
    pub scale_x: f32,
    pub scale_y: f32,
    pub origin_x: f32,
    pub origin_y: f32,
}

impl ScaleContext {
    pub fn map_x(&self, x: f32) -> f32 {
        self.origin_x + x * self.scale_x
    }

    pub fn map_y(&self, y: f32) -> f32 {
        self.origin_y + y * self.scale_y
    }

    /// Map a source box to destination pixels
    pub fn map_rect(&self, rect: &BoxRect) -> BoxRect {
        BoxRect::new(
            self.map_x(rect.x),
            self.map_y(rect.y),
            rect.width * self.scale_x,
            rect.height * self.scale_y,
        )
    }

    /// Factor for lengths without an axis (font sizes, bullet glyphs)
    pub fn font_scale(&self) -> f32 {
        self.scale_x.min(self.scale_y)
    }

    /// Relative difference between the two axis scales
    pub fn mismatch(&self) -> f32 {
        let larger = self.scale_x.max(self.scale_y);
        if larger <= 0.0 {
            return 0.0;
        }
        (self.scale_x - self.scale_y).abs() / larger
    }
}

/// Derives the [`ScaleContext`] for one export
#[derive(Debug, Clone)]
pub struct ScaleMapper {
    tolerance: f32,
    diagnostics: Diagnostics,
}

impl Default for ScaleMapper {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_MISMATCH_TOLERANCE,
            diagnostics: Diagnostics::default(),
        }
    }
}

impl ScaleMapper {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self {
            diagnostics,
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Scale the root's source box onto a `dest_width` x `dest_height` surface.
    ///
    /// Differing aspect ratios are allowed; they are reported, not corrected.
    pub fn map(&self, root: &BoxRect, dest_width: u32, dest_height: u32) -> Result<ScaleContext> {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if !usable(root.width) || !usable(root.height) {
            return Err(LayoutError::ZeroSizeSource {
                width: root.width,
                height: root.height,
            });
        }
        if dest_width == 0 || dest_height == 0 {
            return Err(LayoutError::ZeroSizeDestination {
                width: dest_width,
                height: dest_height,
            });
        }

        let scale_x = dest_width as f32 / root.width;
        let scale_y = dest_height as f32 / root.height;
        let ctx = ScaleContext {
            scale_x,
            scale_y,
            origin_x: -root.x * scale_x,
            origin_y: -root.y * scale_y,
        };

        if ctx.mismatch() > self.tolerance {
            tracing::warn!(
                scale_x,
                scale_y,
                "source and destination aspect ratios differ; output will be stretched"
            );
            self.diagnostics.emit(TraceEvent::ScaleMismatch { scale_x, scale_y });
        }
        tracing::debug!(scale_x, scale_y, origin_x = ctx.origin_x, origin_y = ctx.origin_y, "scale context");
        Ok(ctx)
    }
}

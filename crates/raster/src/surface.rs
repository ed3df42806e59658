//! RasterSurface - the destination pixel buffer
//!
//! Wraps a tiny-skia pixmap. Drawing untrusted content marks the surface
//! tainted; a tainted surface refuses to be read back.

use crate::{RasterError, Result};
use poster_model::BoxRect;
use style_engine::Color;
use tiny_skia::{
    FillRule, FilterQuality, Paint, PathBuilder, Pattern, Pixmap, PixmapPaint, PixmapRef,
    PremultipliedColorU8, Rect, SpreadMode, Transform,
};

fn sk_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn solid_paint(color: Color, anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(sk_color(color));
    paint.anti_alias = anti_alias;
    paint
}

/// Snap a rect to whole device pixels. A non-empty rect keeps at least
/// one pixel along each axis.
fn pixel_rect(rect: &BoxRect) -> Option<Rect> {
    if !(rect.width > 0.0 && rect.height > 0.0) {
        return None;
    }
    let span = |start: f32, len: f32| {
        let lo = start.round();
        (lo, (start + len).round().max(lo + 1.0))
    };
    let (left, right) = span(rect.x, rect.width);
    let (top, bottom) = span(rect.y, rect.height);
    Rect::from_ltrb(left, top, right, bottom)
}

/// Destination surface for one export
pub struct RasterSurface {
    pixmap: Pixmap,
    tainted: bool,
}

impl RasterSurface {
    /// Allocate a fully transparent surface
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(RasterError::Allocation { width, height })?;
        Ok(Self {
            pixmap,
            tainted: false,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn bounds(&self) -> BoxRect {
        BoxRect::new(0.0, 0.0, self.width() as f32, self.height() as f32)
    }

    pub fn fill(&mut self, color: Color) {
        self.pixmap.fill(sk_color(color));
    }

    /// Fill an axis-aligned rectangle snapped to device pixels; empty
    /// rectangles are ignored
    pub fn fill_rect(&mut self, rect: &BoxRect, color: Color) {
        if let Some(rect) = pixel_rect(rect) {
            self.pixmap
                .fill_rect(rect, &solid_paint(color, false), Transform::identity(), None);
        }
    }

    /// Anti-aliased disc; below one pixel across it degrades to a single pixel
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        if radius < 1.0 {
            let d = radius * 2.0;
            self.fill_rect(&BoxRect::new(cx - radius, cy - radius, d, d), color);
            return;
        }
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            self.pixmap.fill_path(
                &path,
                &solid_paint(color, true),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    /// Paint `image` so that `transform` maps it onto the page, clipped to `clip`
    pub fn draw_image(&mut self, image: PixmapRef<'_>, transform: Transform, clip: &BoxRect) {
        let Some(rect) = pixel_rect(clip) else {
            return;
        };
        let mut paint = Paint::default();
        paint.anti_alias = false;
        paint.shader = Pattern::new(
            image,
            SpreadMode::Pad,
            FilterQuality::Bilinear,
            1.0,
            transform,
        );
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Blend a coverage mask tinted with `color` with its top-left at (x, y)
    pub fn draw_coverage(&mut self, x: i32, y: i32, width: usize, height: usize, coverage: &[u8], color: Color) {
        let Some(mut glyph) = Pixmap::new(width as u32, height as u32) else {
            return;
        };
        for (dst, &cov) in glyph.pixels_mut().iter_mut().zip(coverage) {
            let alpha = (cov as u16 * color.a as u16 / 255) as u8;
            let premul = |c: u8| (c as u16 * alpha as u16 / 255) as u8;
            if let Some(px) =
                PremultipliedColorU8::from_rgba(premul(color.r), premul(color.g), premul(color.b), alpha)
            {
                *dst = px;
            }
        }
        self.pixmap.draw_pixmap(
            x,
            y,
            glyph.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    pub fn mark_tainted(&mut self) {
        self.tainted = true;
    }

    pub fn is_tainted(&self) -> bool {
        self.tainted
    }

    /// Read access to the pixels; fails once untrusted content was drawn
    pub fn read_back(&self) -> Result<&Pixmap> {
        if self.tainted {
            return Err(RasterError::Tainted);
        }
        Ok(&self.pixmap)
    }

    /// Straight-alpha RGBA of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("tainted", &self.tainted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_and_rect() {
        let mut surface = RasterSurface::new(20, 10).unwrap();
        surface.fill(Color::WHITE);
        surface.fill_rect(&BoxRect::new(5.0, 2.0, 5.0, 5.0), Color::rgb(255, 0, 0));
        assert_eq!(surface.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(7, 4), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(12, 4), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(20, 0), None);
    }

    #[test]
    fn test_empty_rect_is_ignored() {
        let mut surface = RasterSurface::new(4, 4).unwrap();
        surface.fill(Color::WHITE);
        surface.fill_rect(&BoxRect::new(1.0, 1.0, 0.0, 2.0), Color::BLACK);
        assert_eq!(surface.pixel(1, 1), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_hairline_rect_at_fractional_x() {
        let mut surface = RasterSurface::new(40, 220).unwrap();
        surface.fill(Color::WHITE);
        surface.fill_rect(&BoxRect::new(15.742, 78.716, 1.0, 118.07), Color::BLACK);
        assert_eq!(surface.pixel(16, 100), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(15, 100), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(17, 100), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_sub_pixel_rect_keeps_one_pixel() {
        let mut surface = RasterSurface::new(10, 10).unwrap();
        surface.fill(Color::WHITE);
        surface.fill_rect(&BoxRect::new(3.3, 4.1, 0.2, 0.3), Color::BLACK);
        assert_eq!(surface.pixel(3, 4), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(4, 4), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_tiny_circle() {
        let mut surface = RasterSurface::new(10, 10).unwrap();
        surface.fill(Color::WHITE);
        surface.fill_circle(5.2, 5.4, 0.3, Color::BLACK);
        assert_eq!(surface.pixel(5, 5), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_coverage_blending() {
        let mut surface = RasterSurface::new(4, 4).unwrap();
        surface.fill(Color::WHITE);
        surface.draw_coverage(1, 1, 2, 1, &[255, 0], Color::BLACK);
        assert_eq!(surface.pixel(1, 1), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(2, 1), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_tainted_surface_refuses_read_back() {
        let mut surface = RasterSurface::new(2, 2).unwrap();
        assert!(surface.read_back().is_ok());
        surface.mark_tainted();
        assert!(matches!(surface.read_back(), Err(RasterError::Tainted)));
    }

    #[test]
    fn test_zero_size_allocation_fails() {
        assert!(matches!(
            RasterSurface::new(0, 10),
            Err(RasterError::Allocation { width: 0, height: 10 })
        ));
    }
}

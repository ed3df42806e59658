//! DejaVu Sans fixture for painting tests

use crate::RasterSurface;
use poster_model::BoxRect;
use std::sync::Arc;
use text_engine::{FontRegistry, MemoryFontLoader};

pub const DEJAVU_SANS: &[u8] = include_bytes!("../../text_engine/tests/fonts/DejaVuSans.ttf");

/// Registry with DejaVu Sans prepared as the "Arial" fallback, so every
/// family resolves to it
pub fn fixture_registry() -> FontRegistry {
    let mut loader = MemoryFontLoader::new();
    loader.add("Arial", 400, DEJAVU_SANS.to_vec()).unwrap();
    let mut registry = FontRegistry::new(Arc::new(loader), "Arial");
    registry.prepare([("Arial", 400)]);
    assert!(registry.has_faces());
    registry
}

/// Inclusive pixel bounds (left, top, right, bottom) of dark opaque pixels
/// inside `region`
pub fn ink_bounds(surface: &RasterSurface, region: &BoxRect) -> Option<(u32, u32, u32, u32)> {
    let x0 = region.x.max(0.0) as u32;
    let y0 = region.y.max(0.0) as u32;
    let x1 = (region.right() as u32).min(surface.width());
    let y1 = (region.bottom() as u32).min(surface.height());

    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in y0..y1 {
        for x in x0..x1 {
            let Some([r, _, _, a]) = surface.pixel(x, y) else {
                continue;
            };
            if a < 128 || r >= 128 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x), b.max(y)),
            });
        }
    }
    bounds
}

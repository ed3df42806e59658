//! Raster - Painting the print surface
//!
//! Allocates the A0 surface, walks the snapshot tree and paints each node's
//! background, borders, image, bullet and text at print resolution.
//!
//! # Modules
//!
//! - `factory`: SurfaceFactory and sheet-derived pixel dimensions
//! - `surface`: RasterSurface with taint tracking
//! - `compositor`: ImageCompositor, fetchers and the placeholder
//! - `text_paint`: glyph painting for laid-out lines
//! - `pipeline`: per-node paint order
//! - `walker`: depth-first traversal

mod error;
mod factory;
mod compositor;
mod pipeline;
mod stats;
mod surface;
mod text_paint;
mod walker;

#[cfg(test)]
mod test_fonts;

pub use error::*;
pub use factory::*;
pub use compositor::*;
pub use pipeline::*;
pub use stats::*;
pub use surface::*;
pub use text_paint::*;
pub use walker::*;
